/*
 *  lib.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Image and rolling-text rendering for 1-bit bistable panels
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

//! Two pipelines feed one panel:
//!
//! - image: [`raster`] -> [`binarize`] -> [`DisplaySink::to_buffer`] -> [`DisplaySink::display`]
//! - text: [`session`] -> [`text::compose`] -> [`DisplaySink::to_buffer`] -> [`DisplaySink::display`]
//!
//! The panel is always passed in explicitly and always put to sleep
//! through [`runner::with_display`].

pub mod binarize;
pub mod bitmap;
pub mod config;
pub mod display;
pub mod error;
pub mod pacer;
pub mod raster;
pub mod runner;
pub mod session;
pub mod text;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
}

pub use bitmap::{MonoBitmap, INK, PAPER};
pub use display::{DisplayBuffer, DisplayError, DisplaySink};
pub use error::RenderError;
pub use runner::{show_image, with_display, RenderOptions};
