/*
 *  display/mod.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel subsystem: capability trait, buffer layout, drivers
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod packing;
pub mod factory;

// Panel drivers
pub mod drivers;

// Re-exports for convenience
pub use traits::{DisplaySink, DisplayCapabilities};
pub use error::{DisplayError, DisplayFactoryError};
pub use packing::{pack, unpack, DisplayBuffer};
pub use factory::{DisplayDriverFactory, BoxedDriver};
