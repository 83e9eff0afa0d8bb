/*
 *  error.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Pipeline level errors
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

use std::path::PathBuf;
use thiserror::Error;

use crate::display::DisplayError;

/// Everything that can stop an image or text run. None of these are retried.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Missing, unreadable or unsupported source file
    #[error("cannot load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid rotation {0} (must be 0, 90, 180 or 270)")]
    InvalidRotation(u16),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error("reading input: {0}")]
    Input(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
