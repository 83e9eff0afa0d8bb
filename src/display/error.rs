/*
 *  display/error.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the panel subsystem
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

use std::fmt;
use std::error::Error;

/// Unified error type for all panel operations
#[derive(Debug)]
pub enum DisplayError {
    /// Panel initialization failed
    InitializationFailed(String),

    /// Refresh or sleep requested before init()
    NotInitialized,

    /// Packed buffer does not match the panel geometry
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Bitmap handed to the packer does not match the panel resolution
    DimensionMismatch { expected: (u32, u32), actual: (u32, u32) },

    /// Underlying I/O failure (device node, output directory, ...)
    Io(std::io::Error),

    /// Frame export failed
    Export(String),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::NotInitialized =>
                write!(f, "Display is not initialized (or already asleep)"),
            DisplayError::BufferSizeMismatch { expected, actual } =>
                write!(f, "Buffer size mismatch: expected {} bytes, got {}", expected, actual),
            DisplayError::DimensionMismatch { expected, actual } =>
                write!(f, "Bitmap is {}x{}, panel is {}x{}", actual.0, actual.1, expected.0, expected.1),
            DisplayError::Io(err) =>
                write!(f, "Display I/O error: {}", err),
            DisplayError::Export(msg) =>
                write!(f, "Frame export failed: {}", msg),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}

impl From<image::ImageError> for DisplayError {
    fn from(err: image::ImageError) -> Self {
        DisplayError::Export(err.to_string())
    }
}

/// Factory error types
#[derive(Debug)]
pub enum DisplayFactoryError {
    /// Configured geometry is unusable
    InvalidGeometry { width: u32, height: u32 },

    /// Snapshot driver needs somewhere to write frames
    MissingOutputDir,
}

impl fmt::Display for DisplayFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFactoryError::InvalidGeometry { width, height } =>
                write!(f, "Invalid panel geometry {}x{}", width, height),
            DisplayFactoryError::MissingOutputDir =>
                write!(f, "Snapshot driver requires display.output_dir"),
        }
    }
}

impl Error for DisplayFactoryError {}
