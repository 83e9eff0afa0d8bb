/*
 *  display/traits.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the panel capability
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

use std::time::Duration;

use crate::bitmap::MonoBitmap;
use crate::display::error::DisplayError;
use crate::display::packing::{self, DisplayBuffer};

/// Panel capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Human readable panel name, used in logs
    pub name: String,

    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Shortest gap the panel tolerates between two full refreshes
    pub min_refresh_interval: Duration,
}

/// Bistable panel abstraction - everything the renderers need from hardware
///
/// Drivers are handed to the pipeline explicitly; nothing reaches for a
/// global device. Every call blocks until the panel is done.
pub trait DisplaySink: Send {
    /// Returns the capabilities of this panel
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the panel resolution as (width, height)
    fn resolution(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Wake and configure the panel. Must precede the first `display`.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Convert a bitmap into the byte layout this panel consumes
    ///
    /// The default is the crate packer (MSB first, 1 = white). Drivers
    /// whose controller wants something else override this, and callers
    /// always go through it rather than packing themselves.
    fn to_buffer(&self, bitmap: &MonoBitmap) -> Result<DisplayBuffer, DisplayError> {
        let expected = self.resolution();
        let actual = (bitmap.width(), bitmap.height());
        if expected != actual {
            return Err(DisplayError::DimensionMismatch { expected, actual });
        }
        Ok(packing::pack(bitmap))
    }

    /// Push a full frame to the panel
    fn display(&mut self, buffer: &DisplayBuffer) -> Result<(), DisplayError>;

    /// Enter the low-power state; the panel keeps showing its last frame
    fn sleep(&mut self) -> Result<(), DisplayError>;
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn capabilities(&self) -> &DisplayCapabilities { (**self).capabilities() }
    fn init(&mut self) -> Result<(), DisplayError> { (**self).init() }
    fn to_buffer(&self, bitmap: &MonoBitmap) -> Result<DisplayBuffer, DisplayError> {
        (**self).to_buffer(bitmap)
    }
    fn display(&mut self, buffer: &DisplayBuffer) -> Result<(), DisplayError> {
        (**self).display(buffer)
    }
    fn sleep(&mut self) -> Result<(), DisplayError> { (**self).sleep() }
}

/// Length check shared by the drivers
pub fn check_buffer(caps: &DisplayCapabilities, buffer: &DisplayBuffer) -> Result<(), DisplayError> {
    let expected = packing::buffer_len(caps.width, caps.height);
    if buffer.len() != expected
        || buffer.width() != caps.width
        || buffer.height() != caps.height
    {
        return Err(DisplayError::BufferSizeMismatch { expected, actual: buffer.len() });
    }
    Ok(())
}
