/*
 *  display/packing.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  1-bit bitmap <-> panel byte layout
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

//! Panel buffer layout
//!
//! - row-major, `ceil(width / 8)` bytes per row
//! - most significant bit is the leftmost pixel of its group of eight
//! - bit 1 = paper (white), bit 0 = ink (black)
//! - unused bits at the end of a row are padded with 1 (white) and are
//!   never read back as content

use embedded_graphics::pixelcolor::BinaryColor;
use crate::bitmap::{MonoBitmap, INK, PAPER};
use crate::display::error::DisplayError;

/// Value of the padding bits in a row's last partial byte.
pub const PAD_BIT: u8 = 1;

/// Packed frame ready for the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl DisplayBuffer {
    /// Wrap raw bytes received for a panel of the given geometry.
    pub fn from_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, DisplayError> {
        let expected = buffer_len(width, height);
        if bytes.len() != expected {
            return Err(DisplayError::BufferSizeMismatch { expected, actual: bytes.len() });
        }
        Ok(Self { width, height, bytes })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn bytes_per_row(&self) -> usize { bytes_per_row(self.width) }
    pub fn as_bytes(&self) -> &[u8] { &self.bytes }
    pub fn len(&self) -> usize { self.bytes.len() }
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }
}

#[inline]
pub fn bytes_per_row(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Total byte length of a packed frame: `ceil(width / 8) * height`.
#[inline]
pub fn buffer_len(width: u32, height: u32) -> usize {
    bytes_per_row(width) * height as usize
}

/// Pack a bitmap into the panel layout.
pub fn pack(bitmap: &MonoBitmap) -> DisplayBuffer {
    let stride = bytes_per_row(bitmap.width());
    let mut bytes = Vec::with_capacity(buffer_len(bitmap.width(), bitmap.height()));

    for row in bitmap.rows().take(bitmap.height() as usize) {
        for group in 0..stride {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = group * 8 + bit;
                let value = match row.get(x) {
                    Some(&c) if c == INK => 0,
                    Some(_) => 1,
                    None => PAD_BIT,
                };
                byte |= value << (7 - bit);
            }
            bytes.push(byte);
        }
    }

    DisplayBuffer { width: bitmap.width(), height: bitmap.height(), bytes }
}

/// Recover the bitmap a buffer was packed from. Padding bits are ignored.
pub fn unpack(buffer: &DisplayBuffer) -> MonoBitmap {
    let stride = buffer.bytes_per_row();
    MonoBitmap::from_fn(buffer.width, buffer.height, |x, y| {
        let byte = buffer.bytes[y as usize * stride + x as usize / 8];
        pixel_from_bit(byte >> (7 - (x % 8)) & 1)
    })
}

#[inline]
fn pixel_from_bit(bit: u8) -> BinaryColor {
    if bit == 1 { PAPER } else { INK }
}
