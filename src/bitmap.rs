/*
 *  bitmap.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime-sized 1-bit pixel grid, the hand-off type between the
 *  binariser / text composer and the panel packer
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use image::{GrayImage, Luma};

/// Black ink. Text and dark image regions are drawn with this.
pub const INK: BinaryColor = BinaryColor::On;

/// Bare paper (white). Every canvas starts out filled with it.
pub const PAPER: BinaryColor = BinaryColor::Off;

/// A width x height grid where every cell is strictly ink or paper.
///
/// Also an embedded-graphics `DrawTarget`, so text and primitives can be
/// rendered straight into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBitmap {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl MonoBitmap {
    /// Blank (all paper) bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, PAPER)
    }

    pub fn filled(width: u32, height: u32, color: BinaryColor) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![color; w * h], w, h }
    }

    /// Build a bitmap by asking `f` for the colour at every (x, y), row-major.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> BinaryColor,
    {
        let mut buf = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                buf.push(f(x, y));
            }
        }
        Self { buf, w: width as usize, h: height as usize }
    }

    pub fn width(&self) -> u32 { self.w as u32 }
    pub fn height(&self) -> u32 { self.h as u32 }

    pub fn as_slice(&self) -> &[BinaryColor] { &self.buf }

    pub fn get(&self, x: u32, y: u32) -> Option<BinaryColor> {
        let (x, y) = (x as usize, y as usize);
        if x < self.w && y < self.h {
            self.buf.get(y * self.w + x).copied()
        } else {
            None
        }
    }

    /// Returns false when (x, y) is outside the grid.
    pub fn set(&mut self, x: u32, y: u32, color: BinaryColor) -> bool {
        match self.idx(Point::new(x as i32, y as i32)) {
            Some(i) => {
                self.buf[i] = color;
                true
            }
            None => false,
        }
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[BinaryColor]> {
        self.buf.chunks(self.w.max(1))
    }

    pub fn ink_count(&self) -> usize {
        self.buf.iter().filter(|&&p| p == INK).count()
    }

    /// True when any pixel inside the given row band is inked.
    pub fn has_ink_in_rows(&self, top: u32, bottom_exclusive: u32) -> bool {
        let end = (bottom_exclusive as usize).min(self.h);
        (top as usize..end).any(|y| {
            self.buf[y * self.w..(y + 1) * self.w].iter().any(|&p| p == INK)
        })
    }

    /// 8-bit grayscale view: ink 0, paper 255.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            match self.get(x, y) {
                Some(PAPER) | None => Luma([255u8]),
                Some(_) => Luma([0u8]),
            }
        })
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for MonoBitmap {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for MonoBitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // clip silently, glyphs may hang off the right edge
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}
