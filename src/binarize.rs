/*
 *  binarize.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Grayscale canvas -> strictly two-valued bitmap
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

use image::imageops::{self, BiLevel};
use image::GrayImage;

use crate::bitmap::{MonoBitmap, INK, PAPER};

/// How gray levels are reduced to ink and paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarizeMode {
    /// Floyd-Steinberg error diffusion, tone carried by dot density
    Dither,
    /// White when intensity is strictly above the threshold
    Threshold(u8),
}

impl BinarizeMode {
    pub fn from_flags(dither: bool, threshold: u8) -> Self {
        if dither { BinarizeMode::Dither } else { BinarizeMode::Threshold(threshold) }
    }
}

/// Pure function of its inputs; the canvas is not modified.
pub fn binarize(canvas: &GrayImage, mode: BinarizeMode) -> MonoBitmap {
    match mode {
        BinarizeMode::Dither => {
            let mut work = canvas.clone();
            // leaves every pixel at exactly 0 or 255
            imageops::dither(&mut work, &BiLevel);
            threshold(&work, 127)
        }
        BinarizeMode::Threshold(t) => threshold(canvas, t),
    }
}

fn threshold(canvas: &GrayImage, t: u8) -> MonoBitmap {
    MonoBitmap::from_fn(canvas.width(), canvas.height(), |x, y| {
        if canvas.get_pixel(x, y).0[0] > t { PAPER } else { INK }
    })
}
