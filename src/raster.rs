/*
 *  raster.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Load a photo, stand it upright, fit it and centre it on a panel-sized
 *  white canvas
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

use std::path::Path;

use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, GrayImage, ImageDecoder, ImageReader, Luma};
use log::debug;

use crate::error::{RenderError, Result};

/// Canvas background, full white.
pub const BACKGROUND: Luma<u8> = Luma([255]);

/// Requested rotation, anticlockwise like most image tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Quarter turns only, so the frame grows to fit and nothing is cropped.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Rotation::None => img,
            // image's rotateN helpers turn clockwise
            Rotation::Deg90 => img.rotate270(),
            Rotation::Deg180 => img.rotate180(),
            Rotation::Deg270 => img.rotate90(),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = RenderError;

    fn try_from(degrees: u16) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(RenderError::InvalidRotation(other)),
        }
    }
}

/// Decode `path`, honour its EXIF orientation and normalise it onto a
/// `size` canvas. Fails with `ImageLoad` for missing or undecodable files.
pub fn load_for_panel(path: &Path, size: (u32, u32), rotation: Rotation) -> Result<GrayImage> {
    let load_err = |source| RenderError::ImageLoad { path: path.to_path_buf(), source };

    let reader = ImageReader::open(path)
        .map_err(|e| load_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_err(image::ImageError::IoError(e)))?;
    let mut decoder = reader.into_decoder().map_err(load_err)?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let img = DynamicImage::from_decoder(decoder).map_err(load_err)?;

    debug!(
        "Loaded {} ({}x{}, orientation {:?})",
        path.display(),
        img.width(),
        img.height(),
        orientation
    );
    Ok(normalize(img, orientation, size, rotation))
}

/// Grayscale, upright, rotated, shrunk to fit and centred on white.
pub fn normalize(
    img: DynamicImage,
    orientation: Orientation,
    size: (u32, u32),
    rotation: Rotation,
) -> GrayImage {
    let mut img = DynamicImage::ImageLuma8(img.into_luma8());
    img.apply_orientation(orientation);
    let img = rotation.apply(img);

    let (tw, th) = size;
    let (w, h) = fit_within((img.width(), img.height()), size);
    let scaled = if (w, h) == (img.width(), img.height()) {
        img.into_luma8()
    } else {
        imageops::resize(&img.into_luma8(), w, h, FilterType::Lanczos3)
    };

    let (x, y) = center_offset((scaled.width(), scaled.height()), size);
    debug!(
        "Scaled to {}x{} (rotation {}), pasting at ({}, {}) on {}x{}",
        w, h, rotation.degrees(), x, y, tw, th
    );

    let mut canvas = GrayImage::from_pixel(tw, th, BACKGROUND);
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);
    canvas
}

/// Largest size with the source aspect ratio that fits inside `bounds`.
/// Never enlarges; each side is at least one pixel.
pub fn fit_within(src: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = src;
    let (bw, bh) = bounds;
    if w <= bw && h <= bh {
        return src;
    }
    let scale = f64::min(bw as f64 / w as f64, bh as f64 / h as f64);
    let fw = ((w as f64 * scale).round() as u32).clamp(1, bw.max(1));
    let fh = ((h as f64 * scale).round() as u32).clamp(1, bh.max(1));
    (fw, fh)
}

/// Top-left paste position that centres `inner` in `outer`, floor division.
pub fn center_offset(inner: (u32, u32), outer: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}
