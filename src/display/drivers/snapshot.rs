/*
 *  display/drivers/snapshot.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Headless panel: every refresh is written out as a PNG
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

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::display::error::DisplayError;
use crate::display::packing::{self, DisplayBuffer};
use crate::display::traits::{check_buffer, DisplayCapabilities, DisplaySink};

/// Name of the file that always holds the most recent frame
pub const LATEST_FRAME: &str = "latest.png";

/// Snapshot driver
///
/// Stands in for a real panel on a desktop: the packed buffer is decoded
/// with the same unpacker a panel would implicitly apply, rendered as
/// 0/255 grayscale, and saved as `frame-NNNN.png` next to `latest.png`.
/// Going through the packed form means a polarity or bit-order bug shows
/// up in the PNGs exactly as it would on glass.
#[derive(Debug)]
pub struct SnapshotDriver {
    capabilities: DisplayCapabilities,
    output_dir: PathBuf,
    frame_count: u64,
    awake: bool,
}

impl SnapshotDriver {
    pub fn new(width: u32, height: u32, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            capabilities: DisplayCapabilities {
                name: "snapshot".to_string(),
                width,
                height,
                // PNG writes never ghost
                min_refresh_interval: Duration::ZERO,
            },
            output_dir: output_dir.into(),
            frame_count: 0,
            awake: false,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Frames written so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn frame_path(&self, frame: u64) -> PathBuf {
        self.output_dir.join(format!("frame-{:04}.png", frame))
    }
}

impl DisplaySink for SnapshotDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        fs::create_dir_all(&self.output_dir)?;
        self.awake = true;
        info!(
            "Snapshot panel {}x{} writing to {}",
            self.capabilities.width,
            self.capabilities.height,
            self.output_dir.display()
        );
        Ok(())
    }

    fn display(&mut self, buffer: &DisplayBuffer) -> Result<(), DisplayError> {
        if !self.awake {
            return Err(DisplayError::NotInitialized);
        }
        check_buffer(&self.capabilities, buffer)?;

        let image = packing::unpack(buffer).to_gray_image();
        let frame = self.frame_count + 1;
        let path = self.frame_path(frame);
        image.save(&path)?;
        image.save(self.output_dir.join(LATEST_FRAME))?;

        self.frame_count = frame;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        self.awake = false;
        debug!("Snapshot panel asleep after {} frame(s)", self.frame_count);
        Ok(())
    }
}
