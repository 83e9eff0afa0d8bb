/*
 *  runner.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel lifetime (init ... sleep on every path) and the two run modes
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

use std::io::{BufRead, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::binarize::{binarize, BinarizeMode};
use crate::display::{DisplayError, DisplaySink};
use crate::error::Result;
use crate::raster::{self, Rotation};
use crate::session::{InteractiveSession, SessionSummary};
use crate::text::{TextLayout, TextShaper};

/// Per-invocation image settings, validated once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub dither: bool,
    pub rotation: Rotation,
    pub threshold: u8,
}

impl RenderOptions {
    /// Fails with `InvalidRotation` before any hardware is touched.
    pub fn new(dither: bool, rotate_degrees: u16, threshold: u8) -> Result<Self> {
        Ok(Self { dither, rotation: Rotation::try_from(rotate_degrees)?, threshold })
    }

    pub fn mode(&self) -> BinarizeMode {
        BinarizeMode::from_flags(self.dither, self.threshold)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { dither: true, rotation: Rotation::None, threshold: 128 }
    }
}

/// Owns an initialised panel and puts it to sleep when done.
///
/// `release` reports a sleep failure; dropping without `release` (an error
/// unwound past us) still attempts sleep and only logs the outcome, so the
/// original error is the one the caller sees.
pub struct DisplayGuard<S: DisplaySink> {
    sink: S,
    released: bool,
}

impl<S: DisplaySink> DisplayGuard<S> {
    pub fn acquire(mut sink: S) -> std::result::Result<Self, DisplayError> {
        let name = sink.capabilities().name.clone();
        if let Err(e) = sink.init() {
            error!("Panel {} failed to initialise: {}", name, e);
            // half-initialised controllers still want the sleep command
            if let Err(sleep_err) = sink.sleep() {
                warn!("Sleep after failed init also failed: {}", sleep_err);
            }
            return Err(e);
        }
        debug!("Panel {} acquired", name);
        Ok(Self { sink, released: false })
    }

    /// Put the panel to sleep, reporting a failure to do so.
    pub fn release(mut self) -> std::result::Result<(), DisplayError> {
        self.released = true;
        info!("Sleep e-paper.");
        self.sink.sleep()
    }
}

impl<S: DisplaySink> Deref for DisplayGuard<S> {
    type Target = S;
    fn deref(&self) -> &S { &self.sink }
}

impl<S: DisplaySink> DerefMut for DisplayGuard<S> {
    fn deref_mut(&mut self) -> &mut S { &mut self.sink }
}

impl<S: DisplaySink> Drop for DisplayGuard<S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        info!("Sleep e-paper.");
        if let Err(e) = self.sink.sleep() {
            error!("Panel sleep failed: {}", e);
        }
    }
}

/// Run `work` against an initialised panel; the panel is put to sleep
/// whatever `work` returns.
pub fn with_display<S, T, F>(sink: S, work: F) -> Result<T>
where
    S: DisplaySink,
    F: FnOnce(&mut S) -> Result<T>,
{
    let mut guard = DisplayGuard::acquire(sink)?;
    match work(&mut *guard) {
        Ok(value) => {
            guard.release()?;
            Ok(value)
        }
        // guard drops here: sleep attempted, failure only logged
        Err(e) => Err(e),
    }
}

/// Image mode: normalise, binarise, convert with the panel's own packer, show.
pub fn show_image<S>(sink: &mut S, path: &Path, options: &RenderOptions) -> Result<()>
where
    S: DisplaySink + ?Sized,
{
    let size = sink.resolution();
    info!("Showing {} at {}x{}", path.display(), size.0, size.1);

    let canvas = raster::load_for_panel(path, size, options.rotation)?;
    let bitmap = binarize(&canvas, options.mode());
    let buffer = sink.to_buffer(&bitmap)?;
    sink.display(&buffer)?;
    Ok(())
}

/// Text mode over arbitrary input/output streams.
pub fn run_text_session<S, R, W>(
    sink: &mut S,
    shaper: &dyn TextShaper,
    layout: TextLayout,
    min_refresh: Duration,
    input: R,
    output: W,
) -> Result<SessionSummary>
where
    S: DisplaySink + ?Sized,
    R: BufRead,
    W: Write,
{
    InteractiveSession::new(sink, shaper, layout, min_refresh, input, output).run()
}
