/*
 *  text.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rolling window of typed lines and the composer that lays them out
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

use std::collections::VecDeque;

use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_6X10, MonoFont, MonoTextStyle},
    prelude::*,
    text::{Baseline, Text},
};
use log::debug;

use crate::bitmap::{MonoBitmap, INK};

/// Extra pixels between the bottom of one line and the top of the next.
pub const LINE_GAP: u32 = 4;

/// Anything that can put a string on a canvas.
///
/// `top_left` is the top edge of the line box, not the baseline.
pub trait TextShaper {
    /// Height of one line of glyphs in pixels
    fn line_height(&self) -> u32;

    /// Mark the pixels of `text` in ink. Glyphs the shaper cannot render
    /// are skipped.
    fn draw(&self, text: &str, top_left: Point, canvas: &mut MonoBitmap);
}

/// embedded-graphics mono font shaper, Latin-1 repertoire.
#[derive(Clone, Copy)]
pub struct MonoFontShaper {
    font: &'static MonoFont<'static>,
}

impl MonoFontShaper {
    pub fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    fn renderable(c: char) -> bool {
        (c as u32) <= 0xFF && !c.is_control()
    }
}

impl Default for MonoFontShaper {
    fn default() -> Self {
        Self::new(&FONT_6X10)
    }
}

impl TextShaper for MonoFontShaper {
    fn line_height(&self) -> u32 {
        self.font.character_size.height
    }

    fn draw(&self, text: &str, top_left: Point, canvas: &mut MonoBitmap) {
        let printable: String = text.chars().filter(|&c| Self::renderable(c)).collect();
        if printable.len() != text.len() {
            debug!("Dropped unrenderable glyphs from {:?}", text);
        }
        let style = MonoTextStyle::new(self.font, INK);
        // MonoBitmap never fails to draw
        let _ = Text::with_baseline(&printable, top_left, style, Baseline::Top).draw(canvas);
    }
}

/// Where lines go on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub width: u32,
    pub height: u32,
    pub margin_x: u32,
    pub margin_y: u32,
    /// Distance between the tops of successive lines
    pub line_spacing: u32,
}

impl TextLayout {
    /// Layout for a panel; spacing defaults to the shaper's line height plus `LINE_GAP`.
    pub fn for_panel(
        size: (u32, u32),
        margins: (u32, u32),
        line_spacing: Option<u32>,
        shaper: &dyn TextShaper,
    ) -> Self {
        Self {
            width: size.0,
            height: size.1,
            margin_x: margins.0,
            margin_y: margins.1,
            line_spacing: line_spacing.unwrap_or(shaper.line_height() + LINE_GAP).max(1),
        }
    }

    /// `floor((height - margin_y) / line_spacing)`, never less than one.
    pub fn max_lines(&self) -> usize {
        let usable = self.height.saturating_sub(self.margin_y);
        ((usable / self.line_spacing.max(1)) as usize).max(1)
    }

    /// Top edge of line `index`, or None when it would not fully fit.
    pub fn line_y(&self, index: usize) -> Option<u32> {
        let y = (self.margin_y as u64) + (index as u64) * (self.line_spacing as u64);
        let last = self.height.saturating_sub(self.line_spacing) as u64;
        if y <= last { Some(y as u32) } else { None }
    }
}

/// Most recent lines, oldest first, never more than `capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { lines: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append a line, evicting and returning the oldest one when full.
    pub fn push(&mut self, line: impl Into<String>) -> Option<String> {
        let evicted = if self.lines.len() == self.capacity {
            self.lines.pop_front()
        } else {
            None
        };
        self.lines.push_back(line.into());
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.lines.len() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }

    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

/// Render lines top to bottom; the first line that does not fit and
/// everything after it are left off.
pub fn compose<'a, I>(lines: I, layout: &TextLayout, shaper: &dyn TextShaper) -> MonoBitmap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut canvas = MonoBitmap::new(layout.width, layout.height);
    for (index, line) in lines.into_iter().enumerate() {
        let Some(y) = layout.line_y(index) else {
            debug!("Line {} does not fit, omitting the rest", index);
            break;
        };
        shaper.draw(line, Point::new(layout.margin_x as i32, y as i32), &mut canvas);
    }
    canvas
}
