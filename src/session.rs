/*
 *  session.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Interactive text mode: every line typed becomes a full panel refresh
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
use std::time::Duration;

use log::{debug, info};

use crate::display::DisplaySink;
use crate::error::Result;
use crate::pacer::RefreshPacer;
use crate::text::{compose, LineBuffer, TextLayout, TextShaper};

pub const PROMPT: &str = "> ";

/// Why the session stopped. Both are normal exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Blank (or whitespace only) line
    EmptyLine,
    /// Input closed (Ctrl-D, end of pipe)
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Rendering,
    Terminated(Termination),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines_accepted: usize,
    pub refreshes: usize,
    pub reason: Termination,
}

/// Reads lines from `input`, keeps the newest that fit the panel and
/// refreshes once per accepted line. Prompts go to `output`.
pub struct InteractiveSession<'a, S: DisplaySink + ?Sized, R: BufRead, W: Write> {
    sink: &'a mut S,
    shaper: &'a dyn TextShaper,
    layout: TextLayout,
    lines: LineBuffer,
    pacer: RefreshPacer,
    input: R,
    output: W,
    state: SessionState,
    lines_accepted: usize,
    refreshes: usize,
}

impl<'a, S: DisplaySink + ?Sized, R: BufRead, W: Write> InteractiveSession<'a, S, R, W> {
    pub fn new(
        sink: &'a mut S,
        shaper: &'a dyn TextShaper,
        layout: TextLayout,
        min_refresh: Duration,
        input: R,
        output: W,
    ) -> Self {
        let interval = min_refresh.max(sink.capabilities().min_refresh_interval);
        let lines = LineBuffer::new(layout.max_lines());
        debug!(
            "Text session: {} lines max, spacing {}px, refresh interval {:?}",
            lines.capacity(),
            layout.line_spacing,
            interval
        );
        Self {
            sink,
            shaper,
            layout,
            lines,
            pacer: RefreshPacer::new(interval),
            input,
            output,
            state: SessionState::AwaitingInput,
            lines_accepted: 0,
            refreshes: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// Run until an empty line or end of input.
    pub fn run(mut self) -> Result<SessionSummary> {
        writeln!(self.output, "Interactive text mode.")?;
        writeln!(self.output, "Type a line and press Enter to update the display.")?;
        writeln!(self.output, "Empty line to quit.\n")?;
        info!("Interactive session started ({} lines visible)", self.lines.capacity());

        loop {
            if let SessionState::Terminated(reason) = self.step()? {
                info!(
                    "Interactive session ended ({:?}) after {} refresh(es)",
                    reason, self.refreshes
                );
                return Ok(SessionSummary {
                    lines_accepted: self.lines_accepted,
                    refreshes: self.refreshes,
                    reason,
                });
            }
        }
    }

    /// Perform one state transition and return the new state.
    pub fn step(&mut self) -> Result<SessionState> {
        self.state = match self.state {
            SessionState::AwaitingInput => self.read_line()?,
            SessionState::Rendering => {
                self.render()?;
                SessionState::AwaitingInput
            }
            done @ SessionState::Terminated(_) => done,
        };
        Ok(self.state)
    }

    fn read_line(&mut self) -> Result<SessionState> {
        write!(self.output, "{}", PROMPT)?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            writeln!(self.output)?;
            return Ok(SessionState::Terminated(Termination::EndOfInput));
        }

        // non UTF-8 terminals: bad bytes become U+FFFD, which the font skips
        let text = String::from_utf8_lossy(&raw);
        let line = text.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            writeln!(self.output, "exit")?;
            return Ok(SessionState::Terminated(Termination::EmptyLine));
        }

        if let Some(evicted) = self.lines.push(line) {
            debug!("Scrolled off: {:?}", evicted);
        }
        self.lines_accepted += 1;
        Ok(SessionState::Rendering)
    }

    fn render(&mut self) -> Result<()> {
        let frame = compose(self.lines.iter(), &self.layout, self.shaper);
        let buffer = self.sink.to_buffer(&frame)?;
        self.pacer.wait();
        self.sink.display(&buffer)?;
        self.refreshes += 1;
        debug!("Refresh #{} ({} lines, {} bytes)", self.refreshes, self.lines.len(), buffer.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockDriver;
    use crate::text::MonoFontShaper;
    use std::io::Cursor;

    fn session_over<'a>(
        sink: &'a mut MockDriver,
        shaper: &'a MonoFontShaper,
        input: impl AsRef<[u8]>,
    ) -> InteractiveSession<'a, MockDriver, Cursor<Vec<u8>>, Vec<u8>> {
        let layout = TextLayout { width: 400, height: 300, margin_x: 10, margin_y: 10, line_spacing: 20 };
        InteractiveSession::new(
            sink,
            shaper,
            layout,
            Duration::ZERO,
            Cursor::new(input.as_ref().to_vec()),
            Vec::new(),
        )
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        let shaper = MonoFontShaper::default();
        let mut session = session_over(&mut sink, &shaper, "hello\n\n");

        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert_eq!(session.step().unwrap(), SessionState::Rendering);
        assert_eq!(session.refreshes(), 0);
        assert_eq!(session.step().unwrap(), SessionState::AwaitingInput);
        assert_eq!(session.refreshes(), 1);
        assert_eq!(
            session.step().unwrap(),
            SessionState::Terminated(Termination::EmptyLine)
        );
        // terminal state is sticky
        assert_eq!(
            session.step().unwrap(),
            SessionState::Terminated(Termination::EmptyLine)
        );
    }

    #[test]
    fn test_one_refresh_per_line_then_end_of_input() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        let shaper = MonoFontShaper::default();
        let summary = session_over(&mut sink, &shaper, "a\nb\r\nc").run().unwrap();

        assert_eq!(summary, SessionSummary { lines_accepted: 3, refreshes: 3, reason: Termination::EndOfInput });
        assert_eq!(sink.display_count(), 3);
    }

    #[test]
    fn test_whitespace_line_terminates_without_refresh() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        let shaper = MonoFontShaper::default();
        let summary = session_over(&mut sink, &shaper, "first\n   \t\nnever shown\n").run().unwrap();

        assert_eq!(summary.reason, Termination::EmptyLine);
        assert_eq!(summary.refreshes, 1);
        assert_eq!(sink.display_count(), 1);
    }

    #[test]
    fn test_window_keeps_last_fourteen_lines() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        let shaper = MonoFontShaper::default();
        let input: String = (0..20).map(|i| format!("line {i}\n")).collect();
        let mut session = session_over(&mut sink, &shaper, &input);

        while session.step().unwrap() != SessionState::Terminated(Termination::EndOfInput) {}

        let expected: Vec<String> = (6..20).map(|i| format!("line {i}")).collect();
        assert_eq!(session.lines().to_vec(), expected);
        assert_eq!(session.refreshes(), 20);
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        let shaper = MonoFontShaper::default();
        let mut session = session_over(&mut sink, &shaper, "  indented\n");
        session.step().unwrap();
        assert_eq!(session.lines().to_vec(), vec!["  indented".to_string()]);
    }

    #[test]
    fn test_latin1_bytes_do_not_end_the_session() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        let shaper = MonoFontShaper::default();
        let mut session = session_over(&mut sink, &shaper, b"ok\ncaf\xe9\nmore\n");

        while session.step().unwrap() != SessionState::Terminated(Termination::EndOfInput) {}

        assert_eq!(session.refreshes(), 3);
        assert_eq!(
            session.lines().to_vec(),
            vec!["ok".to_string(), "caf\u{FFFD}".to_string(), "more".to_string()]
        );
    }

    #[test]
    fn test_display_failure_stops_the_session() {
        let mut sink = MockDriver::new(400, 300);
        sink.init().unwrap();
        sink.state().lock().unwrap().simulate_display_failure = true;
        let shaper = MonoFontShaper::default();
        let result = session_over(&mut sink, &shaper, "boom\n").run();
        assert!(matches!(result, Err(crate::error::RenderError::Display(_))));
    }
}
