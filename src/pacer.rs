/*
 *  pacer.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Keeps full refreshes from arriving faster than the panel can take them
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
use std::time::{Duration, Instant};

pub struct RefreshPacer {
    next_deadline: Option<Instant>,
    interval: Duration,
}

// e-paper full refresh takes seconds, the interval only guards against
// a pasted block of lines hammering the controller back to back
impl RefreshPacer {
    pub fn new(interval: Duration) -> Self {
        Self { next_deadline: None, interval }
    }

    /// Time left before the next refresh may start.
    pub fn remaining(&self) -> Duration {
        match self.next_deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    /// Block until a refresh is allowed, then schedule the one after it.
    /// The first call never blocks.
    pub fn wait(&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.next_deadline = Some(Instant::now() + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_wait_is_immediate() {
        let mut pacer = RefreshPacer::new(Duration::from_secs(5));
        let start = Instant::now();
        pacer.wait();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(pacer.remaining() > Duration::from_secs(3));
    }

    #[test]
    fn test_second_wait_honours_interval() {
        let mut pacer = RefreshPacer::new(Duration::from_millis(30));
        pacer.wait();
        let start = Instant::now();
        pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_zero_interval_never_blocks() {
        let mut pacer = RefreshPacer::new(Duration::ZERO);
        pacer.wait();
        assert_eq!(pacer.remaining(), Duration::ZERO);
    }
}
