/*
 *  display/drivers/mock.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock panel driver for testing and dry runs without hardware
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

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::debug;

use crate::bitmap::MonoBitmap;
use crate::display::error::DisplayError;
use crate::display::packing::{self, DisplayBuffer};
use crate::display::traits::{check_buffer, DisplayCapabilities, DisplaySink};

/// Mock panel driver
///
/// Simulates a panel without requiring hardware. It's useful for:
/// - Unit tests
/// - Integration tests
/// - Dry runs (`driver: mock`) on a machine with no panel attached
///
/// The driver records every operation in a shared state handle so a test
/// can keep inspecting it after the driver itself has been moved into a
/// session or guard.
#[derive(Debug, Clone)]
pub struct MockDriver {
    /// Display capabilities
    capabilities: DisplayCapabilities,

    /// Shared state for testing
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of successful display() calls
    pub display_count: usize,

    /// Number of times sleep() was called
    pub sleep_count: usize,

    /// Whether the panel is awake
    pub is_initialized: bool,

    /// Whether the panel is in its low-power state
    pub is_asleep: bool,

    /// Total bytes written via display()
    pub bytes_written: usize,

    /// Last frame pushed to the panel
    pub last_buffer: Option<DisplayBuffer>,

    /// Simulate failures (for error testing)
    pub simulate_init_failure: bool,
    pub simulate_display_failure: bool,
    pub simulate_sleep_failure: bool,
}

impl MockDriver {
    /// Create a mock panel of the given resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            capabilities: DisplayCapabilities {
                name: "mock".to_string(),
                width,
                height,
                min_refresh_interval: Duration::ZERO,
            },
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Last frame shown, unpacked back into pixels
    pub fn last_frame(&self) -> Option<MonoBitmap> {
        self.lock().last_buffer.as_ref().map(packing::unpack)
    }

    pub fn display_count(&self) -> usize {
        self.lock().display_count
    }

    fn lock(&self) -> MutexGuard<'_, MockDriverState> {
        // a test that panicked while holding the lock must not hide the state
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DisplaySink for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();

        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        state.is_asleep = false;
        Ok(())
    }

    fn display(&mut self, buffer: &DisplayBuffer) -> Result<(), DisplayError> {
        check_buffer(&self.capabilities, buffer)?;

        let mut state = self.lock();
        if !state.is_initialized {
            return Err(DisplayError::NotInitialized);
        }
        if state.simulate_display_failure {
            return Err(DisplayError::Other("Simulated display failure".to_string()));
        }

        state.display_count += 1;
        state.bytes_written += buffer.len();
        state.last_buffer = Some(buffer.clone());
        debug!("mock refresh #{} ({} bytes)", state.display_count, buffer.len());
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        state.sleep_count += 1;

        if state.simulate_sleep_failure {
            return Err(DisplayError::Other("Simulated sleep failure".to_string()));
        }

        state.is_initialized = false;
        state.is_asleep = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::INK;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new(400, 300);
        assert_eq!(driver.resolution(), (400, 300));
        assert_eq!(driver.display_count(), 0);
        assert!(driver.last_frame().is_none());
    }

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new(128, 64);

        let state = driver.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        assert!(!state.lock().unwrap().is_initialized);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_driver_display_records_frame() {
        let mut driver = MockDriver::new(16, 2);
        driver.init().unwrap();

        let mut bmp = MonoBitmap::new(16, 2);
        bmp.set(3, 1, INK);
        let buf = driver.to_buffer(&bmp).unwrap();
        driver.display(&buf).unwrap();

        assert_eq!(driver.display_count(), 1);
        assert_eq!(driver.state().lock().unwrap().bytes_written, 4);
        assert_eq!(driver.last_frame(), Some(bmp));
    }

    #[test]
    fn test_mock_driver_requires_init() {
        let mut driver = MockDriver::new(8, 1);
        let buf = driver.to_buffer(&MonoBitmap::new(8, 1)).unwrap();
        assert!(matches!(driver.display(&buf), Err(DisplayError::NotInitialized)));
    }

    #[test]
    fn test_mock_driver_sleep_blocks_further_refresh() {
        let mut driver = MockDriver::new(8, 1);
        driver.init().unwrap();
        driver.sleep().unwrap();

        let buf = driver.to_buffer(&MonoBitmap::new(8, 1)).unwrap();
        assert!(driver.display(&buf).is_err());
        assert!(driver.state().lock().unwrap().is_asleep);
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new(8, 1);
        driver.init().unwrap();
        let buf = driver.to_buffer(&MonoBitmap::new(8, 1)).unwrap();

        driver.state().lock().unwrap().simulate_display_failure = true;
        assert!(driver.display(&buf).is_err());

        driver.state().lock().unwrap().simulate_display_failure = false;
        assert!(driver.display(&buf).is_ok());
    }

    #[test]
    fn test_mock_driver_rejects_wrong_bitmap_size() {
        let driver = MockDriver::new(128, 64);
        let err = driver.to_buffer(&MonoBitmap::new(64, 64)).unwrap_err();
        assert!(matches!(err, DisplayError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_mock_driver_buffer_size_mismatch() {
        let mut driver = MockDriver::new(128, 64);
        driver.init().unwrap();

        let small = packing::pack(&MonoBitmap::new(64, 64));
        assert!(matches!(
            driver.display(&small),
            Err(DisplayError::BufferSizeMismatch { expected: 1024, actual: 512 })
        ));
    }
}
