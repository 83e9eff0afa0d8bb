/*
 *  display/factory.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Build the configured panel driver
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

use log::info;

use crate::config::{Config, DriverKind};
use crate::display::drivers::mock::MockDriver;
use crate::display::drivers::snapshot::SnapshotDriver;
use crate::display::error::DisplayFactoryError;
use crate::display::traits::DisplaySink;

/// Type alias for boxed panel trait objects
pub type BoxedDriver = Box<dyn DisplaySink>;

/// Factory for creating panel drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// Create a panel driver from configuration
    ///
    /// The driver is constructed but not initialised; `DisplayGuard::acquire`
    /// does that so the matching sleep is guaranteed.
    pub fn create_from_config(config: &Config) -> Result<BoxedDriver, DisplayFactoryError> {
        let (width, height) = config.panel_size();
        if width == 0 || height == 0 {
            return Err(DisplayFactoryError::InvalidGeometry { width, height });
        }

        match config.driver() {
            DriverKind::Snapshot => {
                let dir = config.output_dir();
                if dir.as_os_str().is_empty() {
                    return Err(DisplayFactoryError::MissingOutputDir);
                }
                info!("Creating snapshot driver {}x{} -> {}", width, height, dir.display());
                Ok(Box::new(SnapshotDriver::new(width, height, dir)))
            }
            DriverKind::Mock => {
                info!("Creating mock driver {}x{} (dry run)", width, height);
                Ok(Box::new(MockDriver::new(width, height)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_builds_snapshot_driver() {
        let driver = DisplayDriverFactory::create_from_config(&Config::default()).unwrap();
        assert_eq!(driver.resolution(), (400, 300));
        assert_eq!(driver.capabilities().name, "snapshot");
    }

    #[test]
    fn test_configured_refresh_delay_is_not_a_panel_capability() {
        let cfg = Config {
            display: Some(DisplayConfig { min_refresh_ms: Some(2500), ..Default::default() }),
            ..Default::default()
        };
        let driver = DisplayDriverFactory::create_from_config(&cfg).unwrap();
        assert_eq!(driver.capabilities().min_refresh_interval, std::time::Duration::ZERO);
        assert_eq!(cfg.min_refresh(), std::time::Duration::from_millis(2500));
    }

    #[test]
    fn test_mock_driver_selection() {
        let cfg = Config {
            display: Some(DisplayConfig {
                width: Some(296),
                height: Some(128),
                driver: Some(DriverKind::Mock),
                ..Default::default()
            }),
            ..Default::default()
        };
        let driver = DisplayDriverFactory::create_from_config(&cfg).unwrap();
        assert_eq!(driver.resolution(), (296, 128));
        assert_eq!(driver.capabilities().name, "mock");
    }

    #[test]
    fn test_empty_output_dir_is_rejected() {
        let cfg = Config {
            display: Some(DisplayConfig {
                output_dir: Some(PathBuf::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            DisplayDriverFactory::create_from_config(&cfg),
            Err(DisplayFactoryError::MissingOutputDir)
        ));
    }

    #[test]
    fn test_zero_geometry_is_rejected() {
        let cfg = Config {
            display: Some(DisplayConfig { width: Some(0), ..Default::default() }),
            ..Default::default()
        };
        assert!(matches!(
            DisplayDriverFactory::create_from_config(&cfg),
            Err(DisplayFactoryError::InvalidGeometry { width: 0, height: 300 })
        ));
    }
}
