/*
 *  config.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration: defaults, YAML file, command line
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

use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::build_info::LONG_VERSION;

// 4.2" WeAct / Waveshare V2 panel
pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;
pub const DEFAULT_MARGIN_X: u32 = 10;
pub const DEFAULT_MARGIN_Y: u32 = 10;
pub const DEFAULT_THRESHOLD: u8 = 128;
pub const DEFAULT_MIN_REFRESH_MS: u64 = 100;
pub const DEFAULT_OUTPUT_DIR: &str = "frames";

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
    pub text: Option<TextConfig>,
    pub image: Option<ImageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub driver: Option<DriverKind>,
    pub output_dir: Option<PathBuf>,  // snapshot driver only
    pub min_refresh_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TextConfig {
    pub margin_x: Option<u32>,
    pub margin_y: Option<u32>,
    pub line_spacing: Option<u32>,    // None: font line height + 4
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ImageConfig {
    pub threshold: Option<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// PNG frames in a directory
    #[default]
    Snapshot,
    /// Recording driver, nothing leaves the process
    Mock,
}

/// Command line. Mode flags plus overrides layered over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(
    name = "inkslate",
    version,
    long_version = LONG_VERSION,
    about = "4.2\" e-paper: interactive text or a fullscreen image"
)]
pub struct Cli {
    /// Image to show fullscreen (image mode)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub image: Option<PathBuf>,
    /// Disable dithering (hard threshold)
    #[arg(long, action = ArgAction::SetTrue)]
    pub nodither: bool,
    /// Image rotation in degrees (0, 90, 180, 270)
    #[arg(long, default_value_t = 0)]
    pub rotate: u16,
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Verbose logging
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn panel_size(&self) -> (u32, u32) {
        let d = self.display.as_ref();
        (
            d.and_then(|d| d.width).unwrap_or(DEFAULT_WIDTH),
            d.and_then(|d| d.height).unwrap_or(DEFAULT_HEIGHT),
        )
    }

    pub fn driver(&self) -> DriverKind {
        self.display.as_ref().and_then(|d| d.driver).unwrap_or_default()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.display
            .as_ref()
            .and_then(|d| d.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn min_refresh(&self) -> Duration {
        let ms = self.display.as_ref().and_then(|d| d.min_refresh_ms).unwrap_or(DEFAULT_MIN_REFRESH_MS);
        Duration::from_millis(ms)
    }

    pub fn margins(&self) -> (u32, u32) {
        let t = self.text.as_ref();
        (
            t.and_then(|t| t.margin_x).unwrap_or(DEFAULT_MARGIN_X),
            t.and_then(|t| t.margin_y).unwrap_or(DEFAULT_MARGIN_Y),
        )
    }

    pub fn line_spacing(&self) -> Option<u32> {
        self.text.as_ref().and_then(|t| t.line_spacing)
    }

    pub fn threshold(&self) -> u8 {
        self.image.as_ref().and_then(|i| i.threshold).unwrap_or(DEFAULT_THRESHOLD)
    }
}

/// Public entry point: read YAML, merge CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Pretty YAML of the effective config (nice for debugging)
pub fn dump(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/inkslate/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/inkslate/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/inkslate.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["inkslate.yaml", "config/inkslate.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    match (&mut dst.text, src.text) {
        (None, Some(c)) => dst.text = Some(c),
        (Some(d), Some(s)) => merge_text(d, s),
        _ => {}
    }
    match (&mut dst.image, src.image) {
        (None, Some(c)) => dst.image = Some(c),
        (Some(d), Some(s)) => {
            if s.threshold.is_some() { d.threshold = s.threshold; }
        }
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()          { dst.width = src.width; }
    if src.height.is_some()         { dst.height = src.height; }
    if src.driver.is_some()         { dst.driver = src.driver; }
    if src.output_dir.is_some()     { dst.output_dir = src.output_dir; }
    if src.min_refresh_ms.is_some() { dst.min_refresh_ms = src.min_refresh_ms; }
}

fn merge_text(dst: &mut TextConfig, src: TextConfig) {
    if src.margin_x.is_some()     { dst.margin_x = src.margin_x; }
    if src.margin_y.is_some()     { dst.margin_y = src.margin_y; }
    if src.line_spacing.is_some() { dst.line_spacing = src.line_spacing; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }

    if (cli.driver.is_some() || cli.output_dir.is_some()) && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.driver.is_some()     { display.driver = cli.driver; }
        if cli.output_dir.is_some() { display.output_dir = cli.output_dir.clone(); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let (w, h) = cfg.panel_size();
    if w == 0 || h == 0 {
        return Err(ConfigError::Validation("display width/height must be > 0".into()));
    }
    let (mx, my) = cfg.margins();
    if mx >= w || my >= h {
        return Err(ConfigError::Validation(format!(
            "text margins {}x{} leave no room on a {}x{} panel", mx, my, w, h
        )));
    }
    if cfg.line_spacing() == Some(0) {
        return Err(ConfigError::Validation("text line_spacing must be > 0".into()));
    }
    Ok(())
}
