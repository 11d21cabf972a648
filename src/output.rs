//! # Output Configuration
//!
//! This module provides utilities for controlling CLI output appearance,
//! including color support based on terminal capabilities and user
//! preferences.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// - `--color=always`: force colors on (overrides NO_COLOR)
    /// - `--color=never`: force colors off
    /// - `--color=auto`: detect based on environment
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set (any value,
    /// including empty), `CLICOLOR=0` is set, or `TERM=dumb`; and forced
    /// on by `CLICOLOR_FORCE=1`.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag {
            "always" => true,
            "never" => false,
            _ => {
                if env::var_os("NO_COLOR").is_some() {
                    false
                } else if env::var("CLICOLOR_FORCE").map(|v| v == "1").unwrap_or(false) {
                    true
                } else if env::var("CLICOLOR").map(|v| v == "0").unwrap_or(false) {
                    false
                } else if env::var("TERM").map(|v| v == "dumb").unwrap_or(false) {
                    false
                } else {
                    console::colors_enabled()
                }
            }
        };
        OutputConfig { use_color }
    }

    /// Apply this configuration to the `console` crate's global state so
    /// styled output respects it.
    pub fn apply(&self) {
        console::set_colors_enabled(self.use_color);
    }
}
