//! Console configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! history_capacity = 500
//! mute_in_background = false
//! caret_on_blur = "hide"
//!
//! [background]
//! r = 250
//! g = 245
//! b = 230
//! ```

use crate::buffer::Rgb;
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// What the caret does while the application is in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaretBlurPolicy {
    /// Stop blinking and hide the caret.
    Hide,
    /// Stop blinking and leave the caret drawn.
    Show,
}

impl Default for CaretBlurPolicy {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Hide
        } else {
            Self::Show
        }
    }
}

/// Configuration for a [`Console`](crate::Console).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum number of remembered input lines.
    pub history_capacity: usize,
    /// Full caret blink cycle in milliseconds. Values of 1 or less turn
    /// blinking off.
    pub cursor_flash_ms: u64,
    /// Mute audio when the application loses focus.
    pub mute_in_background: bool,
    /// How long focus must stay lost before muting.
    pub mute_delay_ms: u64,
    /// Give the display a moment after every scroll.
    pub soft_scrolling: bool,
    /// With soft scrolling, pause for `soft_scroll_pause_ms` instead of
    /// merely letting the host process one round of events.
    pub extra_smooth_scrolling: bool,
    /// Pause used by extra smooth scrolling.
    pub soft_scroll_pause_ms: u64,
    /// Caret behaviour while unfocused.
    pub caret_on_blur: CaretBlurPolicy,
    /// Initial text colour.
    pub foreground: Rgb,
    /// Initial background colour.
    pub background: Rgb,
    /// Maximum gap between two clicks of a double click.
    pub double_click_ms: u64,
    /// Upper bound on a single wait for host events, so session shutdown
    /// is noticed even when no timer is armed.
    pub idle_poll_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            history_capacity: 200,
            cursor_flash_ms: 1000,
            mute_in_background: true,
            mute_delay_ms: 60,
            soft_scrolling: false,
            extra_smooth_scrolling: false,
            soft_scroll_pause_ms: 59,
            caret_on_blur: CaretBlurPolicy::default(),
            foreground: Rgb::DEFAULT_FG,
            background: Rgb::DEFAULT_BG,
            double_click_ms: 400,
            idle_poll_ms: 100,
        }
    }
}

impl ConsoleConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    /// Check that values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(ConsoleError::ConfigValue {
                field: "history_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.idle_poll_ms == 0 {
            return Err(ConsoleError::ConfigValue {
                field: "idle_poll_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Caret blink half period, or `None` when blinking is disabled.
    pub const fn blink_interval(&self) -> Option<Duration> {
        if self.cursor_flash_ms > 1 {
            Some(Duration::from_millis(self.cursor_flash_ms / 2))
        } else {
            None
        }
    }

    /// Delay before a background mute takes effect.
    pub const fn mute_delay(&self) -> Duration {
        Duration::from_millis(self.mute_delay_ms)
    }

    /// Pause after a scroll in extra smooth mode.
    pub const fn soft_scroll_pause(&self) -> Duration {
        Duration::from_millis(self.soft_scroll_pause_ms)
    }

    /// Double click window.
    pub const fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Longest single wait on the host.
    pub const fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}
