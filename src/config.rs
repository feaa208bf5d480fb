//! Widget configuration supplied by the host page.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::Deserialize;

use crate::state::chat::{DEFAULT_AUTO_REPLY, DEFAULT_GREETING};

pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

/// Longest delay a browser timer honours; larger values fire immediately.
pub const MAX_REPLY_DELAY_MS: u64 = 2_147_483_647;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid widget config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config field `{field}` must not be blank")]
    Blank { field: &'static str },
    #[error("reply_delay_ms {value} exceeds maximum of {max}")]
    DelayTooLong { value: u64, max: u64 },
}

/// What happens to replies still waiting on their timer when the widget is
/// torn down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownPolicy {
    /// Let pending replies fire against the detached state.
    #[default]
    Detach,
    /// Cancel pending replies.
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatWidgetConfig {
    pub greeting: String,
    pub auto_reply: String,
    pub reply_delay_ms: u64,
    pub teardown: TeardownPolicy,
}

impl Default for ChatWidgetConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_owned(),
            auto_reply: DEFAULT_AUTO_REPLY.to_owned(),
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            teardown: TeardownPolicy::default(),
        }
    }
}

impl ChatWidgetConfig {
    /// Parse config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, otherwise whatever
    /// [`Self::validate`] reports.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Blank`] when `greeting` or `auto_reply` is blank
    /// and [`ConfigError::DelayTooLong`] when `reply_delay_ms` exceeds
    /// [`MAX_REPLY_DELAY_MS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.greeting.trim().is_empty() {
            return Err(ConfigError::Blank { field: "greeting" });
        }
        if self.auto_reply.trim().is_empty() {
            return Err(ConfigError::Blank { field: "auto_reply" });
        }
        if self.reply_delay_ms > MAX_REPLY_DELAY_MS {
            return Err(ConfigError::DelayTooLong {
                value: self.reply_delay_ms,
                max: MAX_REPLY_DELAY_MS,
            });
        }
        Ok(())
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}
