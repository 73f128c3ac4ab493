//! Host config schema, defaults and validation.

use std::time::Duration;

use serde::Deserialize;

use runbridge_core::delegate::{TextRunDelegate, UserInfo};
use runbridge_core::error::{Result, RunBridgeError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub version: u32,

    #[serde(default)]
    pub timer: TimerSection,

    #[serde(default)]
    pub line: LineSection,

    #[serde(default)]
    pub attachments: Vec<AttachmentConfig>,
}

impl HostConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RunBridgeError::UnsupportedVersion);
        }

        self.timer.validate()?;
        self.line.validate()?;
        for (i, a) in self.attachments.iter().enumerate() {
            a.validate()
                .map_err(|e| RunBridgeError::InvalidConfig(format!("attachments[{i}]: {e}")))?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimerSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_operation")]
    pub operation: String,

    #[serde(default = "default_fire_limit")]
    pub fire_limit: u64,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            operation: default_operation(),
            fire_limit: default_fire_limit(),
        }
    }
}

impl TimerSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=60000).contains(&self.interval_ms) {
            return Err(RunBridgeError::InvalidConfig(
                "timer.interval_ms must be between 1 and 60000".into(),
            ));
        }
        if self.operation.trim().is_empty() {
            return Err(RunBridgeError::InvalidConfig(
                "timer.operation must not be empty".into(),
            ));
        }
        if !(1..=10000).contains(&self.fire_limit) {
            return Err(RunBridgeError::InvalidConfig(
                "timer.fire_limit must be between 1 and 10000".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineSection {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

impl Default for LineSection {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
        }
    }
}

impl LineSection {
    pub fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(RunBridgeError::InvalidConfig(
                "line.font_size must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

/// One inline attachment: the metrics its run delegate starts with.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachmentConfig {
    pub ascent: f64,
    pub descent: f64,
    pub width: f64,

    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

impl AttachmentConfig {
    pub fn validate(&self) -> Result<()> {
        if ![self.ascent, self.descent, self.width].iter().all(|m| m.is_finite()) {
            return Err(RunBridgeError::InvalidConfig(
                "ascent, descent and width must be finite".into(),
            ));
        }
        Ok(())
    }

    pub fn to_delegate(&self) -> TextRunDelegate {
        let d = TextRunDelegate::with_metrics(self.ascent, self.descent, self.width);
        d.set_user_info(self.user_info.clone());
        d
    }
}

fn default_interval_ms() -> u64 {
    100
}
fn default_operation() -> String {
    "tick".into()
}
fn default_fire_limit() -> u64 {
    5
}
fn default_font_size() -> f64 {
    16.0
}
