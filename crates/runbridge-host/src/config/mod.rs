//! Host config loader (strict parsing).

pub mod schema;

use std::fs;

use runbridge_core::error::{Result, RunBridgeError};

pub use schema::{AttachmentConfig, HostConfig, LineSection, TimerSection};

pub fn load_from_file(path: &str) -> Result<HostConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RunBridgeError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<HostConfig> {
    let cfg: HostConfig = serde_yaml::from_str(s)
        .map_err(|e| RunBridgeError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
