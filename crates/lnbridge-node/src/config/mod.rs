//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use lnbridge_core::error::{BridgeError, Result};

pub use schema::{BridgeSection, ClientConfig, InvoiceSection, PaymentSection, RetrySection};

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BridgeError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| BridgeError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
