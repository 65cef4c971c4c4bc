use serde::Deserialize;

use lnbridge_core::error::{BridgeError, Result};
use lnbridge_core::rpc::lightning::PaymentFailureReason;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub bridge: BridgeSection,

    #[serde(default)]
    pub payment: PaymentSection,

    #[serde(default)]
    pub invoice: InvoiceSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            bridge: BridgeSection::default(),
            payment: PaymentSection::default(),
            invoice: InvoiceSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BridgeError::UnsupportedVersion);
        }

        self.bridge.validate()?;
        self.payment.validate()?;
        self.invoice.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSection {
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

impl BridgeSection {
    pub fn validate(&self) -> Result<()> {
        if !(16..=65536).contains(&self.event_queue_capacity) {
            return Err(BridgeError::Config(
                "bridge.event_queue_capacity must be between 16 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_event_queue_capacity() -> usize {
    1024
}

/// Defaults applied to SendPaymentV2 requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentSection {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: i32,

    #[serde(default = "default_fee_limit_sat")]
    pub fee_limit_sat: i64,

    #[serde(default)]
    pub cltv_limit: i32,

    #[serde(default = "default_max_parts")]
    pub max_parts: u32,

    #[serde(default)]
    pub retry: RetrySection,
}

impl Default for PaymentSection {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            fee_limit_sat: default_fee_limit_sat(),
            cltv_limit: 0,
            max_parts: default_max_parts(),
            retry: RetrySection::default(),
        }
    }
}

impl PaymentSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.timeout_seconds) {
            return Err(BridgeError::Config(
                "payment.timeout_seconds must be between 1 and 3600".into(),
            ));
        }
        if self.fee_limit_sat < 0 {
            return Err(BridgeError::Config("payment.fee_limit_sat must not be negative".into()));
        }
        if self.cltv_limit < 0 {
            return Err(BridgeError::Config("payment.cltv_limit must not be negative".into()));
        }
        if !(1..=128).contains(&self.max_parts) {
            return Err(BridgeError::Config(
                "payment.max_parts must be between 1 and 128".into(),
            ));
        }
        self.retry.validate()
    }
}

fn default_timeout_seconds() -> i32 {
    60
}
fn default_fee_limit_sat() -> i64 {
    50000
}
fn default_max_parts() -> u32 {
    16
}

/// Initial flags of the retry tree and the reasons that enter it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    #[serde(default = "default_true")]
    pub reset_routing_data: bool,

    #[serde(default = "default_true")]
    pub refresh_edges: bool,

    #[serde(default = "default_retryable_reasons")]
    pub retryable_reasons: Vec<PaymentFailureReason>,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            reset_routing_data: true,
            refresh_edges: true,
            retryable_reasons: default_retryable_reasons(),
        }
    }
}

impl RetrySection {
    pub fn validate(&self) -> Result<()> {
        if self.retryable_reasons.contains(&PaymentFailureReason::None) {
            return Err(BridgeError::Config(
                "payment.retry.retryable_reasons must not contain none".into(),
            ));
        }
        Ok(())
    }

    pub fn is_retryable(&self, reason: PaymentFailureReason) -> bool {
        self.retryable_reasons.contains(&reason)
    }
}

fn default_true() -> bool {
    true
}
fn default_retryable_reasons() -> Vec<PaymentFailureReason> {
    vec![PaymentFailureReason::NoRoute, PaymentFailureReason::InsufficientBalance]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvoiceSection {
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: i64,
}

impl Default for InvoiceSection {
    fn default() -> Self {
        Self {
            expiry_seconds: default_expiry_seconds(),
        }
    }
}

impl InvoiceSection {
    pub fn validate(&self) -> Result<()> {
        if self.expiry_seconds <= 0 {
            return Err(BridgeError::Config("invoice.expiry_seconds must be positive".into()));
        }
        Ok(())
    }
}

fn default_expiry_seconds() -> i64 {
    3600
}
