//! Gateway errors.
//!
//! Only setup problems surface as `GatewayError`; per-frame failures are
//! published values and per-read or per-publish failures are logged and
//! counted by the loop.

use wiegand_hardware::HardwareError;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Invalid capture or decoder configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] wiegand_core::Error),

    /// Edge source or sink failure during setup.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),
}
