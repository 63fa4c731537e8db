//! Shared types, defaults and configuration for the Wiegand gateway.
//!
//! Everything here is plain data: line identifiers, monotonic timestamps,
//! captured edges, bit sequences and the configuration structs consumed by
//! the capture and decode stages in `wiegand-protocol`.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{CaptureConfig, DebounceScope, DecoderConfig};
pub use error::{Error, Result};
pub use types::*;
