//! Protocol constants and configuration defaults.
//!
//! Wiegand has no framing bytes, so almost everything here is either a
//! frame layout length or a timing default. The timing defaults come from
//! field deployments and vary between reader vendors; they are starting
//! points for configuration, not protocol requirements.
//!
//! # Frame Layouts
//!
//! | Format | Bits | Leading parity  | Facility     | Card          | Trailing parity  |
//! |--------|------|-----------------|--------------|---------------|------------------|
//! | W26    | 26   | even over 1..=12  | bits 1..=8   | bits 9..=24   | odd over 13..=24 |
//! | W34    | 34   | even over 1..=16  | bits 1..=16  | bits 17..=32  | odd over 17..=32 |
//!
//! # Usage
//!
//! ```
//! use wiegand_core::constants::*;
//!
//! assert_eq!(W26_BITS, 26);
//! assert!(DEFAULT_MAX_FRAME_BITS < FRAME_CAPACITY_BITS);
//!
//! use std::time::Duration;
//! let timeout = Duration::from_millis(DEFAULT_FRAME_TIMEOUT_MS);
//! assert_eq!(timeout.as_millis(), 50);
//! ```

// ============================================================================
// Frame Layouts
// ============================================================================

/// Length of a standard 26-bit Wiegand frame.
pub const W26_BITS: usize = 26;

/// Length of a 34-bit Wiegand frame.
pub const W34_BITS: usize = 34;

/// Shortest capture considered for 26-bit salvage.
pub const SALVAGE_MIN_BITS: usize = 24;

/// Longest capture considered for 26-bit salvage.
pub const SALVAGE_MAX_BITS: usize = 32;

// ============================================================================
// Capture Limits
// ============================================================================

/// Size of the pulse train buffer.
///
/// A frame stores at most `FRAME_CAPACITY_BITS - 1` bits; longer bursts are
/// truncated and still reported.
pub const FRAME_CAPACITY_BITS: usize = 256;

/// Default maximum number of bits stored per frame.
pub const DEFAULT_MAX_FRAME_BITS: usize = FRAME_CAPACITY_BITS - 1;

/// Default minimum frame length; shorter captures are treated as line noise.
pub const DEFAULT_MIN_FRAME_BITS: usize = 8;

// ============================================================================
// Timing Defaults
// ============================================================================

/// Default debounce threshold in microseconds.
///
/// Readers pulse for roughly 50-100µs every 1-2ms. Deployments with noisy
/// cabling have used 400µs.
pub const DEFAULT_MIN_PULSE_INTERVAL_US: u64 = 100;

/// Default idle window (milliseconds) that terminates a frame.
pub const DEFAULT_FRAME_TIMEOUT_MS: u64 = 50;

/// Default bounded wait on the edge source (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Upper bound for the edge source wait (milliseconds).
///
/// Longer waits delay idle-timeout close-out when no further edges arrive.
pub const MAX_POLL_INTERVAL_MS: u64 = 100;

// ============================================================================
// Publication Schema
// ============================================================================

/// Default device identifier used in topics.
pub const DEFAULT_DEVICE_ID: &str = "wiegand";

/// Maximum device identifier length.
pub const MAX_DEVICE_ID_LENGTH: usize = 63;

/// Root of the device topic hierarchy.
pub const TOPIC_ROOT: &str = "/devices";

/// Human readable device name published as meta.
pub const DEVICE_META_NAME: &str = "Wiegand";

/// Driver name published as meta.
pub const DEVICE_META_DRIVER: &str = "wiegand-gateway";

/// Sentinel published for an absent facility code or card number.
pub const UNSET_FIELD_SENTINEL: i64 = -1;

/// Default config file location used by the CLI when `--config` is omitted.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/wiegand-gateway.toml";
