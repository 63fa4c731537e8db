//! Capture and decode configuration.
//!
//! Both structs deserialize with `#[serde(default)]`, so a config file only
//! needs the keys it overrides:
//!
//! ```toml
//! [capture]
//! min_pulse_interval_us = 400
//! swap_lines = true
//! ```
//!
//! ```
//! use wiegand_core::{CaptureConfig, Line};
//!
//! let capture = CaptureConfig {
//!     min_pulse_interval_us: 400,
//!     swap_lines: true,
//!     ..CaptureConfig::default()
//! };
//! assert_eq!(capture.effective_one_line(), Line::D0);
//! assert!(capture.validate().is_ok());
//! ```

use crate::constants::{
    DEFAULT_FRAME_TIMEOUT_MS, DEFAULT_MAX_FRAME_BITS, DEFAULT_MIN_FRAME_BITS,
    DEFAULT_MIN_PULSE_INTERVAL_US, DEFAULT_POLL_INTERVAL_MS, FRAME_CAPACITY_BITS,
    MAX_POLL_INTERVAL_MS,
};
use crate::{Error, Line, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which edges share a debounce baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebounceScope {
    /// One baseline for both lines: an edge on D1 right after an edge on D0
    /// is treated as bounce.
    #[default]
    Shared,

    /// Independent baseline per line.
    PerLine,
}

/// Settings for the pulse filter and frame accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Edges closer than this to the previous accepted edge are dropped.
    pub min_pulse_interval_us: u64,

    /// Whether the debounce baseline is shared by both lines.
    pub debounce_scope: DebounceScope,

    /// Silence that terminates a frame.
    pub frame_timeout_ms: u64,

    /// Frames shorter than this are discarded unreported.
    pub min_frame_bits: usize,

    /// Bits beyond this count are dropped until the frame closes.
    pub max_frame_bits: usize,

    /// Line whose pulses encode a `1`.
    pub one_line: Line,

    /// Swap the line-to-bit mapping (for miswired readers).
    pub swap_lines: bool,

    /// Discard frames whose length is not a multiple of four.
    pub nibble_aligned_only: bool,

    /// Bounded wait on the edge source per loop iteration.
    pub poll_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_pulse_interval_us: DEFAULT_MIN_PULSE_INTERVAL_US,
            debounce_scope: DebounceScope::default(),
            frame_timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
            min_frame_bits: DEFAULT_MIN_FRAME_BITS,
            max_frame_bits: DEFAULT_MAX_FRAME_BITS,
            one_line: Line::D1,
            swap_lines: false,
            nibble_aligned_only: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl CaptureConfig {
    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.frame_timeout_ms == 0 {
            return Err(Error::Config("frame_timeout_ms must be > 0".to_string()));
        }
        if self.min_frame_bits == 0 {
            return Err(Error::Config("min_frame_bits must be >= 1".to_string()));
        }
        if self.max_frame_bits < self.min_frame_bits {
            return Err(Error::Config(format!(
                "max_frame_bits ({}) must be >= min_frame_bits ({})",
                self.max_frame_bits, self.min_frame_bits
            )));
        }
        if self.max_frame_bits >= FRAME_CAPACITY_BITS {
            return Err(Error::Config(format!(
                "max_frame_bits must be < {FRAME_CAPACITY_BITS}, got {}",
                self.max_frame_bits
            )));
        }
        if !(1..=MAX_POLL_INTERVAL_MS).contains(&self.poll_interval_ms) {
            return Err(Error::Config(format!(
                "poll_interval_ms must be 1-{MAX_POLL_INTERVAL_MS}, got {}",
                self.poll_interval_ms
            )));
        }
        if Duration::from_micros(self.min_pulse_interval_us) >= self.frame_timeout() {
            return Err(Error::Config(
                "min_pulse_interval_us must be shorter than frame_timeout_ms".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn min_pulse_interval(&self) -> Duration {
        Duration::from_micros(self.min_pulse_interval_us)
    }

    #[must_use]
    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Line that currently encodes a `1`, after `swap_lines`.
    #[must_use]
    pub fn effective_one_line(&self) -> Line {
        if self.swap_lines {
            self.one_line.other()
        } else {
            self.one_line
        }
    }
}

/// Settings for the format decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Complement every bit before autodetection.
    pub invert_bits: bool,

    /// Reverse bit order before autodetection.
    pub reverse_bits: bool,

    /// Try to recover a 26-bit frame from captures of 24-32 bits.
    pub salvage: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            invert_bits: false,
            reverse_bits: false,
            salvage: true,
        }
    }
}
