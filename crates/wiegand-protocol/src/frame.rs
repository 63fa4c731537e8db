//! Frame values exchanged between capture, decode and publication.

use crate::transform::BitTransform;
use serde::{Deserialize, Serialize};
use std::fmt;
use wiegand_core::Bits;

/// A completed capture, as closed out by the accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    bits: Bits,
    sequence_counter: u64,
}

impl RawFrame {
    pub fn new(bits: Bits, sequence_counter: u64) -> Self {
        Self {
            bits,
            sequence_counter,
        }
    }

    pub fn bits(&self) -> &Bits {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn sequence_counter(&self) -> u64 {
        self.sequence_counter
    }
}

/// Wire layout detected for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    W26,
    W34,
    Unknown,
}

impl WireFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireFormat::W26 => "w26",
            WireFormat::W34 => "w34",
            WireFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WireFormat {
    type Err = wiegand_core::Error;

    fn from_str(s: &str) -> wiegand_core::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w26" | "26" => Ok(WireFormat::W26),
            "w34" | "34" => Ok(WireFormat::W34),
            other => Err(wiegand_core::Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Why a frame could not be decoded.
///
/// A decode failure is an ordinary outcome reported through the
/// `LastError` field, never an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameError {
    /// Length is neither 26 nor 34 and salvage found no unique window.
    LenMismatch,

    /// Length matched a layout but no transform satisfied its parity.
    ParityFail,
}

impl FrameError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameError::LenMismatch => "len_mismatch",
            FrameError::ParityFail => "parity_fail",
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of decoding one `RawFrame`.
///
/// Constructed only through [`DecodedFrame::decoded`] and
/// [`DecodedFrame::failed`], which keep the outcome consistent: a `w26`/`w34`
/// frame always carries facility and card and no error, an `unknown` frame
/// always carries an error and neither field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedFrame {
    sequence_counter: u64,
    bits: Bits,
    length: usize,
    raw_value: u64,
    facility: Option<u32>,
    card: Option<u32>,
    format: WireFormat,
    error: Option<FrameError>,
    transform: Option<BitTransform>,
    salvage_offset: Option<usize>,
}

impl DecodedFrame {
    /// A successfully decoded frame; `bits` are the normalized bits.
    pub fn decoded(
        sequence_counter: u64,
        bits: Bits,
        format: WireFormat,
        facility: u32,
        card: u32,
        transform: BitTransform,
    ) -> Self {
        debug_assert_ne!(format, WireFormat::Unknown);
        Self {
            sequence_counter,
            length: bits.len(),
            raw_value: bits.raw_value(),
            bits,
            facility: Some(facility),
            card: Some(card),
            format,
            error: None,
            transform: Some(transform),
            salvage_offset: None,
        }
    }

    /// A frame that could not be decoded; `bits` are published as received.
    pub fn failed(sequence_counter: u64, bits: Bits, error: FrameError) -> Self {
        Self {
            sequence_counter,
            length: bits.len(),
            raw_value: bits.raw_value(),
            bits,
            facility: None,
            card: None,
            format: WireFormat::Unknown,
            error: Some(error),
            transform: None,
            salvage_offset: None,
        }
    }

    pub(crate) fn with_salvage_offset(mut self, offset: Option<usize>) -> Self {
        self.salvage_offset = offset;
        self
    }

    pub fn sequence_counter(&self) -> u64 {
        self.sequence_counter
    }

    pub fn bits(&self) -> &Bits {
        &self.bits
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn raw_value(&self) -> u64 {
        self.raw_value
    }

    pub fn facility(&self) -> Option<u32> {
        self.facility
    }

    pub fn card(&self) -> Option<u32> {
        self.card
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn error(&self) -> Option<FrameError> {
        self.error
    }

    /// Error text as published: empty on success.
    pub fn error_str(&self) -> &'static str {
        self.error.map_or("", |e| e.as_str())
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Transform that satisfied parity, for decoded frames.
    pub fn transform(&self) -> Option<BitTransform> {
        self.transform
    }

    /// Start offset of the recovered window when salvage was applied.
    pub fn salvage_offset(&self) -> Option<usize> {
        self.salvage_offset
    }
}
