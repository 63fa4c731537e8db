//! Shared helpers for the protocol integration tests.
//!
//! Helpers come in two kinds:
//!
//! 1. **Signal builders** (`edges_*`) turn bit strings into timed edges the
//!    way a reader would pulse them.
//! 2. **Pipeline drivers** (`capture_*`, `decode_*`) push those edges
//!    through the accumulator and decoder.

#![allow(dead_code)]

use std::time::Duration;
use wiegand_core::{Bits, CaptureConfig, DecoderConfig, Edge, Line, Timestamp};
use wiegand_protocol::{DecodedFrame, FormatDecoder, FrameAccumulator, RawFrame};

/// Typical reader spacing between pulses.
pub const BIT_SPACING: Duration = Duration::from_millis(2);

/// Parse a `0`/`1` string, panicking on anything else.
pub fn bits(text: &str) -> Bits {
    text.parse().expect("test bit strings contain only 0 and 1")
}

/// Edges for `bits`, `spacing` apart from `start`, pulsing `one_line` for a `1`.
pub fn edges_for(bits: &Bits, one_line: Line, start: Timestamp, spacing: Duration) -> Vec<Edge> {
    bits.iter()
        .enumerate()
        .map(|(i, bit)| {
            let line = if bit { one_line } else { one_line.other() };
            Edge::new(line, start + spacing * i as u32)
        })
        .collect()
}

/// Edges for `bits` with default wiring and spacing.
pub fn edges(bits: &Bits, start: Timestamp) -> Vec<Edge> {
    edges_for(bits, Line::D1, start, BIT_SPACING)
}

/// Push every edge, collecting frames closed out along the way.
pub fn push_all(accumulator: &mut FrameAccumulator, edges: &[Edge]) -> Vec<RawFrame> {
    edges
        .iter()
        .filter_map(|edge| accumulator.push(*edge))
        .collect()
}

/// Capture a single transmission with default settings.
pub fn capture_one(bits: &Bits) -> RawFrame {
    let mut accumulator = FrameAccumulator::new(CaptureConfig::default());
    let edges = edges(bits, Timestamp::ZERO);
    assert!(push_all(&mut accumulator, &edges).is_empty());
    accumulator
        .poll(Timestamp::from_millis(10_000))
        .expect("frame long enough to emit")
}

/// Capture and decode a single transmission.
pub fn decode_signal(bits: &Bits, config: DecoderConfig) -> DecodedFrame {
    FormatDecoder::new(config).decode(&capture_one(bits))
}

/// Decode a bit string directly, counter 1.
pub fn decode_text(text: &str) -> DecodedFrame {
    FormatDecoder::default().decode(&RawFrame::new(bits(text), 1))
}
