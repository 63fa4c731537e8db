//! Timeout-driven frame assembly.
//!
//! Wiegand has no end-of-frame marker: a frame ends when the lines go quiet.
//! The accumulator appends one bit per accepted edge and closes the frame
//! when either
//!
//! - the next accepted edge arrives more than `frame_timeout` after the
//!   previous one (checked in [`FrameAccumulator::push`], before the new bit
//!   is appended), or
//! - a periodic [`FrameAccumulator::poll`] finds the frame idle for at least
//!   `frame_timeout`.
//!
//! # States
//!
//! - `Idle`: no bits captured
//! - `Accumulating`: at least one bit captured, waiting for more or for the
//!   idle timeout
//!
//! Close-out is transient: the frame is either emitted as a [`RawFrame`] with
//! the next sequence counter, or discarded (too short, or not nibble aligned
//! when that check is enabled) without consuming a counter value.

use crate::frame::RawFrame;
use crate::pulse::PulseFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace, warn};
use wiegand_core::{Bits, CaptureConfig, Edge, Line, Timestamp};

/// Accumulator state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulatorState {
    Idle,
    Accumulating,
}

impl fmt::Display for AccumulatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccumulatorState::Idle => write!(f, "Idle"),
            AccumulatorState::Accumulating => write!(f, "Accumulating"),
        }
    }
}

/// Counters for edges and frames that never reach the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorStats {
    /// Edges dropped by the pulse filter.
    pub rejected_edges: u64,

    /// Bits dropped because the frame was already at `max_frame_bits`.
    pub dropped_bits: u64,

    /// Frames closed out below `min_frame_bits` or failing nibble alignment.
    pub discarded_frames: u64,
}

/// Assembles filtered edges into frames.
///
/// Owns the in-flight pulse train and the sequence counter; nothing else
/// mutates them.
#[derive(Debug)]
pub struct FrameAccumulator {
    filter: PulseFilter,
    one_line: Line,
    frame_timeout: Duration,
    min_frame_bits: usize,
    max_frame_bits: usize,
    nibble_aligned_only: bool,
    bits: Bits,
    last_edge: Option<Timestamp>,
    overflowed: bool,
    sequence_counter: u64,
    stats: AccumulatorStats,
}

impl FrameAccumulator {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            filter: PulseFilter::from_config(&config),
            one_line: config.effective_one_line(),
            frame_timeout: config.frame_timeout(),
            min_frame_bits: config.min_frame_bits,
            max_frame_bits: config.max_frame_bits,
            nibble_aligned_only: config.nibble_aligned_only,
            bits: Bits::with_capacity(config.max_frame_bits),
            last_edge: None,
            overflowed: false,
            sequence_counter: 0,
            stats: AccumulatorStats::default(),
        }
    }

    /// Feed one edge.
    ///
    /// Returns the previous frame if this edge arrived after it had gone
    /// idle and it was long enough to emit.
    pub fn push(&mut self, edge: Edge) -> Option<RawFrame> {
        if !self.filter.accept(&edge) {
            self.stats.rejected_edges += 1;
            trace!(line = %edge.line, at = %edge.timestamp, "Edge rejected by debounce");
            return None;
        }

        let emitted = match self.last_edge {
            Some(last)
                if !self.bits.is_empty()
                    && edge.timestamp.duration_since(last) > self.frame_timeout =>
            {
                self.close_out()
            }
            _ => None,
        };

        self.last_edge = Some(edge.timestamp);
        if self.bits.len() >= self.max_frame_bits {
            self.stats.dropped_bits += 1;
            if !self.overflowed {
                self.overflowed = true;
                warn!(
                    max_frame_bits = self.max_frame_bits,
                    "Frame capacity reached, dropping further bits"
                );
            }
        } else {
            self.bits.push(edge.line == self.one_line);
        }

        emitted
    }

    /// Close the frame if it has been idle for at least `frame_timeout` at
    /// `now`.
    pub fn poll(&mut self, now: Timestamp) -> Option<RawFrame> {
        let last = self.last_edge?;
        if self.bits.is_empty() || now.duration_since(last) < self.frame_timeout {
            return None;
        }
        self.close_out()
    }

    /// Instant at which the current frame times out, if one is in progress.
    pub fn deadline(&self) -> Option<Timestamp> {
        match self.state() {
            AccumulatorState::Accumulating => self.last_edge.map(|last| last + self.frame_timeout),
            AccumulatorState::Idle => None,
        }
    }

    pub fn state(&self) -> AccumulatorState {
        if self.bits.is_empty() {
            AccumulatorState::Idle
        } else {
            AccumulatorState::Accumulating
        }
    }

    /// Counter of the most recently emitted frame; 0 before the first.
    pub fn sequence_counter(&self) -> u64 {
        self.sequence_counter
    }

    pub fn pending_bits(&self) -> usize {
        self.bits.len()
    }

    pub fn stats(&self) -> AccumulatorStats {
        self.stats
    }

    fn close_out(&mut self) -> Option<RawFrame> {
        let len = self.bits.len();
        let bits = std::mem::replace(&mut self.bits, Bits::with_capacity(self.max_frame_bits));
        self.last_edge = None;
        self.overflowed = false;

        if len < self.min_frame_bits {
            self.stats.discarded_frames += 1;
            debug!(len, min = self.min_frame_bits, "Discarding short frame");
            return None;
        }
        if self.nibble_aligned_only && len % 4 != 0 {
            self.stats.discarded_frames += 1;
            debug!(len, "Discarding frame that is not nibble aligned");
            return None;
        }

        self.sequence_counter += 1;
        debug!(len, counter = self.sequence_counter, "Frame complete");
        Some(RawFrame::new(bits, self.sequence_counter))
    }
}
