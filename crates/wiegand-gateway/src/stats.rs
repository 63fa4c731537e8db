//! Loop counters.

use serde::{Deserialize, Serialize};
use std::fmt;
use wiegand_protocol::AccumulatorStats;

/// Counters accumulated over one gateway run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayStats {
    /// Frames handed to the decoder.
    pub frames_emitted: u64,

    /// Frames decoded as W26 or W34.
    pub frames_decoded: u64,

    /// Frames published with `len_mismatch` or `parity_fail`.
    pub frames_failed: u64,

    /// Edge reads that failed and were skipped.
    pub read_errors: u64,

    /// Individual publications the sink refused.
    pub publish_failures: u64,

    pub accumulator: AccumulatorStats,
}

impl fmt::Display for GatewayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames ({} decoded, {} failed), {} read errors, {} publish failures, \
             {} edges debounced, {} frames discarded",
            self.frames_emitted,
            self.frames_decoded,
            self.frames_failed,
            self.read_errors,
            self.publish_failures,
            self.accumulator.rejected_edges,
            self.accumulator.discarded_frames,
        )
    }
}
