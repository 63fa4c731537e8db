//! Enum dispatch over the edge sources.
//!
//! `EdgeSource` has `async fn` methods and cannot be boxed as a trait
//! object; [`AnyEdgeSource`] lets the CLI pick a source at runtime while the
//! gateway stays generic.
//!
//! ```
//! use wiegand_hardware::devices::AnyEdgeSource;
//! use wiegand_hardware::replay::ReplayEdgeSource;
//! use wiegand_hardware::traits::EdgeSource;
//!
//! let source = AnyEdgeSource::Replay(ReplayEdgeSource::new(Vec::new()));
//! assert_eq!(source.source_info().name, "replay");
//! ```

use crate::mock::MockEdgeSource;
use crate::replay::ReplayEdgeSource;
use crate::traits::EdgeSource;
use crate::{Result, SourceInfo};
use std::time::Duration;
use wiegand_core::{Edge, Timestamp};

#[derive(Debug)]
#[non_exhaustive]
pub enum AnyEdgeSource {
    /// Channel-fed source for tests and the simulator.
    Mock(MockEdgeSource),

    /// Capture file replay.
    Replay(ReplayEdgeSource),
}

impl EdgeSource for AnyEdgeSource {
    async fn wait_for_edges(&mut self, max_wait: Duration) -> Result<Vec<Edge>> {
        match self {
            Self::Mock(source) => source.wait_for_edges(max_wait).await,
            Self::Replay(source) => source.wait_for_edges(max_wait).await,
        }
    }

    fn now(&self) -> Timestamp {
        match self {
            Self::Mock(source) => source.now(),
            Self::Replay(source) => source.now(),
        }
    }

    fn source_info(&self) -> SourceInfo {
        match self {
            Self::Mock(source) => source.source_info(),
            Self::Replay(source) => source.source_info(),
        }
    }
}

impl From<MockEdgeSource> for AnyEdgeSource {
    fn from(source: MockEdgeSource) -> Self {
        Self::Mock(source)
    }
}

impl From<ReplayEdgeSource> for AnyEdgeSource {
    fn from(source: ReplayEdgeSource) -> Self {
        Self::Replay(source)
    }
}
