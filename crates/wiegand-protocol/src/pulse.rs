//! Edge debouncing.
//!
//! Contact bounce and crosstalk between the two open-drain lines produce
//! bursts of spurious edges a few microseconds apart. A reader's real pulses
//! are at least several hundred microseconds apart, so anything arriving
//! inside `min_interval` of the last accepted edge is dropped.

use std::time::Duration;
use wiegand_core::{CaptureConfig, DebounceScope, Edge, Timestamp};

/// Rejects edges that arrive too soon after the previous accepted edge.
///
/// Rejection has no side effect: the baseline only moves on acceptance, so
/// a steady stream of bounce cannot push a real pulse out indefinitely.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wiegand_core::{DebounceScope, Edge, Line, Timestamp};
/// use wiegand_protocol::PulseFilter;
///
/// let mut filter = PulseFilter::new(Duration::from_micros(100), DebounceScope::Shared);
///
/// assert!(filter.accept(&Edge::new(Line::D0, Timestamp::from_micros(0))));
/// assert!(!filter.accept(&Edge::new(Line::D1, Timestamp::from_micros(40))));
/// assert!(filter.accept(&Edge::new(Line::D1, Timestamp::from_micros(2_000))));
/// ```
#[derive(Debug, Clone)]
pub struct PulseFilter {
    min_interval: Duration,
    scope: DebounceScope,
    /// Last accepted edge, indexed by `Line::index()`; slot 0 doubles as the
    /// shared baseline.
    last_accepted: [Option<Timestamp>; 2],
}

impl PulseFilter {
    pub fn new(min_interval: Duration, scope: DebounceScope) -> Self {
        Self {
            min_interval,
            scope,
            last_accepted: [None, None],
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.min_pulse_interval(), config.debounce_scope)
    }

    /// Decide whether `edge` is a real pulse, updating the baseline if so.
    pub fn accept(&mut self, edge: &Edge) -> bool {
        let slot = self.slot(edge);
        if let Some(last) = self.last_accepted[slot]
            && edge.timestamp.duration_since(last) < self.min_interval
        {
            return false;
        }
        self.last_accepted[slot] = Some(edge.timestamp);
        true
    }

    /// Baseline that applies to `edge`, if any edge has been accepted yet.
    pub fn last_accepted_for(&self, edge: &Edge) -> Option<Timestamp> {
        self.last_accepted[self.slot(edge)]
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    fn slot(&self, edge: &Edge) -> usize {
        match self.scope {
            DebounceScope::Shared => 0,
            DebounceScope::PerLine => edge.line.index(),
        }
    }
}
