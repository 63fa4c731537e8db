//! Edge source that replays a capture file.
//!
//! A capture is plain text, one edge per line:
//!
//! ```text
//! # door 3, 2024-05-02
//! 0 D1
//! 2000 D0
//! 4000 D1
//! ```
//!
//! The first column is the edge time in microseconds, the second the line
//! (`D0`/`D1`, or `0`/`1`). Blank lines and `#` comments are ignored.
//! Timestamps must not decrease.
//!
//! Replay runs on a virtual clock: each `wait_for_edges` call advances it by
//! `max_wait` and returns the edges that fall inside that window, so a capture
//! decodes the same way however fast the host is. Once the capture is
//! exhausted the clock keeps running for `tail` (long enough for the last
//! frame to time out), then the source reports `Disconnected`.

use crate::{HardwareError, Result, traits::EdgeSource, types::SourceInfo};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use wiegand_core::{Edge, Line, Timestamp};

const DEFAULT_TAIL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct ReplayEdgeSource {
    edges: VecDeque<Edge>,
    now: Timestamp,
    exhausted_at: Option<Timestamp>,
    tail: Duration,
    info: SourceInfo,
}

impl ReplayEdgeSource {
    /// Replay `edges`, which must be in time order.
    pub fn new(edges: Vec<Edge>) -> Self {
        let info = SourceInfo::new("replay", "memory").with_edge_count(edges.len());
        let now = edges.first().map_or(Timestamp::ZERO, |e| e.timestamp);
        Self {
            edges: edges.into(),
            now,
            exhausted_at: None,
            tail: DEFAULT_TAIL,
            info,
        }
    }

    /// Parse a capture from any reader.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InvalidData` naming the first bad line, or
    /// `HardwareError::Io` if reading fails.
    pub fn from_capture<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::new(parse_capture(reader)?))
    }

    /// Open and parse a capture file.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InitializationFailed` if the file cannot be
    /// opened, otherwise as [`from_capture`](Self::from_capture).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            HardwareError::initialization_failed(format!("cannot open {}: {e}", path.display()))
        })?;
        let mut source = Self::from_capture(BufReader::new(file))?;
        source.info = SourceInfo::new("replay", "capture file")
            .with_location(path.display().to_string())
            .with_edge_count(source.edges.len());
        debug!(path = %path.display(), edges = source.edges.len(), "Loaded capture");
        Ok(source)
    }

    /// How long the clock keeps running after the last edge.
    pub fn with_tail(mut self, tail: Duration) -> Self {
        self.tail = tail;
        self
    }

    pub fn remaining(&self) -> usize {
        self.edges.len()
    }
}

impl EdgeSource for ReplayEdgeSource {
    async fn wait_for_edges(&mut self, max_wait: Duration) -> Result<Vec<Edge>> {
        if self.edges.is_empty() {
            let exhausted_at = *self.exhausted_at.get_or_insert(self.now);
            if self.now.duration_since(exhausted_at) >= self.tail {
                return Err(HardwareError::disconnected("replay"));
            }
        }

        let deadline = self.now + max_wait;
        let mut batch = Vec::new();
        while let Some(edge) = self.edges.front() {
            if edge.timestamp.is_after(deadline) {
                break;
            }
            batch.extend(self.edges.pop_front());
        }
        self.now = deadline;
        Ok(batch)
    }

    fn now(&self) -> Timestamp {
        self.now
    }

    fn source_info(&self) -> SourceInfo {
        self.info.clone()
    }
}

fn parse_capture<R: BufRead>(reader: R) -> Result<Vec<Edge>> {
    let mut edges: Vec<Edge> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut fields = content.split_whitespace();
        let (Some(micros), Some(wire), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(HardwareError::invalid_data(format!(
                "line {number}: expected \"<micros> <D0|D1>\", got {content:?}"
            )));
        };
        let micros: u64 = micros.parse().map_err(|_| {
            HardwareError::invalid_data(format!("line {number}: bad timestamp {micros:?}"))
        })?;
        let wire: Line = wire
            .parse()
            .map_err(|e| HardwareError::invalid_data(format!("line {number}: {e}")))?;

        let timestamp = Timestamp::from_micros(micros);
        if let Some(previous) = edges.last()
            && previous.timestamp.is_after(timestamp)
        {
            return Err(HardwareError::invalid_data(format!(
                "line {number}: timestamp {micros} goes backwards"
            )));
        }
        edges.push(Edge::new(wire, timestamp));
    }

    Ok(edges)
}
