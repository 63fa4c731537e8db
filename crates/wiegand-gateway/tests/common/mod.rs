//! Shared helpers for the gateway integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;
use wiegand_core::{Bits, Edge, Line, Timestamp};
use wiegand_hardware::{EdgeSource, HardwareError, Result, SourceInfo};

pub const W26_123_45678: &str = "10111101110110010011011101";

pub fn topic(control: &str) -> String {
    format!("/devices/wiegand/controls/{control}")
}

/// Capture file text for `bits`, pulses 2 ms apart from `start_us`.
pub fn capture_text(bits: &str, start_us: u64) -> String {
    bits.chars()
        .enumerate()
        .map(|(i, c)| {
            let line = if c == '1' { "D1" } else { "D0" };
            format!("{} {line}\n", start_us + 2_000 * i as u64)
        })
        .collect()
}

/// Edges for `bits`, pulses 2 ms apart from `start`.
pub fn edges(bits: &str, start: Timestamp) -> Vec<Edge> {
    let bits: Bits = bits.parse().expect("test bits");
    bits.iter()
        .enumerate()
        .map(|(i, bit)| {
            let line = if bit { Line::D1 } else { Line::D0 };
            Edge::new(line, start + Duration::from_millis(2 * i as u64))
        })
        .collect()
}

/// Edge source that plays back a fixed list of read outcomes, one per
/// `wait_for_edges` call, on a virtual clock; disconnects when the list is
/// exhausted.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<Vec<Edge>>>,
    now: Timestamp,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(mut self, edges: Vec<Edge>) -> Self {
        self.script.push_back(Ok(edges));
        self
    }

    pub fn error(mut self, error: HardwareError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    /// `count` empty waits.
    pub fn idle(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.script.push_back(Ok(Vec::new()));
        }
        self
    }
}

impl EdgeSource for ScriptedSource {
    async fn wait_for_edges(&mut self, max_wait: Duration) -> Result<Vec<Edge>> {
        let next = self
            .script
            .pop_front()
            .unwrap_or_else(|| Err(HardwareError::disconnected("script")));
        if let Ok(edges) = &next
            && let Some(last) = edges.last()
        {
            self.now = last.timestamp;
        }
        self.now = self.now + max_wait;
        next
    }

    fn now(&self) -> Timestamp {
        self.now
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo::new("scripted", "test")
    }
}
