//! Channel-fed edge source driven by the tokio clock.

use crate::{HardwareError, Result, traits::EdgeSource, types::SourceInfo};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use wiegand_core::{Bits, Edge, Line, Timestamp};

const CHANNEL_CAPACITY: usize = 256;

/// Edge source fed by a [`MockEdgeSourceHandle`].
///
/// Source and handle share an epoch, so edges stamped by the handle and
/// [`EdgeSource::now`] read the same clock. Under `tokio::time::pause` the
/// clock is virtual and tests run instantly.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wiegand_core::Line;
/// use wiegand_hardware::mock::MockEdgeSource;
/// use wiegand_hardware::traits::EdgeSource;
///
/// #[tokio::main]
/// async fn main() -> wiegand_hardware::Result<()> {
///     let (mut source, handle) = MockEdgeSource::new();
///
///     handle.pulse(Line::D1).await?;
///     handle.pulse(Line::D0).await?;
///
///     let edges = source.wait_for_edges(Duration::from_millis(10)).await?;
///     assert_eq!(edges.len(), 2);
///     assert_eq!(edges[0].line, Line::D1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockEdgeSource {
    edge_rx: mpsc::Receiver<Edge>,
    epoch: Instant,
    name: String,
}

impl MockEdgeSource {
    pub fn new() -> (Self, MockEdgeSourceHandle) {
        Self::with_name("mock".to_string())
    }

    pub fn with_name(name: String) -> (Self, MockEdgeSourceHandle) {
        let (edge_tx, edge_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let epoch = Instant::now();

        let source = Self {
            edge_rx,
            epoch,
            name: name.clone(),
        };
        let handle = MockEdgeSourceHandle {
            edge_tx,
            epoch,
            name,
        };

        (source, handle)
    }
}

impl EdgeSource for MockEdgeSource {
    async fn wait_for_edges(&mut self, max_wait: Duration) -> Result<Vec<Edge>> {
        let first = match tokio::time::timeout(max_wait, self.edge_rx.recv()).await {
            Err(_) => return Ok(Vec::new()),
            Ok(None) => return Err(HardwareError::disconnected(self.name.clone())),
            Ok(Some(edge)) => edge,
        };

        let mut edges = vec![first];
        while let Ok(edge) = self.edge_rx.try_recv() {
            edges.push(edge);
        }
        Ok(edges)
    }

    fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.epoch.elapsed())
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo::new(self.name.clone(), "channel")
    }
}

/// Drives a [`MockEdgeSource`]. Cloneable; dropping every handle
/// disconnects the source once its queue drains.
#[derive(Debug, Clone)]
pub struct MockEdgeSourceHandle {
    edge_tx: mpsc::Sender<Edge>,
    epoch: Instant,
    name: String,
}

impl MockEdgeSourceHandle {
    /// Send a pre-stamped edge.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Disconnected` if the source has been dropped.
    pub async fn send_edge(&self, edge: Edge) -> Result<()> {
        self.edge_tx
            .send(edge)
            .await
            .map_err(|_| HardwareError::disconnected(self.name.clone()))
    }

    /// Falling edge on `line`, stamped now.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Disconnected` if the source has been dropped.
    pub async fn pulse(&self, line: Line) -> Result<()> {
        self.send_edge(Edge::new(line, self.now())).await
    }

    /// Pulse out `bits` the way a reader does, `interval` between pulses.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Disconnected` if the source has been dropped.
    pub async fn send_bits(&self, bits: &Bits, one_line: Line, interval: Duration) -> Result<()> {
        for (i, bit) in bits.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(interval).await;
            }
            self.pulse(if bit { one_line } else { one_line.other() })
                .await?;
        }
        Ok(())
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.epoch.elapsed())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
