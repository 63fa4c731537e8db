//! In-memory publish sink.

use crate::{HardwareError, Result, traits::PublishSink};
use std::sync::{Arc, Mutex, MutexGuard};
use wiegand_protocol::Publication;

#[derive(Debug, Default)]
struct SinkState {
    published: Vec<Publication>,
    failing: bool,
}

/// Records every publication; clones share the same record.
///
/// Hand one clone to the gateway and keep another to inspect what was
/// published, or to make the sink start refusing publications.
///
/// # Examples
///
/// ```
/// use wiegand_hardware::mock::MemorySink;
/// use wiegand_hardware::traits::PublishSink;
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
///
/// writer.publish("/devices/wiegand/controls/Len", "26", true).unwrap();
/// assert_eq!(sink.latest("/devices/wiegand/controls/Len").as_deref(), Some("26"));
///
/// sink.set_failing(true);
/// assert!(writer.publish("/devices/wiegand/controls/Len", "34", true).is_err());
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<SinkState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publication so far, oldest first.
    pub fn publications(&self) -> Vec<Publication> {
        self.lock().published.clone()
    }

    /// Drain and return the record.
    pub fn take(&self) -> Vec<Publication> {
        std::mem::take(&mut self.lock().published)
    }

    /// Most recent payload on `topic`, which is what a retained subscriber sees.
    pub fn latest(&self, topic: &str) -> Option<String> {
        self.lock()
            .published
            .iter()
            .rev()
            .find(|p| p.topic == topic)
            .map(|p| p.payload.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent publications fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PublishSink for MemorySink {
    fn publish(&mut self, topic: &str, payload: &str, retained: bool) -> Result<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(HardwareError::publish_failed(topic, "sink set to fail"));
        }
        state.published.push(Publication {
            topic: topic.to_string(),
            payload: payload.to_string(),
            retained,
        });
        Ok(())
    }
}
