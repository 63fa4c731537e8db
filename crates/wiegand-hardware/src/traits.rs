//! Edge source and publish sink contracts.
//!
//! [`EdgeSource`] uses native `async fn` (edition 2024 RPITIT), so it is not
//! object safe; use generics, or [`AnyEdgeSource`](crate::devices::AnyEdgeSource)
//! when the concrete source is chosen at runtime.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::SourceInfo;
use std::time::Duration;
use wiegand_core::{Edge, Timestamp};

/// Something that delivers timestamped falling edges on D0 and D1.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use wiegand_hardware::traits::EdgeSource;
/// use wiegand_hardware::Result;
///
/// async fn count_edges<S: EdgeSource>(source: &mut S) -> Result<usize> {
///     let edges = source.wait_for_edges(Duration::from_millis(10)).await?;
///     Ok(edges.len())
/// }
/// ```
pub trait EdgeSource: Send + Sync {
    /// Wait at most `max_wait` for edges, returning everything available.
    ///
    /// An empty vector means the wait timed out.
    ///
    /// # Errors
    ///
    /// - `HardwareError::Disconnected` when the source has ended for good
    /// - any other variant for a failed read, after which the caller may
    ///   keep reading
    async fn wait_for_edges(&mut self, max_wait: Duration) -> Result<Vec<Edge>>;

    /// Current time on the clock that stamps this source's edges.
    fn now(&self) -> Timestamp;

    fn source_info(&self) -> SourceInfo;
}

/// Retained key/value publication target.
///
/// Publication is synchronous: implementations hand the value to their
/// transport and return without waiting for acknowledgement.
pub trait PublishSink: Send {
    /// # Errors
    ///
    /// Returns `HardwareError::PublishFailed` (or `Io`) when the value could
    /// not be handed off.
    fn publish(&mut self, topic: &str, payload: &str, retained: bool) -> Result<()>;

    /// Push out anything buffered.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<P: PublishSink + ?Sized> PublishSink for &mut P {
    fn publish(&mut self, topic: &str, payload: &str, retained: bool) -> Result<()> {
        (**self).publish(topic, payload, retained)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
