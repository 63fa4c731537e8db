//! Event loop tying an edge source to a publish sink.
//!
//! [`Gateway`] owns the frame accumulator, decoder and publisher and drives
//! them from a single task. Stop it with a [`CancellationToken`], or let it
//! run until the source disconnects.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod error;
pub mod gateway;
pub mod stats;

pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayBuilder};
pub use stats::GatewayStats;
