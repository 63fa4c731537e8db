//! Edge sources and publish sinks for the Wiegand gateway.
//!
//! The gateway core only needs two things from the outside world:
//!
//! - an [`EdgeSource`] that delivers timestamped falling edges per line
//!   with a bounded wait
//! - a [`PublishSink`] that accepts retained `topic -> payload` pairs
//!
//! # Implementations
//!
//! | type | trait | use |
//! |------|-------|-----|
//! | [`MockEdgeSource`](mock::MockEdgeSource) | `EdgeSource` | tests, simulator; tokio clock |
//! | [`ReplayEdgeSource`](replay::ReplayEdgeSource) | `EdgeSource` | capture files; virtual clock |
//! | [`MemorySink`](mock::MemorySink) | `PublishSink` | tests; shared, inspectable |
//! | [`TopicWriterSink`](sinks::TopicWriterSink) | `PublishSink` | `topic payload` lines to any writer |
//!
//! [`AnyEdgeSource`](devices::AnyEdgeSource) dispatches over the sources
//! when the choice is made at runtime.
//!
//! # Errors
//!
//! Everything returns [`Result<T>`][error::Result] with [`HardwareError`].
//! `HardwareError::Disconnected` from an edge source means it has ended; the
//! gateway stops cleanly on it and treats any other read error as transient.

pub mod devices;
pub mod error;
pub mod mock;
pub mod replay;
pub mod sinks;
pub mod traits;
pub mod types;

pub use error::{HardwareError, Result};
pub use traits::{EdgeSource, PublishSink};
pub use types::SourceInfo;
