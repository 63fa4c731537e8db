//! In-process edge source and sink for tests and simulation.

pub mod edges;
pub mod sink;

pub use edges::{MockEdgeSource, MockEdgeSourceHandle};
pub use sink::MemorySink;
