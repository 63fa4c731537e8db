//! Descriptive types shared by edge sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an edge source is and where its edges come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Short name (e.g., "mock", "replay").
    pub name: String,

    /// Driver or backend description.
    pub driver: String,

    /// Optional location, such as a capture file path or GPIO chip.
    pub location: Option<String>,

    /// Number of edges known up front, for finite sources.
    pub edge_count: Option<usize>,
}

impl SourceInfo {
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: driver.into(),
            location: None,
            edge_count: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_edge_count(mut self, edge_count: usize) -> Self {
        self.edge_count = Some(edge_count);
        self
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.driver)?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}
