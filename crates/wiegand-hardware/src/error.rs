//! Error types for edge sources and publish sinks.

pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors raised by edge sources and publish sinks.
///
/// The gateway treats [`HardwareError::Disconnected`] from a source as the
/// end of input; every other read error is skipped.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Source or sink is gone for good (channel closed, replay exhausted).
    #[error("Edge source {source_name} disconnected")]
    Disconnected { source_name: String },

    /// Malformed input from the source (bad capture line, unknown line id).
    #[error("Invalid edge data: {message}")]
    InvalidData { message: String },

    /// Source could not be opened.
    #[error("Cannot open edge source: {message}")]
    InitializationFailed { message: String },

    /// The sink refused a publication.
    #[error("Publish to {topic} failed: {message}")]
    PublishFailed { topic: String, message: String },

    /// Reading a capture or writing publications failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    pub fn disconnected(source_name: impl Into<String>) -> Self {
        Self::Disconnected {
            source_name: source_name.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    pub fn publish_failed(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PublishFailed {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Whether the source has ended and will never yield edges again.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
