use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Bit sequence errors
    #[error("Invalid bit string: {0}")]
    InvalidBits(String),

    #[error("Bit range {start}..{end} out of bounds for {len} bits")]
    BitRangeOutOfBounds { start: usize, end: usize, len: usize },

    // Identity errors
    #[error("Invalid device id: {0}")]
    InvalidDeviceId(String),

    #[error("Invalid line identifier: {0}")]
    InvalidLine(String),

    // Credential errors
    #[error("{field} {value} does not fit in {bits} bits")]
    CredentialOutOfRange {
        field: &'static str,
        value: u32,
        bits: usize,
    },

    #[error("Unsupported wire format: {0}")]
    UnsupportedFormat(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
