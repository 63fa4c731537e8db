//! Wiegand frame assembly and format decoding.
//!
//! The pipeline mirrors the signal path:
//!
//! ```text
//! Edge ──> PulseFilter ──> FrameAccumulator ──> RawFrame
//!                                                  │
//!                                                  v
//!           FramePublisher <── DecodedFrame <── FormatDecoder (+ salvage)
//! ```
//!
//! Every stage is synchronous and owns its state; the event loop in
//! `wiegand-gateway` drives them.
//!
//! # Example
//!
//! ```
//! use wiegand_core::{CaptureConfig, DecoderConfig, Edge, Line, Timestamp};
//! use wiegand_protocol::{FormatDecoder, FrameAccumulator, WireFormat, encode};
//!
//! let bits = encode(WireFormat::W26, 123, 45678).unwrap();
//! let mut accumulator = FrameAccumulator::new(CaptureConfig::default());
//!
//! for (i, bit) in bits.iter().enumerate() {
//!     let line = if bit { Line::D1 } else { Line::D0 };
//!     let edge = Edge::new(line, Timestamp::from_millis(2 * i as u64));
//!     assert!(accumulator.push(edge).is_none());
//! }
//!
//! let raw = accumulator.poll(Timestamp::from_millis(200)).unwrap();
//! let decoded = FormatDecoder::new(DecoderConfig::default()).decode(&raw);
//!
//! assert_eq!(decoded.format(), WireFormat::W26);
//! assert_eq!(decoded.facility(), Some(123));
//! assert_eq!(decoded.card(), Some(45678));
//! ```

pub mod accumulator;
pub mod decoder;
pub mod format;
pub mod frame;
pub mod publisher;
pub mod pulse;
pub mod salvage;
pub mod transform;

pub use accumulator::{AccumulatorState, AccumulatorStats, FrameAccumulator};
pub use decoder::FormatDecoder;
pub use format::{W26, W34, WiegandLayout, encode};
pub use frame::{DecodedFrame, FrameError, RawFrame, WireFormat};
pub use publisher::{FrameField, FramePublisher, Publication};
pub use pulse::PulseFilter;
pub use salvage::{Salvaged, is_salvage_candidate, salvage_w26};
pub use transform::BitTransform;
