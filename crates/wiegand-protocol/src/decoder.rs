//! Format decoding with polarity and bit-order autodetection.

use crate::format::WiegandLayout;
use crate::frame::{DecodedFrame, FrameError, RawFrame};
use crate::salvage::{is_salvage_candidate, salvage_w26};
use crate::transform::BitTransform;
use tracing::{debug, trace};
use wiegand_core::DecoderConfig;

/// Turns a completed capture into a [`DecodedFrame`].
///
/// Decoding runs in four steps:
///
/// 1. the configured static transform (`reverse_bits`, then `invert_bits`)
/// 2. salvage of a 26-bit window for captures of 24-32 bits
/// 3. layout selection by length (26 or 34, anything else is `len_mismatch`)
/// 4. the first transform in [`BitTransform::SEARCH_ORDER`] that satisfies
///    the layout's parity; none is `parity_fail`
///
/// Failed frames carry the bits exactly as captured.
///
/// The search cannot detect bit order. A reversed W26 or W34 frame fails
/// parity as received but passes once inverted, so it decodes cleanly to the
/// wrong credentials. Readers that send LSB first need `reverse_bits`.
#[derive(Debug, Clone)]
pub struct FormatDecoder {
    config: DecoderConfig,
    static_transform: BitTransform,
}

impl FormatDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        let static_transform = BitTransform::from_flags(config.reverse_bits, config.invert_bits);
        Self {
            config,
            static_transform,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn decode(&self, raw: &RawFrame) -> DecodedFrame {
        let counter = raw.sequence_counter();
        let mut working = self.static_transform.apply(raw.bits());
        let mut salvage_offset = None;

        if self.config.salvage && is_salvage_candidate(working.len()) {
            match salvage_w26(&working) {
                Some(salvaged) => {
                    debug!(
                        counter,
                        len = working.len(),
                        offset = salvaged.offset,
                        "Salvaged 26-bit window"
                    );
                    salvage_offset = Some(salvaged.offset);
                    working = salvaged.bits;
                }
                None => trace!(counter, len = working.len(), "No unique 26-bit window"),
            }
        }

        let Some(layout) = WiegandLayout::for_length(working.len()) else {
            debug!(counter, len = raw.len(), "Length matches no format");
            return DecodedFrame::failed(counter, raw.bits().clone(), FrameError::LenMismatch);
        };

        let found = BitTransform::first_match(&working, &BitTransform::SEARCH_ORDER, |candidate| {
            layout.check_parity(candidate)
        });

        match found.and_then(|(transform, bits)| {
            layout
                .fields(&bits)
                .map(|(facility, card)| (transform, bits, facility, card))
        }) {
            Some((transform, bits, facility, card)) => {
                debug!(
                    counter,
                    format = %layout.format,
                    %transform,
                    facility,
                    card,
                    "Decoded frame"
                );
                DecodedFrame::decoded(counter, bits, layout.format, facility, card, transform)
                    .with_salvage_offset(salvage_offset)
            }
            None => {
                debug!(counter, format = %layout.format, "No transform satisfies parity");
                DecodedFrame::failed(counter, raw.bits().clone(), FrameError::ParityFail)
                    .with_salvage_offset(salvage_offset)
            }
        }
    }
}

impl Default for FormatDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
