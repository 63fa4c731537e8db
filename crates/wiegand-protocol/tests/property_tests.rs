//! Property-based tests for decoding and frame assembly.

mod common;

use proptest::prelude::*;
use wiegand_core::{Bits, CaptureConfig, DecoderConfig, Edge, Line, Timestamp};
use wiegand_protocol::{
    BitTransform, FormatDecoder, FrameAccumulator, FrameError, PulseFilter, RawFrame, WireFormat,
    encode,
};

fn w26_credential() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=255, 0u32..=65_535)
}

fn w34_credential() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=65_535, 0u32..=65_535)
}

proptest! {
    /// Clean W26 frames decode back to their credential with the identity transform.
    #[test]
    fn prop_clean_w26_decodes((facility, card) in w26_credential()) {
        let bits = encode(WireFormat::W26, facility, card).unwrap();
        let decoded = FormatDecoder::default().decode(&RawFrame::new(bits.clone(), 1));

        prop_assert_eq!(decoded.format(), WireFormat::W26);
        prop_assert_eq!(decoded.facility(), Some(facility));
        prop_assert_eq!(decoded.card(), Some(card));
        prop_assert_eq!(decoded.error_str(), "");
        prop_assert_eq!(decoded.transform(), Some(BitTransform::Identity));
        prop_assert_eq!(decoded.bits(), &bits);
    }

    #[test]
    fn prop_clean_w34_decodes((facility, card) in w34_credential()) {
        let bits = encode(WireFormat::W34, facility, card).unwrap();
        let decoded = FormatDecoder::default().decode(&RawFrame::new(bits, 1));

        prop_assert_eq!(decoded.format(), WireFormat::W34);
        prop_assert_eq!(decoded.facility(), Some(facility));
        prop_assert_eq!(decoded.card(), Some(card));
    }

    /// A reader wired with D0 and D1 swapped is recovered by the inversion step.
    #[test]
    fn prop_inverted_w26_recovered((facility, card) in w26_credential()) {
        let valid = encode(WireFormat::W26, facility, card).unwrap();
        let decoded = FormatDecoder::default().decode(&RawFrame::new(valid.inverted(), 1));

        prop_assert_eq!(decoded.transform(), Some(BitTransform::Invert));
        prop_assert_eq!(decoded.facility(), Some(facility));
        prop_assert_eq!(decoded.card(), Some(card));
        prop_assert_eq!(decoded.bits(), &valid);
    }

    /// A reader that sends LSB first is decoded once `reverse_bits` is set.
    #[test]
    fn prop_reversed_w34_with_static_reverse((facility, card) in w34_credential()) {
        let valid = encode(WireFormat::W34, facility, card).unwrap();
        let config = DecoderConfig { reverse_bits: true, ..DecoderConfig::default() };
        let decoded = FormatDecoder::new(config).decode(&RawFrame::new(valid.reversed(), 1));

        prop_assert_eq!(decoded.facility(), Some(facility));
        prop_assert_eq!(decoded.card(), Some(card));
    }

    /// Decoded frames always satisfy the outcome invariant.
    #[test]
    fn prop_outcome_is_consistent(raw in prop::collection::vec(any::<bool>(), 8..64)) {
        let len = raw.len();
        let decoded = FormatDecoder::default().decode(&RawFrame::new(raw.into(), 1));

        prop_assert!(decoded.length() >= 8);
        match decoded.format() {
            WireFormat::Unknown => {
                prop_assert!(decoded.error().is_some());
                prop_assert_eq!(decoded.facility(), None);
                prop_assert_eq!(decoded.card(), None);
                prop_assert_eq!(decoded.length(), len);
            }
            _ => {
                prop_assert_eq!(decoded.error(), None);
                prop_assert!(decoded.facility().is_some());
                prop_assert!(decoded.card().is_some());
            }
        }
    }

    /// Lengths outside every layout and the salvage band are always `len_mismatch`.
    #[test]
    fn prop_out_of_band_lengths_mismatch(
        raw in prop::collection::vec(any::<bool>(), 35..96),
    ) {
        let decoded = FormatDecoder::default().decode(&RawFrame::new(raw.into(), 1));
        prop_assert_eq!(decoded.error(), Some(FrameError::LenMismatch));
    }

    /// Edges closer than the debounce interval never become bits.
    #[test]
    fn prop_debounce_drops_close_edges(
        start_us in 0u64..1_000_000,
        delta_us in 0u64..100,
    ) {
        let mut filter = PulseFilter::from_config(&CaptureConfig::default());
        prop_assert!(filter.accept(&Edge::new(Line::D0, Timestamp::from_micros(start_us))));
        let bounce = Edge::new(Line::D1, Timestamp::from_micros(start_us + delta_us));
        prop_assert!(!filter.accept(&bounce));
        prop_assert_eq!(
            filter.last_accepted_for(&bounce),
            Some(Timestamp::from_micros(start_us))
        );
    }

    /// Emitted frames are numbered 1..=N with no gaps, however many short
    /// bursts are discarded in between.
    #[test]
    fn prop_counter_is_gapless(
        lengths in prop::collection::vec(1usize..40, 1..20),
    ) {
        let mut accumulator = FrameAccumulator::new(CaptureConfig::default());
        let mut counters = Vec::new();
        let mut expected_emitted = 0u64;

        for (n, len) in lengths.iter().enumerate() {
            let start = Timestamp::from_millis(n as u64 * 1_000);
            let bits: Bits = vec![true; *len].into();
            for edge in common::edges(&bits, start) {
                counters.extend(accumulator.push(edge).map(|f| f.sequence_counter()));
            }
            if *len >= 8 {
                expected_emitted += 1;
            }
        }
        counters.extend(
            accumulator
                .poll(Timestamp::from_millis(lengths.len() as u64 * 1_000 + 500))
                .map(|f| f.sequence_counter()),
        );

        let expected: Vec<u64> = (1..=expected_emitted).collect();
        prop_assert_eq!(counters, expected);
    }
}
