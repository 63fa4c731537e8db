//! Recovery of a W26 frame from a capture with a few extra or missing bits.
//!
//! A stray pulse at either end of a transmission, or a dropped one, leaves a
//! capture of 24-32 bits that is almost a W26 frame. Every 26-bit window is
//! checked against W26 parity as received; the window is adopted only when
//! exactly one passes.

use crate::format::W26;
use wiegand_core::Bits;
use wiegand_core::constants::{SALVAGE_MAX_BITS, SALVAGE_MIN_BITS, W26_BITS, W34_BITS};

/// A 26-bit window recovered from a longer capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salvaged {
    pub offset: usize,
    pub bits: Bits,
}

/// Whether a capture of `len` bits is eligible for salvage.
pub fn is_salvage_candidate(len: usize) -> bool {
    (SALVAGE_MIN_BITS..=SALVAGE_MAX_BITS).contains(&len) && len != W26_BITS && len != W34_BITS
}

/// Find the single 26-bit window of `bits` that satisfies W26 parity.
///
/// Returns `None` when `bits` is not a salvage candidate, or when zero or
/// several windows pass.
pub fn salvage_w26(bits: &Bits) -> Option<Salvaged> {
    if !is_salvage_candidate(bits.len()) || bits.len() < W26_BITS {
        return None;
    }

    let mut found: Option<Salvaged> = None;
    for offset in 0..=bits.len() - W26_BITS {
        let Ok(window) = bits.window(offset, W26_BITS) else {
            break;
        };
        if !W26.check_parity(&window) {
            continue;
        }
        if found.is_some() {
            return None;
        }
        found = Some(Salvaged {
            offset,
            bits: window,
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bits(text: &str) -> Bits {
        text.parse().unwrap()
    }

    #[rstest]
    #[case(23, false)]
    #[case(24, true)]
    #[case(25, true)]
    #[case(26, false)]
    #[case(27, true)]
    #[case(32, true)]
    #[case(33, false)]
    #[case(34, false)]
    fn test_candidate_band(#[case] len: usize, #[case] expected: bool) {
        assert_eq!(is_salvage_candidate(len), expected);
    }

    #[rstest]
    // 123/45678 with a trailing 0
    #[case("101111011101100100110111010", 0, "10111101110110010011011101")]
    // 123/45678 with a leading 0
    #[case("010111101110110010011011101", 1, "10111101110110010011011101")]
    // 200/12345 with a trailing 1
    #[case("111001000001100000011100111", 0, "11100100000110000001110011")]
    fn test_single_window_recovered(
        #[case] input: &str,
        #[case] offset: usize,
        #[case] expected: &str,
    ) {
        let salvaged = salvage_w26(&bits(input)).unwrap();
        assert_eq!(salvaged.offset, offset);
        assert_eq!(salvaged.bits.to_string(), expected);
    }

    #[rstest]
    // 123/45678 with a leading 1: both windows pass
    #[case("110111101110110010011011101")]
    #[case("000000000000000000000000010")]
    // 42/4242 with a trailing 0
    #[case("000101010000100001001001000")]
    fn test_ambiguous_windows_rejected(#[case] input: &str) {
        assert_eq!(salvage_w26(&bits(input)), None);
    }

    #[test]
    fn test_no_window_passes() {
        assert_eq!(salvage_w26(&bits("111111111111111111111111111")), None);
    }

    #[rstest]
    #[case(24)]
    #[case(25)]
    fn test_short_candidates_have_no_window(#[case] len: usize) {
        assert_eq!(salvage_w26(&Bits::from(vec![true; len])), None);
    }

    #[test]
    fn test_exact_lengths_are_not_salvaged() {
        let w26 = bits("10111101110110010011011101");
        assert_eq!(salvage_w26(&w26), None);
    }

    #[test]
    fn test_salvage_ignores_polarity() {
        // Inverted 123/45678 plus a trailing 1; no window passes as received.
        let inverted = bits("010000100010011011001000101");
        assert_eq!(salvage_w26(&inverted), None);
    }
}
