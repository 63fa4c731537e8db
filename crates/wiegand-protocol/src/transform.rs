//! Bit polarity and bit order transforms.
//!
//! Installations differ in which line carries `1` and, for some readers, in
//! bit order. The decoder resolves this by trying each transform in
//! [`BitTransform::SEARCH_ORDER`] and keeping the first one whose output
//! satisfies the layout's parity.

use serde::{Deserialize, Serialize};
use std::fmt;
use wiegand_core::Bits;

/// A named rewrite of a captured bit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitTransform {
    Identity,
    Invert,
    Reverse,
    ReverseInvert,
}

impl BitTransform {
    /// Order in which the decoder tries transforms.
    pub const SEARCH_ORDER: [BitTransform; 4] = [
        BitTransform::Identity,
        BitTransform::Invert,
        BitTransform::Reverse,
        BitTransform::ReverseInvert,
    ];

    pub fn apply(&self, bits: &Bits) -> Bits {
        match self {
            BitTransform::Identity => bits.clone(),
            BitTransform::Invert => bits.inverted(),
            BitTransform::Reverse => bits.reversed(),
            BitTransform::ReverseInvert => bits.reversed().inverted(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BitTransform::Identity => "identity",
            BitTransform::Invert => "invert",
            BitTransform::Reverse => "reverse",
            BitTransform::ReverseInvert => "reverse_invert",
        }
    }

    /// Build the static transform selected by configuration.
    pub fn from_flags(reverse: bool, invert: bool) -> Self {
        match (reverse, invert) {
            (false, false) => BitTransform::Identity,
            (false, true) => BitTransform::Invert,
            (true, false) => BitTransform::Reverse,
            (true, true) => BitTransform::ReverseInvert,
        }
    }

    /// First transform in `candidates` whose output satisfies `accept`,
    /// paired with that output.
    pub fn first_match<F>(
        bits: &Bits,
        candidates: &[BitTransform],
        mut accept: F,
    ) -> Option<(BitTransform, Bits)>
    where
        F: FnMut(&Bits) -> bool,
    {
        candidates.iter().find_map(|transform| {
            let candidate = transform.apply(bits);
            accept(&candidate).then_some((*transform, candidate))
        })
    }
}

impl fmt::Display for BitTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
