//! W26 and W34 frame layouts.
//!
//! Both layouts share one shape:
//!
//! ```text
//! ┌──────┬───────────────┬───────────────┬──────┐
//! │ even │   facility    │     card      │ odd  │
//! └──────┴───────────────┴───────────────┴──────┘
//!   bit 0                                 last bit
//! ```
//!
//! The leading bit makes the first half (itself plus the following
//! `even_span` bits) even; the trailing bit makes the second half odd. The
//! halves split the payload exactly in two, which is not the same split as
//! facility/card for W26 (8 + 16 bits, halves of 12).

use crate::frame::WireFormat;
use wiegand_core::constants::{W26_BITS, W34_BITS};
use wiegand_core::{Bits, Error, Result};

/// Geometry of a Wiegand frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WiegandLayout {
    pub format: WireFormat,
    pub length: usize,
    pub facility_bits: usize,
    pub card_bits: usize,
    /// Payload bits covered by the leading even parity bit.
    pub even_span: usize,
}

/// Standard 26-bit layout (H10301).
pub const W26: WiegandLayout = WiegandLayout {
    format: WireFormat::W26,
    length: W26_BITS,
    facility_bits: 8,
    card_bits: 16,
    even_span: 12,
};

/// 34-bit layout with 16-bit facility and card.
pub const W34: WiegandLayout = WiegandLayout {
    format: WireFormat::W34,
    length: W34_BITS,
    facility_bits: 16,
    card_bits: 16,
    even_span: 16,
};

impl WiegandLayout {
    /// Layout whose length is exactly `len`.
    pub fn for_length(len: usize) -> Option<&'static WiegandLayout> {
        match len {
            W26_BITS => Some(&W26),
            W34_BITS => Some(&W34),
            _ => None,
        }
    }

    pub fn for_format(format: WireFormat) -> Option<&'static WiegandLayout> {
        match format {
            WireFormat::W26 => Some(&W26),
            WireFormat::W34 => Some(&W34),
            WireFormat::Unknown => None,
        }
    }

    /// Whether `bits` has this layout's length and satisfies both parity bits.
    pub fn check_parity(&self, bits: &Bits) -> bool {
        if bits.len() != self.length {
            return false;
        }
        let b = bits.as_slice();
        let last = self.length - 1;
        let even = xor(&b[1..=self.even_span]);
        let odd = xor(&b[self.even_span + 1..last]);
        b[0] == even && b[last] != odd
    }

    /// Facility and card fields, if `bits` has this layout's length.
    ///
    /// Parity is not checked.
    pub fn fields(&self, bits: &Bits) -> Option<(u32, u32)> {
        if bits.len() != self.length {
            return None;
        }
        let facility = bits.read_uint(1, self.facility_bits).ok()?;
        let card = bits.read_uint(1 + self.facility_bits, self.card_bits).ok()?;
        Some((u32::try_from(facility).ok()?, u32::try_from(card).ok()?))
    }

    /// Build a parity-correct frame.
    ///
    /// # Errors
    /// Returns `Error::CredentialOutOfRange` when a field does not fit.
    pub fn encode(&self, facility: u32, card: u32) -> Result<Bits> {
        check_range("facility", facility, self.facility_bits)?;
        check_range("card", card, self.card_bits)?;

        let mut payload = Vec::with_capacity(self.length);
        push_msb_first(&mut payload, facility, self.facility_bits);
        push_msb_first(&mut payload, card, self.card_bits);

        let even = xor(&payload[..self.even_span]);
        let odd = !xor(&payload[self.even_span..]);

        let mut bits = Bits::with_capacity(self.length);
        bits.push(even);
        payload.into_iter().for_each(|b| bits.push(b));
        bits.push(odd);
        Ok(bits)
    }
}

/// Encode a credential in the given wire format.
///
/// # Errors
/// Returns `Error::UnsupportedFormat` for `WireFormat::Unknown` and
/// `Error::CredentialOutOfRange` when a field does not fit the layout.
///
/// # Examples
///
/// ```
/// use wiegand_protocol::{WireFormat, encode};
///
/// let bits = encode(WireFormat::W26, 123, 45678).unwrap();
/// assert_eq!(bits.to_string(), "10111101110110010011011101");
///
/// assert!(encode(WireFormat::W26, 256, 1).is_err());
/// ```
pub fn encode(format: WireFormat, facility: u32, card: u32) -> Result<Bits> {
    WiegandLayout::for_format(format)
        .ok_or_else(|| Error::UnsupportedFormat(format.to_string()))?
        .encode(facility, card)
}

fn xor(bits: &[bool]) -> bool {
    bits.iter().fold(false, |acc, &b| acc ^ b)
}

fn push_msb_first(out: &mut Vec<bool>, value: u32, width: usize) {
    out.extend((0..width).rev().map(|shift| (value >> shift) & 1 == 1));
}

fn check_range(field: &'static str, value: u32, bits: usize) -> Result<()> {
    if bits < 32 && value >> bits != 0 {
        return Err(Error::CredentialOutOfRange { field, value, bits });
    }
    Ok(())
}
