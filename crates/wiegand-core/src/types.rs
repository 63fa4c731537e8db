use crate::{
    Result,
    constants::{DEFAULT_DEVICE_ID, MAX_DEVICE_ID_LENGTH},
    error::Error,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// One of the two Wiegand data lines.
///
/// A reader signals a `0` by pulsing D0 and a `1` by pulsing D1, although
/// miswired installations swap them; see `CaptureConfig::one_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    D0,
    D1,
}

impl Line {
    /// The opposite data line.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Line::D0 => Line::D1,
            Line::D1 => Line::D0,
        }
    }

    /// Stable index for per-line tables.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Line::D0 => 0,
            Line::D1 => 1,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Line::D0 => write!(f, "D0"),
            Line::D1 => write!(f, "D1"),
        }
    }
}

impl std::str::FromStr for Line {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "D0" | "d0" | "0" => Ok(Line::D0),
            "D1" | "d1" | "1" => Ok(Line::D1),
            other => Err(Error::InvalidLine(other.to_string())),
        }
    }
}

/// Monotonic instant in nanoseconds.
///
/// The origin is arbitrary (boot, process start, first captured edge); only
/// differences are meaningful. Differences are computed with wrapping
/// arithmetic so a counter rollover does not produce a bogus gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Timestamp(nanos)
    }

    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros.wrapping_mul(1_000))
    }

    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis.wrapping_mul(1_000_000))
    }

    /// Build a timestamp from an elapsed duration since some origin.
    #[must_use]
    pub fn from_duration(elapsed: Duration) -> Self {
        // Truncation to 64 bits is the same rollover the wrapping math expects.
        Timestamp(elapsed.as_nanos() as u64)
    }

    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`.
    ///
    /// Returns zero when `earlier` is actually later than `self`, including
    /// across a rollover of the underlying counter.
    #[must_use]
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        let delta = self.0.wrapping_sub(earlier.0) as i64;
        if delta <= 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(delta as u64)
        }
    }

    /// Wrap-safe "strictly later than".
    #[must_use]
    pub fn is_after(&self, other: Timestamp) -> bool {
        (self.0.wrapping_sub(other.0) as i64) > 0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.wrapping_add(rhs.as_nanos() as u64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:06}ms", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}

/// A single falling edge on one of the data lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub line: Line,
    pub timestamp: Timestamp,
}

impl Edge {
    #[must_use]
    pub fn new(line: Line, timestamp: Timestamp) -> Self {
        Self { line, timestamp }
    }
}

/// Ordered sequence of captured bits, first received bit at index 0.
///
/// Serialized as a `"0101..."` string, which is also the published text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bits(Vec<bool>);

impl Bits {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Bits in reverse arrival order.
    #[must_use]
    pub fn reversed(&self) -> Bits {
        Bits(self.0.iter().rev().copied().collect())
    }

    /// Every bit complemented.
    #[must_use]
    pub fn inverted(&self) -> Bits {
        Bits(self.0.iter().map(|b| !b).collect())
    }

    /// Copy of `len` bits starting at `start`.
    ///
    /// # Errors
    /// Returns `Error::BitRangeOutOfBounds` if the window overruns the sequence.
    pub fn window(&self, start: usize, len: usize) -> Result<Bits> {
        let end = start + len;
        self.0
            .get(start..end)
            .map(|slice| Bits(slice.to_vec()))
            .ok_or(Error::BitRangeOutOfBounds {
                start,
                end,
                len: self.0.len(),
            })
    }

    /// Read `count` bits starting at `start` as an MSB-first unsigned integer.
    ///
    /// # Errors
    /// Returns `Error::BitRangeOutOfBounds` if the range overruns the sequence
    /// or is wider than 64 bits.
    pub fn read_uint(&self, start: usize, count: usize) -> Result<u64> {
        let end = start + count;
        let slice = self
            .0
            .get(start..end)
            .filter(|s| s.len() <= 64)
            .ok_or(Error::BitRangeOutOfBounds {
                start,
                end,
                len: self.0.len(),
            })?;
        Ok(fold_msb_first(slice))
    }

    /// The whole sequence as a big-endian integer, keeping the low 64 bits.
    #[must_use]
    pub fn raw_value(&self) -> u64 {
        let skip = self.0.len().saturating_sub(64);
        fold_msb_first(&self.0[skip..])
    }
}

fn fold_msb_first(bits: &[bool]) -> u64 {
    bits.iter().fold(0u64, |acc, &b| (acc << 1) | u64::from(b))
}

impl From<Vec<bool>> for Bits {
    fn from(bits: Vec<bool>) -> Self {
        Bits(bits)
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Bits(iter.into_iter().collect())
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Bits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::InvalidBits(format!(
                    "unexpected character {other:?} in {s:?}"
                ))),
            })
            .collect()
    }
}

impl Serialize for Bits {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Device identifier used as the second topic level (`/devices/<id>/...`).
///
/// Must be a single non-empty topic level: no `/`, no MQTT wildcards, no
/// whitespace, at most 63 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a new device id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDeviceId` if the id is empty, too long, or
    /// contains topic separators, wildcards or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let chars = id.chars().count();
        if chars == 0 || chars > MAX_DEVICE_ID_LENGTH {
            return Err(Error::InvalidDeviceId(format!(
                "length must be 1-{MAX_DEVICE_ID_LENGTH} characters, got {chars}"
            )));
        }
        if id
            .chars()
            .any(|c| matches!(c, '/' | '+' | '#') || c.is_whitespace() || c.is_control())
        {
            return Err(Error::InvalidDeviceId(format!(
                "{id:?} contains a topic separator, wildcard or whitespace"
            )));
        }
        Ok(DeviceId(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        DeviceId(DEFAULT_DEVICE_ID.to_string())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceId::new(s)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        DeviceId::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}
