//! Mapping of decoded frames onto the device topic tree.
//!
//! Every frame publishes the same eight controls under
//! `/devices/<device_id>/controls/`, in [`FrameField::ALL`] order. Absent
//! facility and card are published as `-1` so the schema never changes shape.

use crate::frame::DecodedFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use wiegand_core::DeviceId;
use wiegand_core::constants::{
    DEVICE_META_DRIVER, DEVICE_META_NAME, TOPIC_ROOT, UNSET_FIELD_SENTINEL,
};

/// A published control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameField {
    ReadCounter,
    Bits,
    Len,
    RawValue,
    FacilityCode,
    CardNumber,
    Format,
    LastError,
}

impl FrameField {
    /// Publication order.
    pub const ALL: [FrameField; 8] = [
        FrameField::ReadCounter,
        FrameField::Bits,
        FrameField::Len,
        FrameField::RawValue,
        FrameField::FacilityCode,
        FrameField::CardNumber,
        FrameField::Format,
        FrameField::LastError,
    ];

    pub fn control_name(&self) -> &'static str {
        match self {
            FrameField::ReadCounter => "ReadCounter",
            FrameField::Bits => "Bits",
            FrameField::Len => "Len",
            FrameField::RawValue => "RawValue",
            FrameField::FacilityCode => "FacilityCode",
            FrameField::CardNumber => "CardNumber",
            FrameField::Format => "Format",
            FrameField::LastError => "LastError",
        }
    }

    /// Control type advertised in `meta/type`.
    pub fn meta_type(&self) -> &'static str {
        match self {
            FrameField::Bits | FrameField::Format | FrameField::LastError => "text",
            _ => "value",
        }
    }

    /// Payload for this control.
    pub fn value_of(&self, frame: &DecodedFrame) -> String {
        match self {
            FrameField::ReadCounter => frame.sequence_counter().to_string(),
            FrameField::Bits => frame.bits().to_string(),
            FrameField::Len => frame.length().to_string(),
            FrameField::RawValue => frame.raw_value().to_string(),
            FrameField::FacilityCode => or_sentinel(frame.facility()),
            FrameField::CardNumber => or_sentinel(frame.card()),
            FrameField::Format => frame.format().to_string(),
            FrameField::LastError => frame.error_str().to_string(),
        }
    }
}

impl fmt::Display for FrameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.control_name())
    }
}

fn or_sentinel(value: Option<u32>) -> String {
    value.map_or(UNSET_FIELD_SENTINEL, i64::from).to_string()
}

/// One retained topic/payload pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub topic: String,
    pub payload: String,
    pub retained: bool,
}

impl Publication {
    pub fn retained(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retained: true,
        }
    }
}

/// Builds publications for one device.
#[derive(Debug, Clone)]
pub struct FramePublisher {
    device_id: DeviceId,
}

impl FramePublisher {
    pub fn new(device_id: DeviceId) -> Self {
        Self { device_id }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// `/devices/<id>/controls/<Control>`
    pub fn control_topic(&self, field: FrameField) -> String {
        format!(
            "{TOPIC_ROOT}/{}/controls/{}",
            self.device_id,
            field.control_name()
        )
    }

    /// Publications for one decoded frame, in [`FrameField::ALL`] order.
    pub fn frame_values(&self, frame: &DecodedFrame) -> Vec<Publication> {
        FrameField::ALL
            .iter()
            .map(|field| Publication::retained(self.control_topic(*field), field.value_of(frame)))
            .collect()
    }

    /// Static device description: name and driver, then every control's
    /// type, then every control's read-only flag.
    pub fn meta_values(&self) -> Vec<Publication> {
        let device = format!("{TOPIC_ROOT}/{}", self.device_id);
        let mut out = vec![
            Publication::retained(format!("{device}/meta/name"), DEVICE_META_NAME),
            Publication::retained(format!("{device}/meta/driver"), DEVICE_META_DRIVER),
        ];
        out.extend(FrameField::ALL.iter().map(|field| {
            Publication::retained(
                format!("{}/meta/type", self.control_topic(*field)),
                field.meta_type(),
            )
        }));
        out.extend(FrameField::ALL.iter().map(|field| {
            Publication::retained(format!("{}/meta/readonly", self.control_topic(*field)), "1")
        }));
        out
    }
}
