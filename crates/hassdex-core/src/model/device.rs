use hassdex_api::DeviceInfoLookup;
use serde::{Deserialize, Serialize};

/// Name given to devices whose descriptive lookup failed.
pub const UNKNOWN_NAME: &str = "unknown";

/// Marker stored on placeholder devices.
pub const PARSE_FAILURE: &str = "failed to parse";

/// A physical unit owning one or more entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub area_id: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub has_unavailable: bool,
}

impl Device {
    /// Build a device record from a descriptive lookup. Owned entities and
    /// the availability flag are filled in by the builder.
    ///
    /// The id is always the one we asked for, whatever the template echoed.
    pub fn from_lookup(device_id: &str, lookup: DeviceInfoLookup) -> Self {
        match lookup {
            DeviceInfoLookup::Found(info) => Self {
                id: device_id.to_owned(),
                name: info.name,
                manufacturer: info.manufacturer,
                model: info.model,
                area_id: info.area_id,
                area_name: info.area_name,
                error: None,
                entities: Vec::new(),
                has_unavailable: false,
            },
            DeviceInfoLookup::Malformed { .. } => Self::placeholder(device_id),
        }
    }

    /// Stand-in record for a device whose lookup could not be decoded.
    pub fn placeholder(device_id: &str) -> Self {
        Self {
            id: device_id.to_owned(),
            name: UNKNOWN_NAME.into(),
            manufacturer: String::new(),
            model: String::new(),
            area_id: String::new(),
            area_name: String::new(),
            error: Some(PARSE_FAILURE.into()),
            entities: Vec::new(),
            has_unavailable: false,
        }
    }

    /// Area the device is assigned to, if any.
    pub fn area(&self) -> Option<&str> {
        (!self.area_id.is_empty()).then_some(self.area_id.as_str())
    }

    /// Display name, falling back to the id when no name was recorded.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
