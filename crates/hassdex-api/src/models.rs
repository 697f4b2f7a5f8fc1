// Wire types returned by the hub.
//
// These mirror the JSON the hub emits (or the JSON our templates render)
// and stay deliberately loose: every field the hub might omit is optional
// or defaulted so a sparse installation never fails to decode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::client::preview;

/// One entry of `GET /api/states`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateObject {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub last_changed: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl StateObject {
    /// Look up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Look up a string attribute, ignoring non-string values.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// Subset of `GET /api/config` the indexer records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// An area as listed by the area template: display name + identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRef {
    pub id: String,
    pub name: String,
}

/// Descriptive device attributes rendered by the device-info template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    #[serde(default = "unknown", deserialize_with = "null_as_unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub area_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub area_name: String,
}

/// Outcome of a device-info lookup.
///
/// A lookup never fails the run: anything the hub sends back that does not
/// decode (or a transport failure on that one request) becomes `Malformed`,
/// carrying the raw text for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceInfoLookup {
    Found(DeviceInfo),
    Malformed { device_id: String, raw: String },
}

impl DeviceInfoLookup {
    /// Decode a rendered device-info template.
    pub fn from_rendered(device_id: &str, raw: &str) -> Self {
        match serde_json::from_str::<DeviceInfo>(raw) {
            Ok(info) => Self::Found(info),
            Err(e) => {
                warn!(device_id, error = %e, raw = %preview(raw), "device info did not decode");
                Self::Malformed {
                    device_id: device_id.to_owned(),
                    raw: raw.to_owned(),
                }
            }
        }
    }
}

fn unknown() -> String {
    "unknown".into()
}

fn null_as_unknown<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_else(unknown))
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}
