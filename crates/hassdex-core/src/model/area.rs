use serde::{Deserialize, Serialize};

/// A user-defined location grouping entities and devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub devices: Vec<String>,
}

impl Area {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entities: Vec::new(),
            devices: Vec::new(),
        }
    }
}
