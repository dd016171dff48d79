use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Metadata, Object};

/// Secret holds secret data of a certain type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub api_version: String,
    pub metadata: Metadata,
    /// Used to facilitate programmatic handling of secret data.
    #[serde(rename = "type")]
    pub type_: String,
    /// Non-binary secret data in string form.
    /// The orchestrator encodes it on write.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub string_data: BTreeMap<String, String>,
}

impl Secret {
    pub fn opaque(metadata: Metadata) -> Self {
        Secret {
            api_version: "v1".to_string(),
            metadata,
            type_: "Opaque".to_string(),
            string_data: BTreeMap::new(),
        }
    }
}

impl Object for Secret {
    fn kind(&self) -> &'static str {
        "Secret"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}
