use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Metadata, Object};

/// ConfigMap holds configuration data for pods to consume.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    pub api_version: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ConfigMap {
    pub fn new(metadata: Metadata) -> Self {
        ConfigMap {
            api_version: "v1".to_string(),
            metadata,
            data: BTreeMap::new(),
        }
    }
}

impl Object for ConfigMap {
    fn kind(&self) -> &'static str {
        "ConfigMap"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}
