use serde::{Deserialize, Serialize};

/// Identifies the referred resource, across API versions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// API version of the referent.
    pub api_version: String,
    /// Kind of the referent.
    pub kind: String,
    /// Name of the referent.
    pub name: String,
}

impl ObjectReference {
    pub fn new(api_version: &str, kind: &str, name: String) -> ObjectReference {
        ObjectReference {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name,
        }
    }
}
