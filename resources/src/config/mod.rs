use serde::{Deserialize, Serialize};

use crate::objects::pod::ImagePullPolicy;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the artifacts are written to.
    /// Defaults to "kubernetes".
    pub output_dir: String,
    /// Namespace used for objects whose specification does not name one.
    pub default_namespace: Option<String>,
    /// Pull policy used for containers whose specification does not name one.
    /// Defaults to IfNotPresent.
    pub image_pull_policy: ImagePullPolicy,
    /// Reject job schedules with missing sub-fields instead of
    /// rendering them as "null". Defaults to false.
    pub strict_schedule: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: "kubernetes".to_string(),
            default_namespace: None,
            image_pull_policy: ImagePullPolicy::IfNotPresent,
            strict_schedule: false,
        }
    }
}
