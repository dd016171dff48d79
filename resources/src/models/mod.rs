use serde::{Deserialize, Serialize};

pub mod image;
pub mod job;
pub mod overlay;
pub mod workload;

/// The base specification of one build: a service workload, a job, or both.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildSpec {
    #[serde(default)]
    pub workload: Option<workload::WorkloadSpec>,
    #[serde(default)]
    pub job: Option<job::JobDeclaration>,
}

/// Settings handed through to the image builder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BuildSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Push the image once built.
    pub push: bool,
    /// Build the image at all.
    pub build_image: bool,
    pub docker_host: Option<String>,
    pub docker_cert_path: Option<String>,
    pub docker_config_path: Option<String>,
    /// Entrypoint override of the image.
    pub cmd: Option<String>,
    pub command_args: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            username: None,
            password: None,
            push: false,
            build_image: true,
            docker_host: None,
            docker_cert_path: None,
            docker_config_path: None,
            cmd: None,
            command_args: vec![],
        }
    }
}
