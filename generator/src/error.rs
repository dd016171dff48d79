//! Generation error types
//!
//! Every failure aborts the whole run. The variant says which side is at
//! fault: the overlay document, the resolved specification, the upstream
//! base specification, or the filesystem.

use std::path::PathBuf;

use resources::objects::ResourceKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The overlay document is malformed.
    #[error("invalid overlay: {0}")]
    Configuration(String),

    /// The resolved specification breaks an invariant.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The base specification lacks a field a resolution step depends on.
    #[error("incomplete base specification: {0}")]
    UpstreamModel(String),

    #[error("failed to serialize {kind} artifact: {source}")]
    Serialization {
        kind: ResourceKind,
        source: serde_yaml::Error,
    },

    #[error("failed to write artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// A probe has no port and none can be derived.
    pub fn missing_port(probe: &str) -> Self {
        Self::Validation(format!(
            "unable to detect port for {} probe: no container port is declared, \
             a network-listening declaration is required on the workload",
            probe
        ))
    }

    pub fn missing_field(owner: &str, field: &str) -> Self {
        Self::UpstreamModel(format!("{} has no {}", owner, field))
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
