//! Synthesis of orchestrator manifests and an image descriptor from a base
//! workload specification and an optional overlay.

pub mod autoscaler;
pub mod context;
pub mod deployment;
pub mod error;
pub mod image;
pub mod job;
pub mod overlay;
pub mod pipeline;
pub mod resolver;
pub mod schedule;
pub mod storage;
pub mod validator;
pub mod volume;
pub mod writer;

pub use context::{Artifact, BuildContext, DockerEnv};
pub use error::{Error, Result};
pub use overlay::parse_overlay;
pub use pipeline::{generate, output_name};
pub use resolver::resolve;
pub use validator::{validate, ValidatedSpec};
pub use writer::write_artifacts;
