//! Per-run build state.

use resources::{
    config::GeneratorConfig,
    models::image::ImageDescriptor,
    objects::{KubeObject, Object, ResourceKind},
};
use serde::Serialize;

use crate::error::{Error, Result};

/// Docker daemon settings taken from the environment of the build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DockerEnv {
    pub host: Option<String>,
    pub cert_path: Option<String>,
}

impl DockerEnv {
    /// Reads `DOCKER_HOST` and `DOCKER_CERT_PATH`.
    pub fn from_env() -> Self {
        DockerEnv {
            host: std::env::var("DOCKER_HOST").ok(),
            cert_path: std::env::var("DOCKER_CERT_PATH").ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Manifest(KubeObject),
    Image(ImageDescriptor),
}

/// One generated document.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub kind: ResourceKind,
    pub payload: Payload,
}

impl Artifact {
    pub fn manifest(object: KubeObject) -> Self {
        Artifact {
            kind: object.resource_kind(),
            payload: Payload::Manifest(object),
        }
    }

    pub fn image(descriptor: ImageDescriptor) -> Self {
        Artifact {
            kind: ResourceKind::Image,
            payload: Payload::Image(descriptor),
        }
    }

    pub fn render(&self) -> Result<String> {
        serde_yaml::to_string(&self.payload).map_err(|source| Error::Serialization {
            kind: self.kind,
            source,
        })
    }
}

/// Inputs shared by every stage of one run, and the artifacts produced so far.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub config: GeneratorConfig,
    pub docker_env: DockerEnv,
    artifacts: Vec<Artifact>,
}

impl BuildContext {
    pub fn new(config: GeneratorConfig, docker_env: DockerEnv) -> Self {
        BuildContext {
            config,
            docker_env,
            artifacts: vec![],
        }
    }

    pub fn push(&mut self, artifact: Artifact) {
        match &artifact.payload {
            Payload::Manifest(object) => {
                tracing::info!("Generated {} {}", object.kind(), object.name())
            },
            Payload::Image(descriptor) => {
                tracing::info!("Generated image descriptor {}", descriptor.reference())
            },
        }
        self.artifacts.push(artifact);
    }

    /// Number of artifacts collected so far, to roll back to.
    pub fn mark(&self) -> usize {
        self.artifacts.len()
    }

    pub fn rollback(&mut self, mark: usize) {
        if mark < self.artifacts.len() {
            tracing::debug!("Discarding {} artifacts", self.artifacts.len() - mark);
            self.artifacts.truncate(mark);
        }
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}
