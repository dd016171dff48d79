//! Image coordinates and the companion image-build descriptor.

use std::collections::BTreeSet;

use resources::models::{image::ImageDescriptor, job::JobDeclaration, BuildSettings};

use crate::validator::ValidatedSpec;

pub const DEFAULT_TAG: &str = "latest";

/// An image reference split into its coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub registry: Option<String>,
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    /// Splits `[registry/]name[:tag]`.
    ///
    /// The tag is whatever follows the last colon of the last path segment,
    /// "latest" when there is none. When `registry` is given, it is stripped
    /// from the front of the name; otherwise a leading segment that looks like
    /// a host (contains a dot or a port, or is `localhost`) is taken as the
    /// registry.
    pub fn parse(image: &str, registry: Option<&str>) -> Self {
        let (repository, tag) = split_tag(image);
        let (registry, name) = split_registry(repository, registry);
        ImageRef {
            registry,
            name: name.to_string(),
            tag,
        }
    }

    /// `registry/name:tag` when the registry is non-empty, `name:tag` otherwise.
    pub fn reference(&self) -> String {
        compose(self.registry.as_deref(), &self.name, &self.tag)
    }
}

pub fn compose(registry: Option<&str>, name: &str, tag: &str) -> String {
    match registry {
        Some(registry) if !registry.is_empty() => format!("{}/{}:{}", registry, name, tag),
        _ => format!("{}:{}", name, tag),
    }
}

fn split_tag(image: &str) -> (&str, String) {
    let last_segment = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[last_segment..].rfind(':') {
        Some(i) => {
            let colon = last_segment + i;
            let tag = &image[colon + 1..];
            let tag = if tag.is_empty() { DEFAULT_TAG } else { tag };
            (&image[..colon], tag.to_string())
        },
        None => (image, DEFAULT_TAG.to_string()),
    }
}

fn split_registry<'a>(repository: &'a str, registry: Option<&str>) -> (Option<String>, &'a str) {
    if let Some(registry) = registry.filter(|registry| !registry.is_empty()) {
        let name = repository
            .strip_prefix(registry)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(repository);
        return (Some(registry.to_string()), name);
    }
    match repository.split_once('/') {
        Some((host, name)) if host.contains('.') || host.contains(':') || host == "localhost" => {
            (Some(host.to_string()), name)
        },
        _ => (None, repository),
    }
}

/// Descriptor for the image of a service workload.
pub fn describe_workload(spec: &ValidatedSpec) -> ImageDescriptor {
    let ports = spec.ports.iter().map(|port| port.container_port).collect();
    describe(
        &spec.image,
        spec.registry.as_deref(),
        spec.base_image.clone(),
        ports,
        &spec.build,
        true,
    )
}

/// Descriptor for the image of a job. Jobs expose no ports.
pub fn describe_job(job: &JobDeclaration) -> ImageDescriptor {
    describe(
        &job.image,
        job.registry.as_deref(),
        job.base_image.clone(),
        BTreeSet::new(),
        &job.build,
        false,
    )
}

fn describe(
    image: &str,
    registry: Option<&str>,
    base_image: Option<String>,
    ports: BTreeSet<u16>,
    build: &BuildSettings,
    service: bool,
) -> ImageDescriptor {
    let image = ImageRef::parse(image, registry);
    ImageDescriptor {
        name: image.name,
        registry: image.registry,
        tag: image.tag,
        base_image,
        ports,
        push: build.push,
        build_image: build.build_image,
        username: build.username.clone(),
        password: build.password.clone(),
        docker_config_path: build.docker_config_path.clone(),
        docker_host: build.docker_host.clone(),
        docker_cert_path: build.docker_cert_path.clone(),
        cmd: build.cmd.clone(),
        command_args: build.command_args.clone(),
        enable_debug: false,
        service,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use resources::{
        models::workload::WorkloadSpec,
        objects::pod::ContainerPort,
    };

    use super::*;
    use crate::validator::validate;

    #[test]
    fn parse_registry_name_tag() {
        assert_eq!(
            ImageRef::parse("registry.example.com/foo:1.2.3", None),
            ImageRef {
                registry: Some("registry.example.com".to_string()),
                name: "foo".to_string(),
                tag: "1.2.3".to_string(),
            }
        );
    }

    #[test]
    fn parse_without_tag_defaults_to_latest() {
        assert_eq!(
            ImageRef::parse("foo", None),
            ImageRef {
                registry: None,
                name: "foo".to_string(),
                tag: "latest".to_string(),
            }
        );
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        let image = ImageRef::parse("localhost:5000/foo", None);
        assert_eq!(image.registry.as_deref(), Some("localhost:5000"));
        assert_eq!(image.name, "foo");
        assert_eq!(image.tag, "latest");
    }

    #[test]
    fn known_registry_is_stripped() {
        let image = ImageRef::parse("docker.io/acme/hello:v2", Some("docker.io/acme"));
        assert_eq!(image.registry.as_deref(), Some("docker.io/acme"));
        assert_eq!(image.name, "hello");
        assert_eq!(image.reference(), "docker.io/acme/hello:v2");
    }

    #[test]
    fn plain_namespace_is_not_a_registry() {
        let image = ImageRef::parse("acme/hello:v2", None);
        assert_eq!(image.registry, None);
        assert_eq!(image.name, "acme/hello");
    }

    #[test]
    fn compose_without_registry() {
        assert_eq!(compose(None, "foo", "1"), "foo:1");
        assert_eq!(compose(Some(""), "foo", "1"), "foo:1");
        assert_eq!(compose(Some("r.io"), "foo", "1"), "r.io/foo:1");
    }

    #[test]
    fn workload_descriptor() {
        let mut spec = WorkloadSpec::new("hello-deployment");
        spec.image = "registry.example.com/foo:1.2.3".to_string();
        spec.ports = vec![
            ContainerPort::new(9090),
            ContainerPort::new(8080),
            ContainerPort::new(9090),
        ];
        spec.build.push = true;
        spec.build.command_args = vec!["--verbose".to_string()];
        let descriptor = describe_workload(&validate(spec).unwrap());

        assert_eq!(descriptor.name, "foo");
        assert_eq!(descriptor.tag, "1.2.3");
        assert_eq!(descriptor.registry.as_deref(), Some("registry.example.com"));
        assert_eq!(descriptor.ports, BTreeSet::from([8080, 9090]));
        assert!(descriptor.push);
        assert!(descriptor.build_image);
        assert!(!descriptor.enable_debug);
        assert!(descriptor.service);
        assert_eq!(descriptor.command_args, vec!["--verbose".to_string()]);
    }

    #[test]
    fn job_descriptor_has_no_ports() {
        let mut job = JobDeclaration::new("cleanup");
        job.image = "cleanup".to_string();
        let descriptor = describe_job(&job);
        assert_eq!(descriptor.tag, "latest");
        assert!(descriptor.ports.is_empty());
        assert!(!descriptor.service);
    }
}
