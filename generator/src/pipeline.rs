//! Generation of every artifact of one build, in dependency order.
//!
//! Storage objects come first, then the autoscaler, then the workload that
//! mounts and is scaled by them, then its image descriptor. A declared job is
//! generated after the workload. A failure discards everything this run
//! produced.

use resources::{
    models::{job::JobDeclaration, overlay::Overlay, workload::WorkloadSpec, BuildSettings, BuildSpec},
    objects::KubeObject,
};

use crate::{
    autoscaler::autoscaler,
    context::{Artifact, BuildContext},
    deployment,
    error::Result,
    image,
    job,
    resolver::{base_name, resolve},
    storage,
    validator::validate,
    volume,
};

pub fn generate(ctx: &mut BuildContext, spec: &BuildSpec, overlay: Option<&Overlay>) -> Result<()> {
    let mark = ctx.mark();
    let result = generate_all(ctx, spec, overlay);
    if result.is_err() {
        ctx.rollback(mark);
    }
    result
}

fn generate_all(ctx: &mut BuildContext, spec: &BuildSpec, overlay: Option<&Overlay>) -> Result<()> {
    if spec.workload.is_none() && spec.job.is_none() {
        tracing::warn!("Nothing to generate: neither a workload nor a job is declared");
    }
    if let Some(workload) = &spec.workload {
        generate_workload(ctx, workload, overlay)?;
    }
    if let Some(job) = &spec.job {
        generate_job(ctx, job, overlay)?;
    }
    Ok(())
}

/// Name the artifact files of a build are prefixed with.
pub fn output_name(spec: &BuildSpec) -> Option<&str> {
    spec.workload
        .as_ref()
        .map(|workload| base_name(&workload.name))
        .or_else(|| spec.job.as_ref().map(|job| job.name.as_str()))
}

fn apply_build_env(ctx: &BuildContext, build: &mut BuildSettings) {
    if build.docker_host.is_none() {
        build.docker_host = ctx.docker_env.host.clone();
    }
    if build.docker_cert_path.is_none() {
        build.docker_cert_path = ctx.docker_env.cert_path.clone();
    }
}

fn apply_workload_defaults(ctx: &BuildContext, spec: &mut WorkloadSpec) {
    if spec.namespace.is_none() {
        spec.namespace = ctx.config.default_namespace.clone();
    }
    if spec.image_pull_policy.is_none() {
        spec.image_pull_policy = Some(ctx.config.image_pull_policy);
    }
    apply_build_env(ctx, &mut spec.build);
}

fn generate_workload(ctx: &mut BuildContext, base: &WorkloadSpec, overlay: Option<&Overlay>) -> Result<()> {
    let mut resolved = resolve(base, overlay)?;
    apply_workload_defaults(ctx, &mut resolved);
    let spec = validate(resolved)?;
    tracing::debug!("Resolved workload {} with image {}", spec.name, spec.image);

    let namespace = spec.namespace.as_deref();
    for reference in &spec.secrets {
        if let Some(secret) = storage::secret(reference, namespace) {
            ctx.push(Artifact::manifest(KubeObject::Secret(secret)));
        }
    }
    for reference in &spec.config_maps {
        if let Some(config_map) = storage::config_map(reference, namespace) {
            ctx.push(Artifact::manifest(KubeObject::ConfigMap(config_map)));
        }
    }
    for reference in &spec.volume_claims {
        let claim = storage::volume_claim(reference, namespace)?;
        ctx.push(Artifact::manifest(KubeObject::PersistentVolumeClaim(claim)));
    }
    if let Some(hpa) = autoscaler(&spec)? {
        ctx.push(Artifact::manifest(KubeObject::HorizontalPodAutoscaler(hpa)));
    }

    let bindings = volume::synthesize(&spec);
    let deployment = deployment::assemble(&spec, bindings);
    deployment::check_selector(&deployment)?;
    ctx.push(Artifact::manifest(KubeObject::Deployment(deployment)));
    ctx.push(Artifact::image(image::describe_workload(&spec)));
    Ok(())
}

fn generate_job(ctx: &mut BuildContext, declaration: &JobDeclaration, overlay: Option<&Overlay>) -> Result<()> {
    let mut declaration = declaration.clone();
    if declaration.namespace.is_none() {
        declaration.namespace = ctx.config.default_namespace.clone();
    }
    if declaration.image_pull_policy.is_none() {
        declaration.image_pull_policy = Some(ctx.config.image_pull_policy);
    }
    apply_build_env(ctx, &mut declaration.build);

    let resolved = job::resolve_job(&declaration, overlay, ctx.config.strict_schedule)?;
    ctx.push(Artifact::manifest(job::assemble(&resolved)));
    ctx.push(Artifact::image(image::describe_job(&resolved.declaration)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use resources::{
        config::GeneratorConfig,
        models::{
            job::ScheduleFields,
            overlay::{ContainerOverlay, DeploymentOverlay, ImageOverlay, ProbeOverlay, ProbesOverlay},
            workload::{AutoscalerDeclaration, ConfigMapRef, SecretRef, VolumeClaimRef},
        },
        objects::{pod::ContainerPort, ResourceKind},
    };

    use super::*;
    use crate::{context::DockerEnv, error::Error};

    fn build_spec() -> BuildSpec {
        let mut workload = WorkloadSpec::new("hello-deployment");
        workload.image = "hello:1.0.0".to_string();
        workload.ports = vec![ContainerPort::new(8080)];
        workload.secrets.push(SecretRef {
            name: "db-secret".to_string(),
            mount_path: "/etc/db".to_string(),
            read_only: true,
            default_mode: 0,
            data: BTreeMap::from([("password".to_string(), "hunter2".to_string())]),
        });
        workload.config_maps.push(ConfigMapRef {
            name: "app-config".to_string(),
            mount_path: Some("/etc/app".to_string()),
            read_only: true,
            default_mode: 0,
            data: BTreeMap::from([("app.toml".to_string(), "debug = false".to_string())]),
        });
        workload.volume_claims.push(VolumeClaimRef {
            name: "data".to_string(),
            mount_path: "/data".to_string(),
            read_only: false,
            default_mode: 0,
            access_mode: Default::default(),
            volume_claim_size: Some("1Gi".parse().unwrap()),
            storage_class: None,
        });
        workload.autoscaler = Some(AutoscalerDeclaration::default());

        let mut job = JobDeclaration::new("cleanup");
        job.image = "cleanup:1".to_string();
        job.schedule = Some(ScheduleFields {
            minutes: Some("0".to_string()),
            ..Default::default()
        });

        BuildSpec {
            workload: Some(workload),
            job: Some(job),
        }
    }

    fn overlay() -> Overlay {
        Overlay {
            deployment: Some(DeploymentOverlay {
                replicas: Some(5),
                probes: Some(ProbesOverlay {
                    liveness: Some(ProbeOverlay {
                        port: None,
                        path: Some("/health".to_string()),
                    }),
                    readiness: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn context() -> BuildContext {
        BuildContext::new(
            GeneratorConfig {
                default_namespace: Some("staging".to_string()),
                ..Default::default()
            },
            DockerEnv {
                host: Some("tcp://127.0.0.1:2376".to_string()),
                cert_path: None,
            },
        )
    }

    fn render(ctx: &BuildContext) -> Vec<String> {
        ctx.artifacts()
            .iter()
            .map(|artifact| artifact.render().unwrap())
            .collect()
    }

    #[test]
    fn kinds_in_dependency_order() {
        let mut ctx = context();
        generate(&mut ctx, &build_spec(), Some(&overlay())).unwrap();
        let kinds = ctx.artifacts().iter().map(|a| a.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::Secret,
                ResourceKind::ConfigMap,
                ResourceKind::VolumeClaim,
                ResourceKind::Hpa,
                ResourceKind::Deployment,
                ResourceKind::Image,
                ResourceKind::CronJob,
                ResourceKind::Image,
            ]
        );
    }

    #[test]
    fn overlay_and_defaults_reach_manifests() {
        let mut ctx = context();
        generate(&mut ctx, &build_spec(), Some(&overlay())).unwrap();
        let deployment = ctx
            .artifacts()
            .iter()
            .find_map(|artifact| match &artifact.payload {
                crate::context::Payload::Manifest(KubeObject::Deployment(deployment)) => {
                    Some(deployment.clone())
                },
                _ => None,
            })
            .unwrap();
        assert_eq!(deployment.spec.replicas, 5);
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("staging"));
        let container = &deployment.spec.template.spec.containers[0];
        assert_eq!(container.liveness_probe.as_ref().unwrap().http_get.port, 8080);

        let image = ctx
            .artifacts()
            .iter()
            .find_map(|artifact| match &artifact.payload {
                crate::context::Payload::Image(image) => Some(image.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(image.docker_host.as_deref(), Some("tcp://127.0.0.1:2376"));
    }

    #[test]
    fn image_overlay_renames_workload_only() {
        let overlay = Overlay {
            container: Some(ContainerOverlay {
                image: Some(ImageOverlay {
                    name: Some("shop".to_string()),
                    tag: Some("9".to_string()),
                    ..Default::default()
                }),
            }),
            ..overlay()
        };
        let mut ctx = context();
        generate(&mut ctx, &build_spec(), Some(&overlay)).unwrap();

        let references = ctx
            .artifacts()
            .iter()
            .filter_map(|artifact| match &artifact.payload {
                crate::context::Payload::Image(image) => Some(image.reference()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(references, vec!["shop:9".to_string(), "cleanup:1".to_string()]);

        let job_image = ctx
            .artifacts()
            .iter()
            .find_map(|artifact| match &artifact.payload {
                crate::context::Payload::Manifest(KubeObject::CronJob(cron_job)) => Some(
                    cron_job.spec.job_template.spec.template.spec.containers[0]
                        .image
                        .clone(),
                ),
                _ => None,
            })
            .unwrap();
        assert_eq!(job_image, "cleanup:1");
    }

    #[test]
    fn identical_input_renders_identically() {
        let mut first = context();
        let mut second = context();
        generate(&mut first, &build_spec(), Some(&overlay())).unwrap();
        generate(&mut second, &build_spec(), Some(&overlay())).unwrap();
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn failure_discards_run() {
        let mut spec = build_spec();
        if let Some(job) = spec.job.as_mut() {
            job.image.clear();
        }
        let mut ctx = context();
        let err = generate(&mut ctx, &spec, None).unwrap_err();
        assert!(matches!(err, Error::UpstreamModel(_)));
        assert!(ctx.artifacts().is_empty());
    }

    #[test]
    fn missing_port_aborts_before_any_artifact() {
        let mut spec = build_spec();
        if let Some(workload) = spec.workload.as_mut() {
            workload.ports.clear();
        }
        let mut ctx = context();
        let err = generate(&mut ctx, &spec, Some(&overlay())).unwrap_err();
        assert!(err.to_string().contains("liveness probe"));
        assert!(ctx.artifacts().is_empty());
    }

    #[test]
    fn output_name_prefers_workload() {
        assert_eq!(output_name(&build_spec()), Some("hello"));
        let job_only = BuildSpec {
            workload: None,
            ..build_spec()
        };
        assert_eq!(output_name(&job_only), Some("cleanup"));
        assert_eq!(output_name(&BuildSpec::default()), None);
    }
}
