//! Run-to-completion workloads: Job, or CronJob when a schedule resolves.

use resources::{
    models::{job::JobDeclaration, overlay::Overlay},
    objects::{
        job::{CronJob, CronJobSpec, Job, JobSpec, JobTemplateSpec},
        pod::{Container, PodSpec, PodTemplateSpec, TemplateMetadata},
        KubeObject, Labels, Metadata,
    },
};

use crate::{
    deployment::image_pull_secrets,
    error::{Error, Result},
    resolver::resolve_image_coordinates,
    schedule::resolve_schedule,
};

pub const JOB_API_VERSION: &str = "batch/v1";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJob {
    pub declaration: JobDeclaration,
    /// Cron expression, for periodic jobs.
    pub schedule: Option<String>,
}

/// Normalizes the job image and applies the overlay schedule section.
/// The overlay image section belongs to the service workload and is not
/// applied to jobs.
pub fn resolve_job(
    declaration: &JobDeclaration,
    overlay: Option<&Overlay>,
    strict_schedule: bool,
) -> Result<ResolvedJob> {
    if declaration.name.is_empty() {
        return Err(Error::missing_field("job", "name"));
    }
    let image = resolve_image_coordinates(
        &declaration.name,
        &declaration.image,
        declaration.registry.as_deref(),
        declaration.base_image.as_deref(),
        None,
    )?;
    if image.image.is_empty() {
        return Err(Error::missing_field(
            &format!("job '{}'", declaration.name),
            "image",
        ));
    }
    let schedule = resolve_schedule(declaration.schedule.as_ref(), overlay, strict_schedule)?;

    let mut declaration = declaration.clone();
    declaration.image = image.image;
    declaration.registry = image.registry;
    declaration.base_image = image.base_image;
    if declaration.labels.is_empty() {
        declaration.labels = Labels::new().insert("app", declaration.name.clone());
    }
    Ok(ResolvedJob {
        declaration,
        schedule,
    })
}

fn job_spec(job: &JobDeclaration) -> JobSpec {
    JobSpec {
        template: PodTemplateSpec {
            metadata: TemplateMetadata {
                labels: job.labels.clone(),
                annotations: Default::default(),
            },
            spec: PodSpec {
                containers: vec![Container {
                    name: job.name.clone(),
                    image: job.image.clone(),
                    image_pull_policy: job.image_pull_policy.unwrap_or_default(),
                    env: job.env.clone(),
                    ..Default::default()
                }],
                image_pull_secrets: image_pull_secrets(&job.image_pull_secrets),
                volumes: vec![],
                node_selector: Default::default(),
                restart_policy: Some(job.restart_policy),
            },
        },
        backoff_limit: job.backoff_limit,
        active_deadline_seconds: job.active_deadline_seconds,
    }
}

pub fn assemble(job: &ResolvedJob) -> KubeObject {
    let declaration = &job.declaration;
    let metadata = Metadata {
        name: declaration.name.clone(),
        namespace: declaration.namespace.clone(),
        labels: declaration.labels.clone(),
        annotations: declaration.annotations.clone(),
    };
    match &job.schedule {
        Some(schedule) => KubeObject::CronJob(CronJob {
            api_version: JOB_API_VERSION.to_string(),
            metadata,
            spec: CronJobSpec {
                schedule: schedule.clone(),
                job_template: JobTemplateSpec {
                    spec: job_spec(declaration),
                },
            },
        }),
        None => KubeObject::Job(Job {
            api_version: JOB_API_VERSION.to_string(),
            metadata,
            spec: job_spec(declaration),
        }),
    }
}
