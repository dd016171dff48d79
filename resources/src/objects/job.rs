use serde::{Deserialize, Serialize};

use super::{pod::PodTemplateSpec, Metadata, Object};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub api_version: String,
    /// Standard object's metadata.
    pub metadata: Metadata,
    /// Specification of the desired behavior of a job.
    pub spec: JobSpec,
}

impl Object for Job {
    fn kind(&self) -> &'static str {
        "Job"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Describes the pod that will be created when executing a job.
    pub template: PodTemplateSpec,
    /// Specifies the number of retries before marking this job failed.
    pub backoff_limit: u32,
    /// Specifies the duration in seconds relative to the startTime
    /// that the job may be continuously active before the system tries to terminate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_deadline_seconds: Option<u64>,
}

/// CronJob represents the configuration of a single cron job.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CronJob {
    pub api_version: String,
    pub metadata: Metadata,
    pub spec: CronJobSpec,
}

impl Object for CronJob {
    fn kind(&self) -> &'static str {
        "CronJob"
    }

    fn name(&self) -> &String {
        &self.metadata.name
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CronJobSpec {
    /// The schedule in Cron format.
    pub schedule: String,
    /// Specifies the job that will be created when executing a CronJob.
    pub job_template: JobTemplateSpec,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobTemplateSpec {
    pub spec: JobSpec,
}
