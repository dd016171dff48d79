use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BuildSettings;
use crate::objects::{
    pod::{EnvVar, ImagePullPolicy, RestartPolicy},
    Labels,
};

/// Base specification of a run-to-completion workload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobDeclaration {
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub base_image: Option<String>,
    #[serde(default)]
    pub image_pull_policy: Option<ImagePullPolicy>,
    #[serde(default)]
    pub image_pull_secrets: Vec<String>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default = "default_restart_policy")]
    pub restart_policy: RestartPolicy,
    #[serde(default = "default_backoff_limit")]
    pub backoff_limit: u32,
    #[serde(default)]
    pub active_deadline_seconds: Option<u64>,
    /// Present for jobs that run periodically.
    #[serde(default)]
    pub schedule: Option<ScheduleFields>,
    #[serde(default)]
    pub build: BuildSettings,
}

fn default_restart_policy() -> RestartPolicy {
    RestartPolicy::Never
}

fn default_backoff_limit() -> u32 {
    3
}

impl JobDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        JobDeclaration {
            name: name.into(),
            labels: Labels::new(),
            annotations: BTreeMap::new(),
            namespace: None,
            image: String::new(),
            registry: None,
            base_image: None,
            image_pull_policy: None,
            image_pull_secrets: vec![],
            env: vec![],
            restart_policy: default_restart_policy(),
            backoff_limit: default_backoff_limit(),
            active_deadline_seconds: None,
            schedule: None,
            build: BuildSettings::default(),
        }
    }
}

/// The five sub-fields of a cron schedule, in cron order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ScheduleFields {
    #[serde(default)]
    pub minutes: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default, alias = "dayOfMonth")]
    pub day_of_month: Option<String>,
    #[serde(default, alias = "monthOfYear")]
    pub month_of_year: Option<String>,
    #[serde(default, alias = "daysOfWeek")]
    pub days_of_week: Option<String>,
}

impl ScheduleFields {
    /// Fields in cron order, paired with their names.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("minutes", self.minutes.as_deref()),
            ("hours", self.hours.as_deref()),
            ("day_of_month", self.day_of_month.as_deref()),
            ("month_of_year", self.month_of_year.as_deref()),
            ("days_of_week", self.days_of_week.as_deref()),
        ]
    }

    /// Field-by-field merge, values from `other` win.
    pub fn merged_with(&self, other: &ScheduleFields) -> ScheduleFields {
        ScheduleFields {
            minutes: other.minutes.clone().or_else(|| self.minutes.clone()),
            hours: other.hours.clone().or_else(|| self.hours.clone()),
            day_of_month: other
                .day_of_month
                .clone()
                .or_else(|| self.day_of_month.clone()),
            month_of_year: other
                .month_of_year
                .clone()
                .or_else(|| self.month_of_year.clone()),
            days_of_week: other
                .days_of_week
                .clone()
                .or_else(|| self.days_of_week.clone()),
        }
    }
}
