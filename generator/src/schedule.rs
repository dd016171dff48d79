//! Cron expression resolution for periodic jobs.

use resources::models::{job::ScheduleFields, overlay::Overlay};

use crate::error::{Error, Result};

/// Placeholder a missing field renders as in lenient mode.
pub const MISSING_FIELD: &str = "null";

/// Joins the five fields in cron order. Missing fields become `null`.
pub fn to_cron(fields: &ScheduleFields) -> String {
    fields
        .fields()
        .iter()
        .map(|(_, value)| value.unwrap_or(MISSING_FIELD))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`to_cron`], but every field must be present.
pub fn to_cron_strict(fields: &ScheduleFields) -> Result<String> {
    let missing = fields
        .fields()
        .iter()
        .filter(|(_, value)| value.map_or(true, |value| value.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "schedule is missing {}",
            missing.join(", ")
        )));
    }
    Ok(to_cron(fields))
}

/// Merges the overlay schedule over the declared one and renders it.
/// `None` when neither declares a schedule.
pub fn resolve_schedule(
    declared: Option<&ScheduleFields>,
    overlay: Option<&Overlay>,
    strict: bool,
) -> Result<Option<String>> {
    let fields = match (declared, overlay.and_then(Overlay::schedule)) {
        (None, None) => return Ok(None),
        (Some(declared), None) => declared.clone(),
        (None, Some(overlay)) => overlay.clone(),
        (Some(declared), Some(overlay)) => declared.merged_with(overlay),
    };
    let cron = if strict {
        to_cron_strict(&fields)?
    } else {
        to_cron(&fields)
    };
    if fields.fields().iter().any(|(_, value)| value.is_none()) {
        tracing::warn!("Schedule has missing fields: {}", cron);
    }
    Ok(Some(cron))
}
