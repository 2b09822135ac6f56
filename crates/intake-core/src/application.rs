//! Mapping of a submission onto a new tracker task.

use std::fmt::Write as _;

use intake_config::{ApplicantField, FieldMap};

use crate::model::NewTask;
use crate::payload::ApplicationPayload;
use crate::resolver::{OptionResolver, push_dropdown_or_text};

const FALLBACK_TASK_NAME: &str = "Application";
const NAME_KEYS: [&str; 5] = ["fullname", "name", "applicantname", "firstname", "lastname"];

/// Compose the task for a submission.
///
/// The description lists every answer in readable form; custom fields are
/// filled for each mapped applicant field through [`push_dropdown_or_text`].
#[must_use]
pub fn build_application_task(
    payload: &ApplicationPayload,
    fields: &FieldMap,
    resolver: &OptionResolver,
) -> NewTask {
    let name = payload
        .full_name()
        .unwrap_or_else(|| FALLBACK_TASK_NAME.to_string());

    let mut assignments = Vec::new();
    for field in ApplicantField::ALL {
        if let Some(field_id) = fields.applicant_field(field) {
            let raw = payload.get_any(field.keys());
            push_dropdown_or_text(resolver, &mut assignments, field_id, raw);
        }
    }

    NewTask {
        description: describe(&name, payload),
        name,
        assignments,
    }
}

fn describe(name: &str, payload: &ApplicationPayload) -> String {
    let mut description = format!("## {name}\n\n");
    let mut known: Vec<&str> = NAME_KEYS.to_vec();

    for field in ApplicantField::ALL {
        known.extend_from_slice(field.keys());
        if let Some(value) = payload.get_any(field.keys()) {
            let _ = writeln!(description, "- **{}:** {value}", field.label());
        }
    }

    let extras: Vec<(&str, &str)> = payload
        .entries()
        .filter(|(key, _)| !known.contains(key))
        .collect();
    if !extras.is_empty() {
        description.push_str("\n### Additional answers\n\n");
        for (key, value) in extras {
            let _ = writeln!(description, "- **{key}:** {value}");
        }
    }
    description
}
