//! Request and response bodies of the tracker REST API.

use intake_core::{
    AssignmentValue, CreatedTask, FieldDefinition, FieldOption, NewTask, UploadedAttachment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct FieldsResponse {
    #[serde(default)]
    pub(crate) fields: Vec<WireField>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireField {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(rename = "type", default)]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) type_config: Option<WireTypeConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireTypeConfig {
    #[serde(default)]
    pub(crate) options: Vec<WireOption>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireOption {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    // label fields name their options with `label`
    #[serde(default)]
    pub(crate) label: Option<String>,
}

impl From<WireField> for FieldDefinition {
    fn from(field: WireField) -> Self {
        let options = field
            .type_config
            .unwrap_or_default()
            .options
            .into_iter()
            .filter_map(|option| {
                let name = option.name.or(option.label)?;
                Some(FieldOption {
                    id: option.id,
                    name,
                })
            })
            .collect();
        Self {
            id: field.id,
            name: field.name,
            kind: field.kind,
            options,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTaskRequest<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: &'a str,
    pub(crate) custom_fields: Vec<CustomFieldValue<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomFieldValue<'a> {
    pub(crate) id: &'a str,
    pub(crate) value: WireValue<'a>,
}

/// `labels` fields take an array of option ids; every other field a scalar.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum WireValue<'a> {
    Single(&'a str),
    Many(&'a [String]),
}

impl<'a> From<&'a AssignmentValue> for WireValue<'a> {
    fn from(value: &'a AssignmentValue) -> Self {
        match value {
            AssignmentValue::Text(value) | AssignmentValue::Option(value) => Self::Single(value),
            AssignmentValue::Labels(ids) => Self::Many(ids),
        }
    }
}

impl<'a> From<&'a NewTask> for CreateTaskRequest<'a> {
    fn from(task: &'a NewTask) -> Self {
        Self {
            name: &task.name,
            description: &task.description,
            custom_fields: task
                .assignments
                .iter()
                .map(|assignment| CustomFieldValue {
                    id: &assignment.field_id,
                    value: WireValue::from(&assignment.value),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskResponse {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) url: Option<String>,
}

impl From<TaskResponse> for CreatedTask {
    fn from(task: TaskResponse) -> Self {
        Self {
            id: task.id,
            url: task.url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SetFieldRequest<'a> {
    pub(crate) value: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AttachmentResponse {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) url: Option<String>,
}

impl From<AttachmentResponse> for UploadedAttachment {
    fn from(attachment: AttachmentResponse) -> Self {
        Self {
            id: attachment.id,
            url: attachment.url,
        }
    }
}
