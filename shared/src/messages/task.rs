//! Task submission messages

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Task, TaskType};

/// Raw task as submitted by a client: `{type, description}`.
///
/// Decoding never fails on field shape: a missing or non-string `type`
/// becomes empty and resolves to `TaskType::Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSubmission {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub task_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeString {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match MaybeString::deserialize(deserializer)? {
        MaybeString::Text(text) => text,
        MaybeString::Other(_) => String::new(),
    })
}

impl TaskSubmission {
    pub fn new(task_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            description: description.into(),
        }
    }

    /// Stamp the submission and resolve its type. Unrecognized types become `TaskType::Unknown`.
    pub fn into_task(self) -> Task {
        Task::new(TaskType::parse(&self.task_type), self.description)
    }
}
