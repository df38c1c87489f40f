//! Homework statuses and the messages sent for them.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{HomeworkError, Result};

/// Review status of a homework submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Reads a status from its JSON value.
    ///
    /// Anything outside the verdict table becomes `UnknownStatus` carrying
    /// the raw string, or the JSON rendering for non-strings.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|_| {
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            HomeworkError::UnknownStatus(raw)
        })
    }

    /// Fixed verdict text for the status.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Builds the chat message for one homework record.
///
/// The record must carry a string `homework_name` and a `status` from the
/// verdict table.
pub fn parse_status(homework: &Value) -> Result<String> {
    let name = homework
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(HomeworkError::MissingHomeworkName)?;

    let status = HomeworkStatus::from_value(homework.get("status").unwrap_or(&Value::Null))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
