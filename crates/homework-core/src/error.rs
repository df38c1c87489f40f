//! Error types for the homework bot.

use thiserror::Error;

/// Errors that can occur while checking homework statuses.
///
/// Display texts are Russian because some of them are forwarded to the
/// chat as-is.
#[derive(Debug, Error)]
pub enum HomeworkError {
    /// One or more required environment variables are absent.
    #[error("Критическая ошибка окружения. Отсутствуют переменные: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// The request never produced an HTTP response (connect error, timeout).
    #[error("Ошибка запроса к API: {0}")]
    Transport(String),

    /// The API answered with a non-200 status.
    #[error("Ошибка доступа к API. Статус ошибки: {0}")]
    ApiUnavailable(u16),

    /// The API answered 200 with a body that is not JSON.
    #[error("Ответ API не является корректным JSON: {0}")]
    MalformedJson(String),

    /// The payload is not a JSON object.
    #[error("Ответ от API не содержит словаря")]
    NotAMapping,

    /// `homeworks` is missing or not an array.
    #[error("Объект homeworks в ответе от API - не список.")]
    HomeworksNotAList,

    /// `current_date` is missing or not an integer.
    #[error("Объект current_date в ответе API - не целое число.")]
    CurrentDateNotInteger,

    /// A homework record has no `homework_name`.
    #[error("В словаре homeworks нет ключа homework_name.")]
    MissingHomeworkName,

    /// A homework record carries a status outside the verdict table.
    #[error("Непредусмотренный статус поля status в объекте homework: {0}")]
    UnknownStatus(String),

    /// The message could not be delivered to the chat.
    #[error("Не удалось отправить сообщение в Telegram: {0}")]
    Delivery(String),
}

/// Result type for homework operations.
pub type Result<T> = std::result::Result<T, HomeworkError>;

/// Stable identity of a [`HomeworkError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCredentials,
    Transport,
    ApiUnavailable,
    MalformedJson,
    NotAMapping,
    HomeworksNotAList,
    CurrentDateNotInteger,
    MissingHomeworkName,
    UnknownStatus,
    Delivery,
}

/// Value used to recognise a repeat of the previous error.
///
/// Two errors are the same when both their kind and rendered text match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorKey {
    pub kind: ErrorKind,
    pub message: String,
}

impl HomeworkError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HomeworkError::MissingCredentials(_) => ErrorKind::MissingCredentials,
            HomeworkError::Transport(_) => ErrorKind::Transport,
            HomeworkError::ApiUnavailable(_) => ErrorKind::ApiUnavailable,
            HomeworkError::MalformedJson(_) => ErrorKind::MalformedJson,
            HomeworkError::NotAMapping => ErrorKind::NotAMapping,
            HomeworkError::HomeworksNotAList => ErrorKind::HomeworksNotAList,
            HomeworkError::CurrentDateNotInteger => ErrorKind::CurrentDateNotInteger,
            HomeworkError::MissingHomeworkName => ErrorKind::MissingHomeworkName,
            HomeworkError::UnknownStatus(_) => ErrorKind::UnknownStatus,
            HomeworkError::Delivery(_) => ErrorKind::Delivery,
        }
    }

    /// Builds the deduplication key for this error.
    pub fn key(&self) -> ErrorKey {
        ErrorKey {
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    /// Whether the error should be forwarded to the chat.
    ///
    /// Upstream outages and delivery failures are only logged: the user can
    /// do nothing about them, and a failed delivery cannot be reported
    /// through the same channel.
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            HomeworkError::MalformedJson(_)
                | HomeworkError::NotAMapping
                | HomeworkError::HomeworksNotAList
                | HomeworkError::CurrentDateNotInteger
                | HomeworkError::MissingHomeworkName
                | HomeworkError::UnknownStatus(_)
        )
    }
}

impl From<reqwest::Error> for HomeworkError {
    fn from(e: reqwest::Error) -> Self {
        HomeworkError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for HomeworkError {
    fn from(e: serde_json::Error) -> Self {
        HomeworkError::MalformedJson(e.to_string())
    }
}
