//! Validation of the raw API payload.

use serde_json::Value;

use crate::error::{HomeworkError, Result};

/// A validated API answer.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPage {
    /// Homework records, most recent first. May be empty.
    pub homeworks: Vec<Value>,
    /// Server time to use as the next `from_date`.
    pub current_date: i64,
}

impl StatusPage {
    /// The most recent homework record, if any.
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}

/// Checks the payload shape.
///
/// Checks run in order: the value is an object, `homeworks` is an array,
/// `current_date` is an integer.
pub fn check_response(response: Value) -> Result<StatusPage> {
    let Value::Object(mut map) = response else {
        return Err(HomeworkError::NotAMapping);
    };

    let homeworks = match map.remove("homeworks") {
        Some(Value::Array(items)) => items,
        _ => return Err(HomeworkError::HomeworksNotAList),
    };

    let current_date = map
        .get("current_date")
        .and_then(Value::as_i64)
        .ok_or(HomeworkError::CurrentDateNotInteger)?;

    Ok(StatusPage {
        homeworks,
        current_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn kind_of(value: Value) -> ErrorKind {
        check_response(value).unwrap_err().kind()
    }

    #[test]
    fn test_valid_response() {
        let page = check_response(json!({
            "homeworks": [{"homework_name": "diploma", "status": "approved"}],
            "current_date": 1700000000
        }))
        .unwrap();

        assert_eq!(page.current_date, 1_700_000_000);
        assert_eq!(page.homeworks.len(), 1);
        assert_eq!(page.latest().unwrap()["homework_name"], "diploma");
    }

    #[test]
    fn test_empty_homeworks() {
        let page = check_response(json!({"homeworks": [], "current_date": 1700000100})).unwrap();
        assert!(page.homeworks.is_empty());
        assert!(page.latest().is_none());
    }

    #[test]
    fn test_not_a_mapping() {
        assert_eq!(kind_of(json!([1, 2])), ErrorKind::NotAMapping);
        assert_eq!(kind_of(json!("homeworks")), ErrorKind::NotAMapping);
        assert_eq!(kind_of(Value::Null), ErrorKind::NotAMapping);
    }

    #[test]
    fn test_homeworks_not_a_list() {
        assert_eq!(
            kind_of(json!({"homeworks": "none", "current_date": 1})),
            ErrorKind::HomeworksNotAList
        );
        assert_eq!(
            kind_of(json!({"homeworks": 5, "current_date": 1})),
            ErrorKind::HomeworksNotAList
        );
        assert_eq!(kind_of(json!({"current_date": 1})), ErrorKind::HomeworksNotAList);
    }

    #[test]
    fn test_current_date_not_integer() {
        assert_eq!(
            kind_of(json!({"homeworks": [], "current_date": "1700000000"})),
            ErrorKind::CurrentDateNotInteger
        );
        assert_eq!(
            kind_of(json!({"homeworks": [], "current_date": 1.5})),
            ErrorKind::CurrentDateNotInteger
        );
        assert_eq!(kind_of(json!({"homeworks": []})), ErrorKind::CurrentDateNotInteger);
    }

    #[test]
    fn test_homeworks_checked_before_current_date() {
        assert_eq!(
            kind_of(json!({"homeworks": {}, "current_date": "x"})),
            ErrorKind::HomeworksNotAList
        );
    }
}
