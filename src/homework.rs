//! Homework records, the verdict table, the answer validator and the status
//! formatter.
//!
//! The review API answers with
//! `{"homeworks": [{"homework_name": "...", "status": "...", ...}], "current_date": 1}`.
//! Records are kept raw (`Option` fields) so that a missing name or status is
//! reported by [`check_response`] / [`parse_status`] instead of failing deep
//! inside deserialization.

use crate::error::BotError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Review status of a homework as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    /// Reviewer accepted the work
    Approved,
    /// Work is being reviewed
    Reviewing,
    /// Reviewer found problems
    Rejected,
}

/// Fixed status-to-verdict table.
pub const HOMEWORK_VERDICTS: &[(HomeworkStatus, &str)] = &[
    (
        HomeworkStatus::Approved,
        "Работа проверена: ревьюеру всё понравилось. Ура!",
    ),
    (
        HomeworkStatus::Reviewing,
        "Работа взята на проверку ревьюером.",
    ),
    (
        HomeworkStatus::Rejected,
        "Работа проверена, в ней нашлись ошибки.",
    ),
];

impl HomeworkStatus {
    /// Raw value used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Localized verdict text.
    #[must_use]
    pub fn verdict(self) -> &'static str {
        HOMEWORK_VERDICTS
            .iter()
            .find(|(status, _)| *status == self)
            .map_or("", |(_, verdict)| *verdict)
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(BotError::Validation(format!("Нет такого статуса: {other}"))),
        }
    }
}

/// One homework record. Other server fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Homework {
    /// Name of the submission
    #[serde(default)]
    pub homework_name: Option<String>,
    /// Raw status value
    #[serde(default)]
    pub status: Option<String>,
}

impl Homework {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            homework_name: Some(name.into()),
            status: Some(status.into()),
        }
    }
}

/// Server timestamp of the answer, if present.
#[must_use]
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

/// Validate the API answer and return every homework it contains.
///
/// Rejects the whole answer on the first record with an unknown or missing
/// status; later records are not examined. An empty list is valid.
///
/// # Errors
///
/// Returns `BotError::Validation` if `homeworks` is missing, is not a list,
/// or holds a malformed record or an unknown status.
pub fn check_response(response: &Value) -> Result<Vec<Homework>, BotError> {
    let homeworks = response
        .get("homeworks")
        .ok_or_else(|| BotError::Validation("Нет такой домашней работы".to_string()))?;
    let items = homeworks
        .as_array()
        .ok_or_else(|| BotError::Validation("поле homeworks не является списком".to_string()))?;

    let mut validated = Vec::with_capacity(items.len());
    for item in items {
        let homework = Homework::deserialize(item)
            .map_err(|e| BotError::Validation(format!("некорректная запись: {e}")))?;
        let Some(status) = homework.status.as_deref() else {
            return Err(BotError::Validation(
                "Нет такого статуса: поле status отсутствует".to_string(),
            ));
        };
        status.parse::<HomeworkStatus>()?;
        validated.push(homework);
    }
    Ok(validated)
}

/// Build the notification text for one homework.
///
/// Pure: the same record always gives the same text.
///
/// # Errors
///
/// Returns `BotError::Formatting` if the status has no verdict or the name
/// is missing.
pub fn parse_status(homework: &Homework) -> Result<String, BotError> {
    let raw_status = homework.status.as_deref().unwrap_or_default();
    let verdict = raw_status
        .parse::<HomeworkStatus>()
        .map(HomeworkStatus::verdict)
        .map_err(|_| {
            error!("Verdict doesn't exist for status {:?}", raw_status);
            BotError::Formatting(format!("Неизвестный вердикт: {raw_status}"))
        })?;

    let Some(homework_name) = homework.homework_name.as_deref() else {
        error!("Homework record without homework_name");
        return Err(BotError::Formatting(
            "Нет названия домашней работы".to_string(),
        ));
    };

    Ok(format!(
        "Изменился статус проверки работы \"{homework_name}\". {verdict}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    #[test]
    fn test_verdict_table_covers_every_status() {
        for status in [
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ] {
            assert!(!status.verdict().is_empty());
            assert_eq!(status.as_str().parse::<HomeworkStatus>(), Ok(status));
        }
        assert_eq!(HOMEWORK_VERDICTS.len(), 3);
    }

    #[test]
    fn test_parse_status_messages() {
        assert_snapshot!(
            parse_status(&Homework::new("hw1", "approved")).unwrap_or_default(),
            @r#"Изменился статус проверки работы "hw1". Работа проверена: ревьюеру всё понравилось. Ура!"#
        );
        assert_snapshot!(
            parse_status(&Homework::new("hw1", "reviewing")).unwrap_or_default(),
            @r#"Изменился статус проверки работы "hw1". Работа взята на проверку ревьюером."#
        );
        assert_snapshot!(
            parse_status(&Homework::new("hw1", "rejected")).unwrap_or_default(),
            @r#"Изменился статус проверки работы "hw1". Работа проверена, в ней нашлись ошибки."#
        );
    }

    #[test]
    fn test_parse_status_name_appears_once() {
        for (status, verdict) in HOMEWORK_VERDICTS {
            let text = parse_status(&Homework::new("sprint_7", status.as_str()))
                .unwrap_or_default();
            assert_eq!(text.matches("sprint_7").count(), 1);
            assert_eq!(text.matches(verdict).count(), 1);
        }
    }

    #[test]
    fn test_parse_status_missing_name_is_an_error() {
        let homework = Homework {
            homework_name: None,
            status: Some("approved".to_string()),
        };
        assert!(matches!(
            parse_status(&homework),
            Err(BotError::Formatting(_))
        ));
    }

    #[test]
    fn test_parse_status_unknown_status_is_an_error() {
        let result = parse_status(&Homework::new("hw", "bogus"));
        assert_eq!(
            result,
            Err(BotError::Formatting("Неизвестный вердикт: bogus".to_string()))
        );
        let missing = Homework {
            homework_name: Some("hw".to_string()),
            status: None,
        };
        assert!(matches!(parse_status(&missing), Err(BotError::Formatting(_))));
    }

    #[test]
    fn test_check_response_returns_full_list() {
        let response = json!({
            "homeworks": [
                {"homework_name": "hw1", "status": "approved", "id": 1, "reviewer_comment": "ok"},
                {"homework_name": "hw2", "status": "rejected"}
            ],
            "current_date": 1_700_000_000
        });
        let homeworks = check_response(&response).unwrap_or_default();
        assert_eq!(
            homeworks,
            vec![
                Homework::new("hw1", "approved"),
                Homework::new("hw2", "rejected")
            ]
        );
        assert_eq!(current_date(&response), Some(1_700_000_000));
    }

    #[test]
    fn test_check_response_empty_list_is_valid() {
        let homeworks = check_response(&json!({"homeworks": []}));
        assert_eq!(homeworks, Ok(Vec::new()));
        assert_eq!(current_date(&json!({"homeworks": []})), None);
    }

    #[test]
    fn test_check_response_missing_key() {
        let result = check_response(&json!({"current_date": 1}));
        assert_eq!(
            result,
            Err(BotError::Validation("Нет такой домашней работы".to_string()))
        );
        assert!(matches!(
            check_response(&json!([])),
            Err(BotError::Validation(_))
        ));
    }

    #[test]
    fn test_check_response_not_a_list() {
        let result = check_response(&json!({"homeworks": {"homework_name": "hw"}}));
        assert!(matches!(result, Err(BotError::Validation(_))));
    }

    #[test]
    fn test_check_response_stops_at_first_unknown_status() {
        let response = json!({
            "homeworks": [
                {"homework_name": "hw1", "status": "approved"},
                {"homework_name": "hw2", "status": "bogus"},
                {"homework_name": "hw3", "status": "also_bogus"}
            ]
        });
        assert_eq!(
            check_response(&response),
            Err(BotError::Validation("Нет такого статуса: bogus".to_string()))
        );
    }

    #[test]
    fn test_check_response_missing_status() {
        let response = json!({"homeworks": [{"homework_name": "hw1"}]});
        assert!(matches!(
            check_response(&response),
            Err(BotError::Validation(_))
        ));
    }

    #[test]
    fn test_check_response_malformed_record() {
        let response = json!({"homeworks": ["hw1"]});
        assert!(matches!(
            check_response(&response),
            Err(BotError::Validation(_))
        ));
        let response = json!({"homeworks": [{"homework_name": 5, "status": "approved"}]});
        assert!(matches!(
            check_response(&response),
            Err(BotError::Validation(_))
        ));
    }
}
