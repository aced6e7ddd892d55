use homework_bot::homework::{check_response, parse_status, Homework, HOMEWORK_VERDICTS};
use homework_bot::BotError;
use proptest::prelude::*;
use serde_json::json;

fn known_status() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("approved"), Just("reviewing"), Just("rejected")]
}

proptest! {
    /// The same record always yields the same text.
    #[test]
    fn formatting_is_pure(name in "\\PC{1,40}", status in known_status()) {
        let homework = Homework::new(name, status);
        prop_assert_eq!(parse_status(&homework), parse_status(&homework));
    }

    /// Name and the matching verdict are both in the text.
    #[test]
    fn message_contains_name_and_verdict(name in "[a-zA-Z0-9_ ]{1,40}", status in known_status()) {
        let text = parse_status(&Homework::new(name.clone(), status))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let quoted = format!("\"{name}\"");
        prop_assert!(text.contains(&quoted));

        let verdicts: Vec<_> = HOMEWORK_VERDICTS
            .iter()
            .filter(|(s, _)| s.as_str() == status)
            .map(|(_, v)| *v)
            .collect();
        prop_assert_eq!(verdicts.len(), 1);
        prop_assert!(text.ends_with(verdicts[0]));
    }

    /// Anything outside the three known statuses never reaches the formatter.
    #[test]
    fn unknown_status_rejected_by_validator(status in "[a-z_]{1,20}") {
        prop_assume!(!["approved", "reviewing", "rejected"].contains(&status.as_str()));
        let answer = json!({"homeworks": [{"homework_name": "hw", "status": status}]});
        prop_assert!(matches!(check_response(&answer), Err(BotError::Validation(_))));
    }
}
