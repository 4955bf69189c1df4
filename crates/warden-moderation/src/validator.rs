//! Decision validation.
//!
//! Turns an extracted JSON candidate into a [`Decision`]. The candidate must
//! be a JSON object with a non-null `action`. Offender fields always come from
//! the reported message, never from the model.

use serde_json::{Map, Value};
use tracing::warn;
use warden_core::{ActionKind, Decision, ModerationError, ModerationResult, ReportedMessage};

/// Parse and normalize `candidate` into a [`Decision`] about `reported`.
pub fn validate(candidate: &str, reported: &ReportedMessage) -> ModerationResult<Decision> {
    let malformed = |reason: String| ModerationError::MalformedDecision {
        reason,
        candidate: candidate.to_string(),
        raw: None,
    };

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    let action = match object.get("action") {
        None | Some(Value::Null) => return Err(malformed("missing \"action\" field".into())),
        Some(Value::String(label)) => ActionKind::from_label(label),
        Some(other) => ActionKind::Other(other.to_string()),
    };
    if !action.is_recognized() {
        warn!(action = %action, "model returned an unrecognized action");
    }

    Ok(Decision::new(action, reason_of(&object), reported))
}

fn reason_of(object: &Map<String, Value>) -> Option<String> {
    match object.get("reason") {
        None | Some(Value::Null) => None,
        Some(Value::String(reason)) => Some(reason.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use warden_core::types::DEFAULT_REASON;

    fn reported() -> ReportedMessage {
        ReportedMessage {
            author_name: "troll".into(),
            author_id: "42".into(),
            content: "bad".into(),
        }
    }

    #[test]
    fn none_without_reason_gets_default() {
        let decision = validate(r#"{"action":"none"}"#, &reported()).unwrap();
        assert_eq!(decision.action, ActionKind::None);
        assert_eq!(decision.reason, DEFAULT_REASON);
    }

    #[test]
    fn recognized_actions() {
        let decision =
            validate(r#"{"action":"temp-ban","reason":"hate speech"}"#, &reported()).unwrap();
        assert_eq!(decision.action, ActionKind::TempBan);
        assert_eq!(decision.reason, "hate speech");

        let decision = validate(r#"{"action":"temp-mute","reason":"rude"}"#, &reported()).unwrap();
        assert_eq!(decision.action, ActionKind::TempMute);
    }

    #[test]
    fn unknown_action_kept_verbatim() {
        let decision = validate(r#"{"action":"kick","reason":"x"}"#, &reported()).unwrap();
        assert_eq!(decision.action, ActionKind::Other("kick".into()));
        assert_eq!(decision.reason, "x");
    }

    #[test]
    fn non_string_action_becomes_other() {
        let decision = validate(r#"{"action":3}"#, &reported()).unwrap();
        assert_eq!(decision.action, ActionKind::Other("3".into()));
    }

    #[test]
    fn offender_always_from_reported_message() {
        let decision = validate(
            r#"{"action":"none","offender_name":"someone else","offender_id":"1","offenderName":"x"}"#,
            &reported(),
        )
        .unwrap();
        assert_eq!(decision.offender_name, "troll");
        assert_eq!(decision.offender_id, "42");
    }

    #[test]
    fn null_reason_gets_default() {
        let decision = validate(r#"{"action":"none","reason":null}"#, &reported()).unwrap();
        assert_eq!(decision.reason, DEFAULT_REASON);
    }

    #[test]
    fn non_string_reason_rendered_as_json() {
        let decision = validate(r#"{"action":"none","reason":["a","b"]}"#, &reported()).unwrap();
        assert_eq!(decision.reason, r#"["a","b"]"#);
    }

    #[test]
    fn missing_action_is_malformed() {
        assert_matches!(
            validate(r#"{"reason":"x"}"#, &reported()),
            Err(ModerationError::MalformedDecision { reason, .. }) if reason.contains("action")
        );
        assert_matches!(
            validate(r#"{"action":null}"#, &reported()),
            Err(ModerationError::MalformedDecision { .. })
        );
    }

    #[test]
    fn non_object_is_malformed() {
        assert_matches!(
            validate("[1, 2]", &reported()),
            Err(ModerationError::MalformedDecision { reason, .. }) if reason.contains("an array")
        );
        assert_matches!(
            validate("\"none\"", &reported()),
            Err(ModerationError::MalformedDecision { .. })
        );
    }

    #[test]
    fn prose_is_malformed_and_keeps_candidate() {
        assert_matches!(
            validate("no violation found", &reported()),
            Err(ModerationError::MalformedDecision { candidate, raw: None, .. })
                if candidate == "no violation found"
        );
    }
}
