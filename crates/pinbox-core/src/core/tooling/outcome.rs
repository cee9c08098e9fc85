use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    /// Message printed verbatim, without a status prefix.
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.details
            .get("passthrough")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.details.get("hint").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::UserError => "user-error",
            Self::Failure => "error",
        }
    }
}

/// Process exit status for an outcome. An explicit `exit_code` in the details
/// (set when a tool ran) wins over the status mapping.
#[must_use]
pub fn exit_code_for(outcome: &ExecutionOutcome) -> i32 {
    let explicit = outcome
        .details
        .get("exit_code")
        .and_then(Value::as_i64)
        .and_then(|code| i32::try_from(code).ok());
    explicit.unwrap_or(match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 1,
        CommandStatus::Failure => 2,
    })
}

#[must_use]
pub fn to_json_response(command: &str, outcome: &ExecutionOutcome) -> Value {
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": outcome.status.as_str(),
        "message": format_status_message(command, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(command: &str, message: &str) -> String {
    let prefix = format!("pinbox {command}");
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_exit_code_wins() {
        let outcome = ExecutionOutcome::failure("go failed", json!({ "exit_code": 7 }));
        assert_eq!(exit_code_for(&outcome), 7);
        let outcome = ExecutionOutcome::user_error("bad manifest", json!({}));
        assert_eq!(exit_code_for(&outcome), 1);
        let outcome = ExecutionOutcome::failure("boom", Value::Null);
        assert_eq!(exit_code_for(&outcome), 2);
        let outcome = ExecutionOutcome::success("", json!({ "passthrough": true }));
        assert_eq!(exit_code_for(&outcome), 0);
        assert!(outcome.is_passthrough());
    }

    #[test]
    fn json_envelope_prefixes_message() {
        let outcome = ExecutionOutcome::user_error(
            "Godeps not found",
            json!({ "hint": "run from the project root" }),
        );
        let payload = to_json_response("go", &outcome);
        assert_eq!(payload["status"], "user-error");
        assert_eq!(payload["message"], "pinbox go: Godeps not found");
        assert_eq!(payload["details"]["hint"], "run from the project root");

        let wrapped = to_json_response("path", &ExecutionOutcome::success("", json!("x")));
        assert_eq!(wrapped["message"], "pinbox path");
        assert_eq!(wrapped["details"]["value"], "x");
    }
}
