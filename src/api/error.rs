//! Errors from the clinic API boundary, plus the parser that turns the
//! server's assorted `detail` payload shapes into one displayable message.

use serde_json::Value;

/// Shown when the server gives us nothing usable to display.
pub const GENERIC_SUBMIT_ERROR: &str = "We couldn't update this appointment. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach the clinic API at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP transport error: {0}")]
    Transport(String),
    /// Non-2xx response. `detail` is whatever the normalizer could extract
    /// from the body, `None` when the body carried no recognizable shape.
    #[error("Clinic API returned HTTP {status}")]
    Api { status: u16, detail: Option<String> },
    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message a banner or inline error area should display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api {
                detail: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_SUBMIT_ERROR.to_string(),
        }
    }
}

/// Extracts a human-readable message from a server error body.
///
/// Accepted shapes, in the order the server actually produces them:
/// `{"detail": "..."}`, `{"detail": [{"msg": "..."}, ...]}`, and
/// `{"detail": ["...", ...]}` (joined with spaces). Anything else yields
/// `None` and callers fall back to [`GENERIC_SUBMIT_ERROR`].
pub fn extract_detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let first = items.first()?;
            if first.is_string() {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(joined)
            } else {
                first
                    .get("msg")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_detail_passes_through() {
        let body = json!({"detail": "Appointment not found"});
        assert_eq!(
            extract_detail_message(&body).as_deref(),
            Some("Appointment not found")
        );
    }

    #[test]
    fn field_error_list_takes_first_msg() {
        let body = json!({"detail": [
            {"msg": "doctor_name is required", "loc": ["body", "doctor_name"]},
            {"msg": "something else"}
        ]});
        assert_eq!(
            extract_detail_message(&body).as_deref(),
            Some("doctor_name is required")
        );
    }

    #[test]
    fn bare_string_list_is_joined() {
        let body = json!({"detail": ["End time", "must follow start time."]});
        assert_eq!(
            extract_detail_message(&body).as_deref(),
            Some("End time must follow start time.")
        );
    }

    #[test]
    fn unrecognized_shapes_yield_none() {
        for body in [
            json!({}),
            json!({"detail": 42}),
            json!({"detail": []}),
            json!({"detail": [{"message": "wrong key"}]}),
            json!({"error": "different envelope"}),
            Value::Null,
        ] {
            assert!(extract_detail_message(&body).is_none(), "body: {body}");
        }
    }

    #[test]
    fn user_message_prefers_extracted_detail() {
        let err = ApiError::Api {
            status: 422,
            detail: Some("Appointment time overlaps with an existing appointment.".into()),
        };
        assert_eq!(
            err.user_message(),
            "Appointment time overlaps with an existing appointment."
        );
    }

    #[test]
    fn user_message_falls_back_to_generic() {
        for err in [
            ApiError::Api {
                status: 500,
                detail: None,
            },
            ApiError::Connection("http://localhost:8000".into()),
            ApiError::Timeout(30),
            ApiError::Decode("eof".into()),
        ] {
            assert_eq!(err.user_message(), GENERIC_SUBMIT_ERROR);
        }
    }
}
