use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON envelope returned by every `/items` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub success: bool,
    /// The item's value for reads, `null` otherwise.
    pub payload: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            payload: Value::Null,
        }
    }

    #[must_use]
    pub fn with_payload(message: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            message: message.into(),
            success: true,
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            payload: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let response = ApiResponse::with_payload("Value for key found", "hello");
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "message": "Value for key found",
                "success": true,
                "payload": "hello",
            })
        );
    }

    #[test]
    fn test_failure_has_null_payload() {
        let json = serde_json::to_string(&ApiResponse::failure("Item a not found"))
            .expect("serialize");
        assert_eq!(
            json,
            r#"{"message":"Item a not found","success":false,"payload":null}"#
        );
    }

    #[test]
    fn test_round_trip() {
        let response = ApiResponse::ok("Item a created");
        let json = serde_json::to_string(&response).expect("serialize");
        let parsed: ApiResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, response);
    }
}
