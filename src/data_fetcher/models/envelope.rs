use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paging metadata returned by list endpoints.
/// `total` is the number of pages the provider holds for the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

/// Common response wrapper used by every API-Football endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Either `[]` or an object such as `{"requests": "You have reached the request limit"}`
    #[serde(default)]
    pub errors: Value,
    #[serde(default)]
    pub results: u32,
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
}

impl<T> ApiEnvelope<T> {
    /// Flattens the provider's `errors` field into a single message.
    /// Returns `None` when the provider reported no problems.
    pub fn error_message(&self) -> Option<String> {
        let messages: Vec<String> = match &self.errors {
            Value::Array(items) => items.iter().map(value_to_message).collect(),
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| format!("{key}: {}", value_to_message(value)))
                .collect(),
            Value::Null => Vec::new(),
            other => vec![value_to_message(other)],
        };

        if messages.is_empty() {
            None
        } else {
            Some(messages.join("; "))
        }
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_without_errors() {
        let envelope: ApiEnvelope<Value> = serde_json::from_value(json!({
            "get": "fixtures",
            "errors": [],
            "results": 2,
            "paging": {"current": 1, "total": 3},
            "response": [{"a": 1}, {"a": 2}]
        }))
        .unwrap();

        assert_eq!(envelope.error_message(), None);
        assert_eq!(envelope.results, 2);
        assert_eq!(envelope.paging, Some(Paging { current: 1, total: 3 }));
        assert_eq!(envelope.response.len(), 2);
    }

    #[test]
    fn test_envelope_with_object_errors() {
        let envelope: ApiEnvelope<Value> = serde_json::from_value(json!({
            "errors": {"requests": "You have reached the request limit for the day"},
            "results": 0,
            "response": []
        }))
        .unwrap();

        assert_eq!(
            envelope.error_message().as_deref(),
            Some("requests: You have reached the request limit for the day")
        );
    }

    #[test]
    fn test_envelope_missing_fields_default() {
        let envelope: ApiEnvelope<Value> = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.response.is_empty());
        assert!(envelope.paging.is_none());
        assert_eq!(envelope.error_message(), None);
    }
}
