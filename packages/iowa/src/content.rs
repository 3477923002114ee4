//! The payload type passed to and returned from file operations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// File content, either structured JSON or plain text.
///
/// With JSON mode on, `Json` payloads are serialized on write, while `Text`
/// payloads are written verbatim and parsed on read.
///
/// Converting from a `serde_json::Value` yields `Text` for a JSON string and
/// `Json` for anything else; construct `Content::Json` directly to force a
/// string to be written as a quoted JSON literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum Content {
    Json(JsonValue),
    Text(String),
}

impl Content {
    /// Serialize any value into `Content::Json`.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Content::Json)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Content::Json(value) => Some(value),
            Content::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Content::Text(_))
    }

    /// Convert into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> JsonValue {
        match self {
            Content::Json(value) => value,
            Content::Text(text) => JsonValue::String(text),
        }
    }

    /// Deserialize the content into a typed record.
    pub fn deserialize<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_value(self.into_value())
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl From<JsonValue> for Content {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::String(text) => Content::Text(text),
            other => Content::Json(other),
        }
    }
}

impl From<Content> for JsonValue {
    fn from(content: Content) -> Self {
        content.into_value()
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_strings_become_text() {
        assert_eq!(Content::from(json!("hi")), Content::Text("hi".to_string()));
        assert_eq!(Content::from(json!({"a": 1})), Content::Json(json!({"a": 1})));
        assert_eq!(Content::from(json!(null)), Content::Json(JsonValue::Null));
    }

    #[test]
    fn deserializes_from_configuration_documents() {
        let content: Content = serde_json::from_str(r#""seed text""#).unwrap();
        assert_eq!(content, Content::Text("seed text".to_string()));

        let content: Content = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert_eq!(content, Content::Json(json!({"items": []})));
    }

    #[test]
    fn typed_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Point {
            x: i64,
            y: i64,
        }

        let content = Content::Json(json!({"x": 1, "y": 2}));
        let point: Point = content.deserialize().unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn json_constructor_keeps_strings_structured() {
        let content = Content::json("quoted").unwrap();
        assert_eq!(content, Content::Json(json!("quoted")));
    }
}
