//! Conversion between stored text and [`Content`], honoring the JSON flag.

use serde_json::Value as JsonValue;

use crate::Content;

/// Render `data` as the text to store.
///
/// In JSON mode structured content is serialized; text is always written as
/// is. With JSON mode off, a JSON string is written as its raw text and any
/// other value as compact JSON. Leading and trailing whitespace is trimmed.
pub fn stringify(data: &Content, json: bool) -> String {
    let text = match data {
        Content::Json(JsonValue::String(text)) if !json => text.clone(),
        Content::Json(value) => value.to_string(),
        Content::Text(text) => text.clone(),
    };

    text.trim().to_string()
}

/// Turn stored text back into [`Content`].
///
/// In JSON mode text is deserialized; otherwise it is returned trimmed.
/// Structured content passes through untouched.
pub fn parse(content: Content, json: bool) -> serde_json::Result<Content> {
    match content {
        Content::Text(text) if json => serde_json::from_str(&text).map(Content::Json),
        Content::Text(text) => Ok(Content::Text(text.trim().to_string())),
        structured @ Content::Json(_) => Ok(structured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify_serializes_structured_content_in_json_mode() {
        let data = Content::Json(json!({"x": 1}));
        assert_eq!(stringify(&data, true), r#"{"x":1}"#);
    }

    #[test]
    fn stringify_writes_text_verbatim_and_trimmed() {
        let data = Content::Text("  {\"x\": 1}\n".to_string());
        assert_eq!(stringify(&data, true), "{\"x\": 1}");
        assert_eq!(stringify(&data, false), "{\"x\": 1}");
    }

    #[test]
    fn stringify_without_json_mode() {
        assert_eq!(stringify(&Content::Json(json!(" padded ")), false), "padded");
        assert_eq!(stringify(&Content::Json(json!(" padded ")), true), "\" padded \"");
        assert_eq!(stringify(&Content::Json(json!([1, 2])), false), "[1,2]");
        assert_eq!(stringify(&Content::Json(json!(42)), false), "42");
    }

    #[test]
    fn parse_decodes_text_in_json_mode() {
        let parsed = parse(Content::Text(r#"{"x":1}"#.to_string()), true).unwrap();
        assert_eq!(parsed, Content::Json(json!({"x": 1})));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(parse(Content::Text("{not json".to_string()), true).is_err());
        assert!(parse(Content::Text(String::new()), true).is_err());
    }

    #[test]
    fn parse_leaves_text_alone_without_json_mode() {
        let parsed = parse(Content::Text(" {not json} ".to_string()), false).unwrap();
        assert_eq!(parsed, Content::Text("{not json}".to_string()));
    }

    #[test]
    fn parse_passes_structured_content_through() {
        let value = Content::Json(json!([1, 2, 3]));
        assert_eq!(parse(value.clone(), true).unwrap(), value);
        assert_eq!(parse(value.clone(), false).unwrap(), value);
    }
}
