//! Mapping document: a pretty-printed JSON object of relative path → content
//!
//! Keys keep walk order. Non-ASCII text is written verbatim; control
//! characters are JSON-escaped, never dropped.

use serde_json::{Map, Value};

use crate::core::error::{Result, SnapError};
use crate::core::model::Document;
use crate::formats::{DocumentEncoder, DocumentFormat};

#[derive(Debug, Default)]
pub struct MappingEncoder {
    map: Map<String, Value>,
}

impl MappingEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentEncoder for MappingEncoder {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Mapping
    }

    fn add_file(&mut self, path: &str, content: &str) {
        self.map
            .insert(path.to_string(), Value::String(content.to_string()));
    }

    fn file_count(&self) -> usize {
        self.map.len()
    }

    fn finish(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.map)?)
    }
}

/// Parse a mapping document into path → content records
pub fn parse_mapping(text: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(text)?;
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(SnapError::InvalidDocument(format!(
                "expected a JSON object at top level, found {}",
                json_type_name(&other)
            )))
        }
    };

    let mut document = Document::new();
    for (path, content) in object {
        match content {
            Value::String(content) => document.insert(path, content),
            other => {
                return Err(SnapError::InvalidDocument(format!(
                    "value for {:?} must be a string, found {}",
                    path,
                    json_type_name(&other)
                )))
            }
        }
    }
    Ok(document)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::BINARY_SENTINEL;

    #[test]
    fn test_encode_keeps_insertion_order_and_unicode() {
        let mut encoder = MappingEncoder::new();
        encoder.add_file("z.txt", "last");
        encoder.add_file("a.txt", "héllo 你好");

        let text = encoder.finish().unwrap();
        assert!(text.find("z.txt").unwrap() < text.find("a.txt").unwrap());
        assert!(text.contains("héllo 你好"));
        assert!(text.contains("\n  \"a.txt\""));
        assert_eq!(encoder.file_count(), 2);
    }

    #[test]
    fn test_encode_escapes_control_characters() {
        let mut encoder = MappingEncoder::new();
        encoder.add_file("ctl.txt", "a\u{1}b\tc");
        let text = encoder.finish().unwrap();
        assert!(text.contains(r#""a\u0001b\tc""#));
    }

    #[test]
    fn test_parse_mapping() {
        let doc = parse_mapping(&format!(
            r#"{{"b/c.txt": "nested", "a.txt": "héllo", "bin.dat": "{}"}}"#,
            BINARY_SENTINEL
        ))
        .unwrap();

        let paths: Vec<_> = doc.records().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b/c.txt", "a.txt", "bin.dat"]);
        assert_eq!(doc.get("a.txt"), Some("héllo"));
    }

    #[test]
    fn test_parse_mapping_round_trip() {
        let mut encoder = MappingEncoder::new();
        encoder.add_file("a.txt", "line1\r\nline2\u{7}");
        let doc = parse_mapping(&encoder.finish().unwrap()).unwrap();
        assert_eq!(doc.get("a.txt"), Some("line1\r\nline2\u{7}"));
    }

    #[test]
    fn test_parse_mapping_rejects_non_object() {
        let err = parse_mapping(r#"["a.txt"]"#).unwrap_err();
        assert!(matches!(err, SnapError::InvalidDocument(_)));
    }

    #[test]
    fn test_parse_mapping_rejects_non_string_value() {
        let err = parse_mapping(r#"{"a.txt": 3}"#).unwrap_err();
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn test_parse_mapping_rejects_malformed_json() {
        let err = parse_mapping("{not json").unwrap_err();
        assert!(matches!(err, SnapError::Mapping(_)));
    }

    #[test]
    fn test_parse_empty_object() {
        let doc = parse_mapping("{}").unwrap();
        assert!(doc.is_empty());
    }
}
