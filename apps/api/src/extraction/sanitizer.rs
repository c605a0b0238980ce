//! ResponseSanitizer — turns the model's free-form reply into a `StructuredRecord`.
//!
//! Models routinely ignore "JSON only" and wrap the object in a ```json fence.
//! The fence is stripped, the rest must parse as a JSON object, and anything
//! else degrades to the empty record. Nothing here returns an error.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::errors::{json_kind, ResponseFormatError};
use crate::models::record::StructuredRecord;

const JSON_FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// How strictly the model reply is handled before it is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SanitizePolicy {
    /// Strip fences and parse into a record, or fall back to `{}`.
    #[default]
    Strict,
    /// Store the reply verbatim.
    Passthrough,
}

impl FromStr for SanitizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SanitizePolicy::Strict),
            "passthrough" => Ok(SanitizePolicy::Passthrough),
            other => Err(format!(
                "unknown sanitize policy '{other}' (expected 'strict' or 'passthrough')"
            )),
        }
    }
}

impl fmt::Display for SanitizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizePolicy::Strict => f.write_str("strict"),
            SanitizePolicy::Passthrough => f.write_str("passthrough"),
        }
    }
}

/// What the write path hands to the ResultStore.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Record(StructuredRecord),
    Raw(String),
}

impl Payload {
    /// Text destined for the file artifact, or `None` when there is nothing
    /// worth writing (empty record, blank raw reply).
    pub fn file_contents(&self) -> Option<String> {
        match self {
            Payload::Record(record) if record.is_empty() => None,
            Payload::Record(record) => Some(record.to_canonical_json()),
            Payload::Raw(text) if text.trim().is_empty() => None,
            Payload::Raw(text) => Some(text.clone()),
        }
    }
}

/// Removes a leading ```json marker and a trailing ``` marker, trimming
/// whitespace before and after. A bare ``` opener is left in place.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(JSON_FENCE_OPEN) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(FENCE_CLOSE) {
        text = rest;
    }
    text.trim()
}

/// Fence-strips `raw` and parses it as a JSON object.
pub fn parse_record(raw: &str) -> Result<StructuredRecord, ResponseFormatError> {
    let cleaned = strip_fences(raw);
    debug!("Cleaned model response:\n{cleaned}");

    match serde_json::from_str::<serde_json::Value>(cleaned)? {
        serde_json::Value::Object(map) => Ok(map.into()),
        other => Err(ResponseFormatError::NotAnObject(json_kind(&other))),
    }
}

/// Strict sanitization. Always yields a well-formed record; a reply that
/// does not parse is logged and becomes `{}`.
pub fn sanitize(raw: &str) -> StructuredRecord {
    match parse_record(raw) {
        Ok(record) if record.is_empty() => {
            info!("Model reported no structured data (empty object)");
            record
        }
        Ok(record) => {
            debug!("Parsed structured record with {} top-level keys", record.len());
            record
        }
        Err(e) => {
            warn!("Model returned an invalid JSON response, using empty record: {e}");
            StructuredRecord::empty()
        }
    }
}

/// Applies `policy` to a raw model reply.
pub fn apply_policy(policy: SanitizePolicy, raw: &str) -> Payload {
    match policy {
        SanitizePolicy::Strict => Payload::Record(sanitize(raw)),
        SanitizePolicy::Passthrough => Payload::Raw(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> StructuredRecord {
        match value {
            serde_json::Value::Object(map) => map.into(),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_fenced_response_is_unwrapped() {
        let raw = "```json\n{\"name\": \"Jane Doe\"}\n```";
        assert_eq!(sanitize(raw), record(json!({"name": "Jane Doe"})));
    }

    #[test]
    fn test_fenced_and_unfenced_yield_same_record() {
        let body = r#"{"name": "Jane Doe", "skills": ["Rust", "SQL"], "years": 7}"#;
        let variants = [
            body.to_string(),
            format!("```json\n{body}\n```"),
            format!("   ```json{body}```   "),
            format!("\n\n```json\n\n{body}\n\n```\n"),
            format!("{body}\n```"),
        ];
        let expected = sanitize(body);
        assert!(!expected.is_empty());
        for v in &variants {
            assert_eq!(sanitize(v), expected, "variant: {v:?}");
        }
    }

    #[test]
    fn test_prose_reply_becomes_empty_record() {
        assert_eq!(sanitize("Sorry, I cannot process this."), StructuredRecord::empty());
    }

    #[test]
    fn test_invalid_inputs_never_panic_and_yield_empty() {
        let inputs = [
            "",
            "   ",
            "```json",
            "```",
            "```json\n```",
            "{\"unterminated\": ",
            "Here is the data: {\"name\": \"Jane\"}",
            "```\n{\"name\": \"Jane\"}\n```",
            "```JSON\n{\"name\": \"Jane\"}\n```",
        ];
        for input in inputs {
            assert_eq!(sanitize(input), StructuredRecord::empty(), "input: {input:?}");
        }
    }

    #[test]
    fn test_non_object_json_becomes_empty_record() {
        assert_eq!(sanitize("[1, 2, 3]"), StructuredRecord::empty());
        assert_eq!(sanitize("```json\n\"just a string\"\n```"), StructuredRecord::empty());
        assert!(matches!(
            parse_record("42"),
            Err(ResponseFormatError::NotAnObject("number"))
        ));
    }

    #[test]
    fn test_empty_object_is_distinguished_from_parse_failure() {
        assert!(parse_record("```json\n{}\n```").unwrap().is_empty());
        assert!(parse_record("not json").is_err());
        assert_eq!(sanitize("{}"), sanitize("not json"));
    }

    #[test]
    fn test_sanitize_is_idempotent_over_canonical_form() {
        let inputs = [
            "```json\n{\"name\": \"Jane Doe\", \"education\": [{\"school\": \"MIT\"}]}\n```",
            "{\"a\": {\"b\": null}}",
            "garbage",
            "{}",
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(&once.to_canonical_json());
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn test_numbers_keep_their_exact_digits() {
        let raw = "```json\n{\"phone\": 123456789012345678901234, \"gpa\": 3.90, \"n\": \"Zoë\"}\n```";
        let rec = sanitize(raw);
        assert_eq!(
            rec.to_canonical_json(),
            "{\n    \"phone\": 123456789012345678901234,\n    \"gpa\": 3.90,\n    \"n\": \"Zoë\"\n}"
        );
    }

    #[test]
    fn test_out_of_range_exponent_does_not_drop_record() {
        let rec = sanitize("{\"name\": \"Jane Doe\", \"f\": 1e400}");
        assert_eq!(rec.len(), 2);
        assert_eq!(
            rec.to_canonical_json(),
            "{\n    \"name\": \"Jane Doe\",\n    \"f\": 1e400\n}"
        );
    }

    #[test]
    fn test_strip_fences_is_idempotent() {
        let raw = "```json\n{\"k\": 1}\n```";
        let once = strip_fences(raw);
        assert_eq!(once, "{\"k\": 1}");
        assert_eq!(strip_fences(once), once);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("strict".parse::<SanitizePolicy>().unwrap(), SanitizePolicy::Strict);
        assert_eq!(
            " Passthrough ".parse::<SanitizePolicy>().unwrap(),
            SanitizePolicy::Passthrough
        );
        assert!("loose".parse::<SanitizePolicy>().is_err());
        assert_eq!(SanitizePolicy::Passthrough.to_string(), "passthrough");
    }

    #[test]
    fn test_passthrough_keeps_reply_verbatim() {
        let raw = "```json\n{\"name\": \"Jane\"}\n```";
        let payload = apply_policy(SanitizePolicy::Passthrough, raw);
        assert_eq!(payload.file_contents().as_deref(), Some(raw));
    }

    #[test]
    fn test_file_contents_skips_empty_payloads() {
        assert!(Payload::Record(StructuredRecord::empty()).file_contents().is_none());
        assert!(Payload::Raw(" \n\t".to_string()).file_contents().is_none());
        let payload = apply_policy(SanitizePolicy::Strict, "```json\n{\"name\": \"Jane Doe\"}\n```");
        assert_eq!(
            payload.file_contents().as_deref(),
            Some("{\n    \"name\": \"Jane Doe\"\n}")
        );
    }
}
