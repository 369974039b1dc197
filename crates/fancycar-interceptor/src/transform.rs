//! Payload transformers bridging old-generation cars and the backend.
//!
//! Old-generation cars publish and consume flat text payloads; the backend
//! and new-generation cars speak structured JSON. One transformer is bound
//! to each topic classification at interceptor construction.

use serde::Deserialize;
use tracing::error;

/// Degree sign separating the numeric reading from its unit letter in
/// old-generation temperature payloads.
const DEGREE_SIGN: char = '°';

/// Temperature units understood by the structured telemetry format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeUnit {
    Celsius,
    Fahrenheit,
}

impl DegreeUnit {
    /// Wire name of the unit in the structured telemetry JSON.
    pub fn name(self) -> &'static str {
        match self {
            DegreeUnit::Celsius => "celsius",
            DegreeUnit::Fahrenheit => "fahrenheit",
        }
    }

    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "C" => Some(DegreeUnit::Celsius),
            "F" => Some(DegreeUnit::Fahrenheit),
            _ => None,
        }
    }
}

/// A payload rewrite strategy.
///
/// Returns the replacement payload text, or `None` when the payload is
/// malformed and delivery must be suppressed.
pub trait PayloadTransformer: Send + Sync {
    fn transform(&self, payload: &[u8]) -> Option<String>;
}

/// Converts an old-generation free-text temperature reading (`15.0°C`) into
/// the structured telemetry JSON consumed by the backend.
///
/// The numeric part is passed through as raw text, unvalidated. An unknown
/// unit letter degrades to an empty unit field rather than suppressing the
/// message.
pub struct DeviceTransformer;

impl PayloadTransformer for DeviceTransformer {
    fn transform(&self, payload: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(payload);

        // Trailing empty segments carry no unit letter, so `15.0°` is as
        // malformed as a payload without any degree sign.
        let mut parts: Vec<&str> = text.split(DEGREE_SIGN).collect();
        while parts.last() == Some(&"") {
            parts.pop();
        }
        if parts.len() < 2 {
            error!("Wrong message format. Degree sign is not present.");
            return None;
        }

        let temperature = parts[0];
        let unit = DegreeUnit::from_letter(parts[1])
            .map(DegreeUnit::name)
            .unwrap_or("");

        // Byte-exact output format, including the spacing.
        Some(format!(
            "{{ \"temperature\": \"{}\", \"unit\": \"{}\" }}",
            temperature, unit
        ))
    }
}

/// Structured command message published by the backend.
#[derive(Debug, Default, Deserialize)]
struct BackendResponse {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    subject: Option<String>,
}

/// Converts a structured backend command (`{"command": "open", "subject":
/// "door"}`) into the flat `<command> <subject>` text an old-generation car
/// understands. Missing or null fields default to an empty string but still
/// occupy their token position.
pub struct BackendTransformer;

impl PayloadTransformer for BackendTransformer {
    fn transform(&self, payload: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(payload);

        let response: BackendResponse = match serde_json::from_str(&text) {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to parse backend command payload: {}", e);
                return None;
            }
        };

        let command = response.command.unwrap_or_default();
        let subject = response.subject.unwrap_or_default();

        Some(format!("{} {}", command, subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_reading() {
        let out = DeviceTransformer.transform("15.0°C".as_bytes());
        assert_eq!(
            out.as_deref(),
            Some(r#"{ "temperature": "15.0", "unit": "celsius" }"#)
        );
    }

    #[test]
    fn test_fahrenheit_reading() {
        let out = DeviceTransformer.transform("-10.0°F".as_bytes());
        assert_eq!(
            out.as_deref(),
            Some(r#"{ "temperature": "-10.0", "unit": "fahrenheit" }"#)
        );
    }

    #[test]
    fn test_unknown_unit_degrades_to_empty_field() {
        let out = DeviceTransformer.transform("273.0°K".as_bytes());
        assert_eq!(
            out.as_deref(),
            Some(r#"{ "temperature": "273.0", "unit": "" }"#)
        );
    }

    #[test]
    fn test_missing_degree_sign_is_malformed() {
        assert_eq!(DeviceTransformer.transform(b"15.0"), None);
        assert_eq!(DeviceTransformer.transform(b""), None);
    }

    #[test]
    fn test_missing_unit_letter_is_malformed() {
        assert_eq!(DeviceTransformer.transform("15.0°".as_bytes()), None);
    }

    #[test]
    fn test_numeric_part_is_not_validated() {
        let out = DeviceTransformer.transform("not-a-number°C".as_bytes());
        assert_eq!(
            out.as_deref(),
            Some(r#"{ "temperature": "not-a-number", "unit": "celsius" }"#)
        );
    }

    #[test]
    fn test_device_transform_is_pure() {
        let payload = "15.0°C".as_bytes();
        assert_eq!(
            DeviceTransformer.transform(payload),
            DeviceTransformer.transform(payload)
        );
    }

    #[test]
    fn test_command_and_subject() {
        let out = BackendTransformer.transform(br#"{"command": "open", "subject": "door"}"#);
        assert_eq!(out.as_deref(), Some("open door"));
    }

    #[test]
    fn test_missing_subject_keeps_token_position() {
        let out = BackendTransformer.transform(br#"{"command": "explode"}"#);
        assert_eq!(out.as_deref(), Some("explode "));
    }

    #[test]
    fn test_empty_command_keeps_token_position() {
        let out = BackendTransformer.transform(br#"{"command": "", "subject": "anything"}"#);
        assert_eq!(out.as_deref(), Some(" anything"));
    }

    #[test]
    fn test_both_fields_absent() {
        let out = BackendTransformer.transform(b"{}");
        assert_eq!(out.as_deref(), Some(" "));
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let out = BackendTransformer.transform(br#"{"command": null, "subject": null}"#);
        assert_eq!(out.as_deref(), Some(" "));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert_eq!(BackendTransformer.transform(b"not json"), None);
        assert_eq!(BackendTransformer.transform(b"{\"command\": "), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let out = BackendTransformer
            .transform(br#"{"command": "open", "subject": "door", "priority": 3}"#);
        assert_eq!(out.as_deref(), Some("open door"));
    }
}
