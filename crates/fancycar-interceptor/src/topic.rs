//! Topic classification for outbound publishes.
//!
//! Fancy-car topics have the shape `fancy-cars/<client-id>/<kind>` where
//! `<kind>` is `temperature` for readings published by a car and `command`
//! for instructions published by the backend. Anything else is out of scope
//! for the interceptor and passes through the broker untouched.

const TOPIC_ROOT: &str = "fancy-cars/";
const TEMPERATURE_SUFFIX: &str = "/temperature";
const COMMAND_SUFFIX: &str = "/command";

/// Classification of an outbound topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicClass {
    /// Topic does not belong to the fancy-cars namespace.
    NoMatch,
    /// `fancy-cars/<client-id>/temperature`
    Temperature { client_id: String },
    /// `fancy-cars/<client-id>/command`
    Command { client_id: String },
}

/// Classify a topic string. Pure and infallible: an unmatched or malformed
/// topic is [`TopicClass::NoMatch`], never an error.
pub fn classify(topic: &str) -> TopicClass {
    if let Some(client_id) = client_segment(topic, TEMPERATURE_SUFFIX) {
        return TopicClass::Temperature {
            client_id: client_id.to_string(),
        };
    }
    if let Some(client_id) = client_segment(topic, COMMAND_SUFFIX) {
        return TopicClass::Command {
            client_id: client_id.to_string(),
        };
    }
    TopicClass::NoMatch
}

/// Extract the client-id segment if the whole topic matches
/// `fancy-cars/<client-id><suffix>`. A blank segment is treated as a
/// non-match: `fancy-cars//temperature` carries no usable client id.
fn client_segment<'a>(topic: &'a str, suffix: &str) -> Option<&'a str> {
    let rest = topic.strip_prefix(TOPIC_ROOT)?;
    let client_id = rest.strip_suffix(suffix)?;
    if client_id.trim().is_empty() || client_id.contains('/') {
        return None;
    }
    Some(client_id)
}
