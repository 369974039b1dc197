//! The outbound publish unit handed to the interceptor by the hosting broker.

/// A single outbound publish under interception.
///
/// The topic is fixed for the lifetime of the message. The payload may be
/// replaced, and delivery may be prevented; prevention is terminal, a
/// message once marked not-to-be-delivered cannot be re-enabled.
#[derive(Debug, Clone)]
pub struct OutboundPublish {
    topic: String,
    payload: Vec<u8>,
    delivery_prevented: bool,
}

impl OutboundPublish {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            delivery_prevented: false,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the outbound payload.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }

    /// Mark the message as not-to-be-delivered. Terminal.
    pub fn prevent_delivery(&mut self) {
        self.delivery_prevented = true;
    }

    pub fn is_delivery_prevented(&self) -> bool {
        self.delivery_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_publish_is_deliverable() {
        let publish = OutboundPublish::new("fancy-cars/car-1/temperature", b"15.0".to_vec());
        assert!(!publish.is_delivery_prevented());
        assert_eq!(publish.payload(), b"15.0");
    }

    #[test]
    fn test_prevent_delivery_is_terminal() {
        let mut publish = OutboundPublish::new("t", Vec::new());
        publish.prevent_delivery();
        assert!(publish.is_delivery_prevented());
    }

    #[test]
    fn test_set_payload_replaces_bytes() {
        let mut publish = OutboundPublish::new("t", b"old".to_vec());
        publish.set_payload(b"new".to_vec());
        assert_eq!(publish.payload(), b"new");
    }
}
