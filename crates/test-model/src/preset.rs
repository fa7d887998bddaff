use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
}

/// The preset response for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    #[serde(default)]
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failures: None,
        }
    }

    /// Creates a `PresetResponse` that delivers `text` in one delta.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self::with_events([PresetEvent::MessageDelta(text.into())])
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Returns whether the attempt with the given 1-based number fails.
    #[inline]
    pub(crate) fn fails_on_attempt(&self, attempt: u64) -> bool {
        match self.failures {
            None => false,
            Some(0) => true,
            Some(n) => attempt <= n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_events([
            PresetEvent::MessageDelta("I have left ".to_string()),
            PresetEvent::MessageDelta("a message for you.".to_string()),
        ])
        .with_failures(1);

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }

    #[test]
    fn test_failure_attempts() {
        let once = PresetResponse::with_text("ok").with_failures(1);
        assert!(once.fails_on_attempt(1));
        assert!(!once.fails_on_attempt(2));

        let always = PresetResponse::with_text("ok").with_failures(0);
        assert!(always.fails_on_attempt(100));

        assert!(!PresetResponse::with_text("ok").fails_on_attempt(1));
    }
}
