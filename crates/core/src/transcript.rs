//! The conversation store.

use gaslight_model::{GenerationParams, ModelMessage, ModelRequest};
use serde::Serialize;

/// The ordered record of a conversation.
///
/// Messages are kept in the order they were added and are never reordered,
/// deduplicated, or removed. Only the session that owns the transcript can
/// append to it; everyone else gets a shared reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ModelMessage>,
}

impl Transcript {
    /// Adds a message to the end.
    #[inline]
    pub(crate) fn append(&mut self, message: ModelMessage) {
        trace!("appending {} message", message.role);
        self.messages.push(message);
    }

    /// Returns all messages, oldest first.
    #[inline]
    pub fn snapshot(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Serializes the transcript as a pretty-printed JSON array of
    /// `{"role", "content"}` objects.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Builds a request carrying the whole transcript.
    pub fn to_request(
        &self,
        model: &str,
        params: GenerationParams,
    ) -> ModelRequest {
        ModelRequest {
            model: model.to_owned(),
            messages: self.messages.clone(),
            params,
        }
    }
}
