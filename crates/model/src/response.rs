use std::pin::Pin;
use std::task::{self, Poll};

use serde::{Deserialize, Serialize};

use crate::provider::ModelProviderError;

/// A streamed reply from a completion service.
///
/// Text arrives as a series of deltas, followed by at most one
/// [`ModelResponseEvent::Completed`] event telling why generation stopped.
pub trait ModelResponse: Sized + Send + 'static {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// Polls for the next event of the reply.
    ///
    /// Returns `Poll::Pending` and arranges for `cx` to be woken while
    /// nothing new has arrived, `Ok(Some(_))` for every event, and `Ok(None)`
    /// once the reply is over. An `Err` ends the reply early; the text
    /// received so far must not be treated as complete.
    ///
    /// Polling again after `Ok(None)` keeps returning `Ok(None)`.
    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>>;
}

/// The reason why a model response has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The output was cut at the token limit.
    Length,
    /// The output was withheld by a content filter.
    ContentFilter,
    /// Any reason this crate doesn't know about.
    Other,
}

/// The event from a model response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelResponseEvent {
    /// The response has been completed.
    Completed(ModelFinishReason),
    /// Received a message delta.
    MessageDelta(String),
}
