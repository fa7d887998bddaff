use std::pin::Pin;
use std::task::{Context, Poll, ready};

use gaslight_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::{Sse, SseError};
use crate::proto::ChatCompletionChunk;

struct PartialState {
    sse: Sse,
    id: Option<String>,
    // This field will be cleared after the response returns the complete event.
    pending_finish_reason: Option<ModelFinishReason>,
    finished: bool,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ModelResponseEvent>, PartialState), Error>;

pin_project! {
    pub struct OpenAIResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
    }
}

impl OpenAIResponse {
    #[inline]
    pub fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState {
            sse,
            id: None,
            pending_finish_reason: None,
            finished: false,
        };
        let next_event_fut = async move { next_event(partial_state).await };
        Self {
            next_event_fut: Some(Box::pin(next_event_fut)),
        }
    }
}

impl ModelResponse for OpenAIResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let (event, partial_state) =
            match ready!(next_event_fut.as_mut().poll(cx)) {
                Ok((Some(event), partial_state)) => (event, partial_state),
                Ok((None, _)) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // The stream may still have more data to pull, create a new future for
        // the next event.
        let next_event_fut = async move { next_event(partial_state).await };
        *this.next_event_fut = Some(Box::pin(next_event_fut));

        Poll::Ready(Ok(Some(event)))
    }
}

async fn next_event(
    mut partial_state: PartialState,
) -> Result<(Option<ModelResponseEvent>, PartialState), Error> {
    // Always emit message deltas first, and the finish reason only after the
    // stream has nothing more to say.
    while !partial_state.finished {
        let sse_event = match partial_state.sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(SseError::ChunksError(err)) => {
                let kind = if err.timed_out {
                    ErrorKind::Timeout
                } else {
                    ErrorKind::Connection
                };
                return Err(Error::new(err.message, kind));
            }
            Err(SseError::InvalidPayload) => {
                return Err(Error::new(
                    "invalid event stream payload",
                    ErrorKind::InvalidResponse,
                ));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            partial_state.finished = true;
            break;
        }

        let mut chunk =
            serde_json::from_str::<ChatCompletionChunk>(&sse_event).map_err(
                |err| Error::new(err.to_string(), ErrorKind::InvalidResponse),
            )?;
        if partial_state.id.get_or_insert_with(|| chunk.id.clone()) != &chunk.id
        {
            return Err(Error::new(
                "chunk id mismatch",
                ErrorKind::InvalidResponse,
            ));
        };

        // Chunks without choices carry usage only.
        let Some(choice) = chunk.choices.pop() else {
            continue;
        };

        if let Some(finish_reason) = choice.finish_reason {
            partial_state.pending_finish_reason =
                Some(parse_finish_reason(&finish_reason));
        }

        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                return Ok((
                    Some(ModelResponseEvent::MessageDelta(content)),
                    partial_state,
                ));
            }
        }
    }
    partial_state.finished = true;

    if let Some(finish_reason) = partial_state.pending_finish_reason.take() {
        return Ok((
            Some(ModelResponseEvent::Completed(finish_reason)),
            partial_state,
        ));
    }

    Ok((None, partial_state))
}

#[inline]
fn parse_finish_reason(reason: &str) -> ModelFinishReason {
    match reason {
        "stop" => ModelFinishReason::Stop,
        "length" => ModelFinishReason::Length,
        "content_filter" => ModelFinishReason::ContentFilter,
        _ => ModelFinishReason::Other,
    }
}
