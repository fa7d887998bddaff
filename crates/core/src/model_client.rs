use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use gaslight_model::{
    ModelFinishReason, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse, ModelResponseEvent,
};
use tracing::Instrument;

type BoxedError = Box<dyn ModelProviderError>;
type BoxedResponse = Pin<Box<dyn ErasedResponse>>;
type ConnectResult = Result<BoxedResponse, BoxedError>;
type BoxedConnectFuture =
    Pin<Box<dyn Future<Output = ConnectResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(&ModelRequest) -> BoxedConnectFuture + Send + Sync>;

/// A [`ModelResponse`] with its concrete error type erased.
trait ErasedResponse: Send {
    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, BoxedError>>;
}

impl<R: ModelResponse> ErasedResponse for R {
    #[inline]
    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, BoxedError>> {
        ModelResponse::poll_next_event(self, cx)
            .map_err(|err| Box::new(err) as BoxedError)
    }
}

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `Session` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn =
            Arc::new(move |req: &ModelRequest| -> BoxedConnectFuture {
                let fut = provider.send_request(req);
                Box::pin(async move {
                    match fut.await {
                        Ok(resp) => Ok(Box::pin(resp) as BoxedResponse),
                        Err(err) => Err(Box::new(err) as BoxedError),
                    }
                })
            });
        Self { handler_fn }
    }

    /// Sends a request and drains the response, calling `on_delta` with
    /// every piece of text as it arrives.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The response stops streaming further
    /// events when this operation is cancelled.
    pub async fn send_request(
        &self,
        req: &ModelRequest,
        mut on_delta: impl FnMut(&str),
    ) -> Result<ModelClientResponse, BoxedError> {
        async {
            trace!("got a request: {:?}", req);
            let mut resp = match (self.handler_fn)(req).await {
                Ok(resp) => resp,
                Err(err) => {
                    error!("got an error: {err:?}");
                    return Err(err);
                }
            };

            let mut text = String::new();
            let mut finish_reason = None;

            trace!("start receiving events");

            loop {
                let event_or_err =
                    poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await;
                let event = match event_or_err {
                    Ok(Some(event)) => event,
                    Ok(None) => break,
                    Err(err) => {
                        error!("got an error: {err:?}");
                        return Err(err);
                    }
                };
                trace!("got an event: {event:?}");

                match event {
                    ModelResponseEvent::MessageDelta(delta) => {
                        on_delta(&delta);
                        text.push_str(&delta);
                    }
                    ModelResponseEvent::Completed(reason) => {
                        finish_reason = Some(reason);
                    }
                }
            }

            debug!("finished a request: {finish_reason:?}");

            Ok(ModelClientResponse {
                text,
                finish_reason,
            })
        }
        .instrument(trace_span!("model client req"))
        .await
    }
}

/// A completely received response from the model client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelClientResponse {
    /// The whole generated text.
    pub text: String,
    /// The reason the model finished generating, if it said so.
    pub finish_reason: Option<ModelFinishReason>,
}
