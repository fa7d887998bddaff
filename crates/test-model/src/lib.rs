//! A local fake model for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use gaslight_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: Vec<PresetEvent>,
    event_idx: usize,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        if this.event_idx > this.events.len() {
            // In case this method is called after completion.
            return Poll::Ready(Ok(None));
        }

        let delay = this.delay;
        let sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(sleep(delay)));
        ready!(sleep.as_mut().poll(cx));
        this.sleep = None;

        let event = match this.events.get(this.event_idx) {
            Some(PresetEvent::MessageDelta(msg)) => {
                ModelResponseEvent::MessageDelta(msg.clone())
            }
            None => ModelResponseEvent::Completed(ModelFinishReason::Stop),
        };
        this.event_idx += 1;
        Poll::Ready(Ok(Some(event)))
    }
}

#[derive(Clone)]
enum ConversationStep {
    Human,
    AssistantResponse(PresetResponse),
}

#[derive(Default)]
struct Record {
    requests: Vec<ModelRequest>,
    attempts: HashMap<usize, u64>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. Each step stands for one
/// message of the conversation, and a request is answered by the step at the
/// index equal to its number of messages. Messages typed by a human (system
/// and user prompts, or hand-written assistant replies) take a `Human` step.
/// If the selected step is missing or is not an assistant response, an error
/// is returned.
///
/// Every request is recorded, failed ones included, and clones of the
/// provider share the same record.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    conversation_script: Vec<ConversationStep>,
    delay: Option<Duration>,
    record: Arc<Mutex<Record>>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_assistant_response_step(&mut self, preset: PresetResponse) {
        self.conversation_script
            .push(ConversationStep::AssistantResponse(preset));
    }

    #[inline]
    pub fn add_human_step(&mut self) {
        self.conversation_script.push(ConversationStep::Human);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock_record().requests.clone()
    }

    /// Returns how many requests have been received.
    pub fn call_count(&self) -> usize {
        self.lock_record().requests.len()
    }

    fn lock_record(&self) -> std::sync::MutexGuard<'_, Record> {
        // A panicking test may poison the lock, the record is still usable.
        self.record.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn respond(&self, req: &ModelRequest) -> Result<TestModelResponse, Error> {
        let step_idx = req.messages.len();
        let attempt = {
            let mut record = self.lock_record();
            record.requests.push(req.clone());
            let attempt = record.attempts.entry(step_idx).or_default();
            *attempt += 1;
            *attempt
        };

        let preset = match self.conversation_script.get(step_idx) {
            Some(ConversationStep::AssistantResponse(preset)) => preset,
            Some(ConversationStep::Human) => {
                return Err(Error {
                    message: "not an assistant response step",
                    kind: ErrorKind::InvalidResponse,
                });
            }
            None => {
                return Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::RateLimitExceeded,
                });
            }
        };
        if preset.fails_on_attempt(attempt) {
            return Err(Error {
                message: "preset failure",
                kind: ErrorKind::Server,
            });
        }

        Ok(TestModelResponse {
            events: preset.events.clone(),
            event_idx: 0,
            delay: self.delay.unwrap_or(Duration::from_millis(1)),
            sleep: None,
        })
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        ready(self.respond(req))
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use gaslight_model::{GenerationParams, ModelMessage};

    use super::*;

    async fn collect_response(resp: TestModelResponse) -> String {
        let mut resp = pin!(resp);
        let mut msg = String::new();
        loop {
            let event = poll_fn(|cx| resp.as_mut().poll_next_event(cx))
                .await
                .unwrap()
                .unwrap();
            match event {
                ModelResponseEvent::Completed(_) => break,
                ModelResponseEvent::MessageDelta(delta) => {
                    msg.push_str(&delta);
                }
            }
        }
        msg
    }

    fn request(messages: Vec<ModelMessage>) -> ModelRequest {
        ModelRequest {
            model: "test".to_owned(),
            messages,
            params: GenerationParams::default(),
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_human_step();
        provider.add_human_step();
        provider.add_assistant_response_step(PresetResponse::with_events([
            PresetEvent::MessageDelta("Hello, ".to_owned()),
            PresetEvent::MessageDelta("world!".to_owned()),
        ]));
        provider.add_human_step();
        provider.add_assistant_response_step(PresetResponse::with_events([
            PresetEvent::MessageDelta("Sure, ".to_owned()),
            PresetEvent::MessageDelta("let me take a ".to_owned()),
            PresetEvent::MessageDelta("look.".to_owned()),
        ]));

        let mut req = request(vec![
            ModelMessage::system("Be nice."),
            ModelMessage::user("Hi"),
        ]);
        let resp = provider.send_request(&req).await.unwrap();
        let msg = collect_response(resp).await;
        assert_eq!(msg, "Hello, world!");

        req.messages.push(ModelMessage::assistant(msg));
        req.messages.push(ModelMessage::user("Check my todo"));
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(collect_response(resp).await, "Sure, let me take a look.");

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1], req);
    }

    #[tokio::test]
    async fn test_script_errors() {
        let mut provider = TestModelProvider::default();
        provider.add_human_step();

        let req = request(vec![]);
        let err = provider.send_request(&req).await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);

        let req = request(vec![ModelMessage::system("Be nice.")]);
        let err = provider.send_request(&req).await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);

        // Failed requests are recorded as well.
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failures_then_success() {
        let mut provider = TestModelProvider::default();
        provider.add_human_step();
        provider.add_assistant_response_step(
            PresetResponse::with_text("Finally.").with_failures(2),
        );

        let req = request(vec![ModelMessage::user("Hi")]);
        for _ in 0..2 {
            let err = provider.send_request(&req).await.err().unwrap();
            assert_eq!(err.kind(), ErrorKind::Server);
        }
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(collect_response(resp).await, "Finally.");

        // Clones share the record.
        assert_eq!(provider.clone().call_count(), 3);
    }
}
