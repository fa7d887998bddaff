use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::task::{self, Poll, ready};
use std::time::Duration;

use gaslight_model::{
    ErrorKind, GenerationParams, ModelFinishReason, ModelMessage,
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
    ModelResponseEvent, Role,
};
use tokio::time::{Sleep, sleep};

#[derive(Debug)]
struct EchoModelError(ErrorKind);

impl Display for EchoModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoModelError {}

impl ModelProviderError for EchoModelError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Streams "You said <last user message>" word by word.
#[derive(Debug)]
struct EchoModelResponse {
    words: VecDeque<String>,
    sleep: Option<Pin<Box<Sleep>>>,
    completed: bool,
}

impl EchoModelResponse {
    fn new(input: &str) -> Self {
        let words = format!("You said {input}")
            .split(' ')
            .map(ToString::to_string)
            .collect();
        Self {
            words,
            sleep: None,
            completed: false,
        }
    }
}

impl ModelResponse for EchoModelResponse {
    type Error = EchoModelError;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        if this.completed {
            return Poll::Ready(Ok(None));
        }

        let sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(sleep(Duration::from_millis(1))));
        ready!(sleep.as_mut().poll(cx));
        this.sleep = None;

        let Some(mut word) = this.words.pop_front() else {
            this.completed = true;
            return Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                ModelFinishReason::Stop,
            ))));
        };
        if !this.words.is_empty() {
            word.push(' ');
        }
        Poll::Ready(Ok(Some(ModelResponseEvent::MessageDelta(word))))
    }
}

struct EchoModelProvider;

impl ModelProvider for EchoModelProvider {
    type Error = EchoModelError;
    type Response = EchoModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let last_user = req
            .messages
            .iter()
            .rev()
            .find(|msg| msg.role == Role::User)
            .map(|msg| msg.content.as_str());
        let result = match last_user {
            Some(text) => Ok(EchoModelResponse::new(text)),
            None => Err(EchoModelError(ErrorKind::InvalidResponse)),
        };
        ready(result)
    }
}

fn request(messages: Vec<ModelMessage>) -> ModelRequest {
    ModelRequest {
        model: "echo".to_owned(),
        messages,
        params: GenerationParams::default(),
    }
}

mod tests {
    use std::future::poll_fn;

    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = EchoModelProvider;
        let req = request(vec![
            ModelMessage::system("Repeat after me."),
            ModelMessage::user("Good morning"),
        ]);
        let mut resp = provider.send_request(&req).await.unwrap();

        let mut resp_message = String::new();
        let mut finish_reason = None;
        loop {
            let resp_fut =
                poll_fn(|cx| Pin::new(&mut resp).poll_next_event(cx));
            match resp_fut.await {
                Ok(Some(ModelResponseEvent::MessageDelta(delta))) => {
                    resp_message.push_str(&delta);
                }
                Ok(Some(ModelResponseEvent::Completed(reason))) => {
                    finish_reason = Some(reason);
                }
                Ok(None) => break,
                Err(err) => unreachable!("unexpected error: {err:?}"),
            }
        }

        assert_eq!(resp_message, "You said Good morning");
        assert_eq!(finish_reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_error() {
        let provider = EchoModelProvider;
        let req = request(vec![ModelMessage::system("Nobody talks.")]);
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert!(!err.kind().is_transient());
    }
}
