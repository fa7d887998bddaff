mod builder;

use std::convert::Infallible;
use std::future::poll_fn;
use std::pin::pin;
use std::task::Poll;

use gaslight_model::{
    GenerationParams, ModelFinishReason, ModelMessage, ModelProviderError,
};

use crate::console::{Console, ReadError};
use crate::model_client::ModelClient;
use crate::transcript::Transcript;
pub use builder::SessionBuilder;

const SYSTEM_PROMPT: &str = "System prompt: ";
const USER_PROMPT: &str = "User: ";
const ASSISTANT_PROMPT: &str = "Assistant (blank to poll API): ";

/// How a session came to an end.
///
/// A session never finishes on its own, so these are the only ways out.
#[derive(Debug)]
pub enum SessionEnd {
    /// The human asked to stop.
    Interrupted,
    /// The input ran out while a prompt was waiting.
    InputExhausted,
    /// The completion service failed.
    ServiceFailed(Box<dyn ModelProviderError>),
}

impl SessionEnd {
    /// Returns the process exit status for this outcome.
    #[inline]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 0,
            Self::ServiceFailed(_) => 1,
            Self::InputExhausted => 2,
        }
    }
}

impl From<ReadError> for SessionEnd {
    #[inline]
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Exhausted => Self::InputExhausted,
            ReadError::Interrupted => Self::Interrupted,
        }
    }
}

/// Where the content of an assistant turn comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
enum AssistantSource {
    /// Typed by the operator, sent nowhere.
    Operator(String),
    /// Generated by the completion service.
    Service,
}

impl AssistantSource {
    #[inline]
    fn from_input(input: String) -> Self {
        if input.is_empty() {
            Self::Service
        } else {
            Self::Operator(input)
        }
    }
}

/// An interactive conversation.
///
/// The session asks for a system prompt once, then alternates between a
/// user turn and an assistant turn forever. An assistant turn left blank is
/// generated by the completion service from the whole transcript; anything
/// else typed there is recorded as the assistant's reply as is.
pub struct Session {
    model_client: ModelClient,
    console: Box<dyn Console>,
    transcript: Transcript,
    model: String,
    params: GenerationParams,
    // Set while the console is between `completion_started` and
    // `completion_finished`.
    polling: bool,
}

impl Session {
    /// Runs the conversation until it ends.
    ///
    /// The transcript stays available afterwards through
    /// [`Session::transcript`].
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Messages already recorded stay in the
    /// transcript, and a turn in progress is dropped.
    pub async fn run(&mut self) -> SessionEnd {
        match self.drive().await {
            Ok(never) => match never {},
            Err(end) => {
                debug!("session ended: {end:?}");
                end
            }
        }
    }

    /// Runs the conversation until it ends or `interrupt` resolves,
    /// whichever comes first. The latter ends the session as
    /// [`SessionEnd::Interrupted`].
    ///
    /// A completion interrupted midway still gets its
    /// [`Console::completion_finished`] call.
    pub async fn run_until<F: Future>(&mut self, interrupt: F) -> SessionEnd {
        let end = {
            let mut run = pin!(self.run());
            let mut interrupt = pin!(interrupt);
            poll_fn(|cx| {
                if let Poll::Ready(end) = run.as_mut().poll(cx) {
                    return Poll::Ready(end);
                }
                interrupt.as_mut().poll(cx).map(|_| {
                    debug!("session interrupted");
                    SessionEnd::Interrupted
                })
            })
            .await
        };

        if self.polling {
            self.polling = false;
            self.console.completion_finished();
        }
        end
    }

    /// Returns what has been said so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the model the completion service is asked for.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn drive(&mut self) -> Result<Infallible, SessionEnd> {
        let system = self.console.read_line(SYSTEM_PROMPT).await?;
        self.transcript.append(ModelMessage::system(system));
        self.console.separator();

        loop {
            self.take_turn().await?;
        }
    }

    /// Records one user message and one assistant message.
    async fn take_turn(&mut self) -> Result<(), SessionEnd> {
        let user = self.console.read_line(USER_PROMPT).await?;
        self.transcript.append(ModelMessage::user(user));
        self.console.turn_break();

        let input = self.console.read_line(ASSISTANT_PROMPT).await?;
        let content = match AssistantSource::from_input(input) {
            AssistantSource::Operator(content) => content,
            AssistantSource::Service => self.poll_service().await?,
        };
        self.transcript.append(ModelMessage::assistant(content));
        self.console.turn_break();
        Ok(())
    }

    async fn poll_service(&mut self) -> Result<String, SessionEnd> {
        let request = self.transcript.to_request(&self.model, self.params);
        let console = &mut self.console;

        self.polling = true;
        console.completion_started();
        let result = self
            .model_client
            .send_request(&request, |delta| console.completion_delta(delta))
            .await;
        console.completion_finished();
        self.polling = false;

        let resp = result.map_err(SessionEnd::ServiceFailed)?;
        if resp.finish_reason == Some(ModelFinishReason::Length) {
            warn!("reply was cut at {} tokens", self.params.max_tokens);
        }
        Ok(resp.text)
    }
}
