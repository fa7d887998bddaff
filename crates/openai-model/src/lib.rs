//! A model provider for OpenAI-compatible chat completion APIs.

#[macro_use]
extern crate tracing;

mod config;
mod io;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoff;
use bytes::Bytes;
use gaslight_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
};
use mime::Mime;
use reqwest::{Client, Response, StatusCode, header};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use io::{Chunks, Sse};
pub use response::OpenAIResponse;

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection
        } else {
            ErrorKind::Other
        };
        Self::new(err.to_string(), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
///
/// Every request is bounded by the configured timeout. Failures that happen
/// before the reply starts streaming are retried with exponential backoff
/// when they look transient, up to the configured number of retries.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::new(err.to_string(), ErrorKind::Other))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;
    type Response = OpenAIResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let body = serde_json::to_vec(&proto::create_request(req));
        let client = self.client.clone();
        let config = Arc::clone(&self.config);

        async move {
            let body = Bytes::from(body.map_err(|err| {
                Error::new(err.to_string(), ErrorKind::Other)
            })?);
            let max_retries = config.max_retries;
            let policy = ExponentialBackoff {
                max_elapsed_time: None,
                ..Default::default()
            };

            let mut attempt = 0;
            let resp = backoff::future::retry_notify(
                policy,
                || {
                    attempt += 1;
                    let this_attempt = attempt;
                    let fut = connect(
                        client.clone(),
                        Arc::clone(&config),
                        body.clone(),
                    );
                    async move {
                        fut.await.map_err(|err| {
                            if err.kind.is_transient()
                                && this_attempt <= max_retries
                            {
                                backoff::Error::transient(err)
                            } else {
                                backoff::Error::permanent(err)
                            }
                        })
                    }
                },
                |err: Error, delay: Duration| {
                    warn!("request failed ({err}), retrying in {delay:?}");
                },
            )
            .await?;

            // Here we got a successful response.
            let chunks = Chunks::from_response(resp);
            let sse = Sse::new(chunks);
            Ok(OpenAIResponse::from_sse(sse))
        }
    }
}

async fn connect(
    client: Client,
    config: Arc<OpenAIConfig>,
    body: Bytes,
) -> Result<Response, Error> {
    trace!("sending request to {}", config.completions_url());
    let resp = client
        .post(config.completions_url())
        .bearer_auth(&config.api_key)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "text/event-stream")
        .body(body)
        .send()
        .await
        .map_err(Error::from_transport)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::new(
            format!("{status}: {}", proto::error_message(&body)),
            kind_for_status(status),
        ));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let is_event_stream = content_type
        .and_then(|v| v.parse().ok())
        .is_some_and(|m: Mime| {
            m.type_() == mime::TEXT && m.subtype() == mime::EVENT_STREAM
        });
    if !is_event_stream {
        return Err(Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::InvalidResponse,
        ));
    }

    Ok(resp)
}

#[inline]
fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ErrorKind::Unauthorized
        }
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        s if s.is_server_error() => ErrorKind::Server,
        _ => ErrorKind::Other,
    }
}
