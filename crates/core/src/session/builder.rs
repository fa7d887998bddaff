use gaslight_model::{DEFAULT_MODEL, GenerationParams, ModelProvider};

use super::Session;
use crate::console::Console;
use crate::model_client::ModelClient;

/// [`Session`] builder.
pub struct SessionBuilder {
    model_client: ModelClient,
    model: Option<String>,
    params: GenerationParams,
}

impl SessionBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            model: None,
            params: GenerationParams::default(),
        }
    }

    /// Sets the model to ask for. Defaults to [`DEFAULT_MODEL`].
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the upper bound of generated tokens.
    #[inline]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    #[inline]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    /// Builds a session that talks to the human through `console`.
    pub fn build<C: Console + 'static>(self, console: C) -> Session {
        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        debug!("new session with model {model}, {:?}", self.params);
        Session {
            model_client: self.model_client,
            console: Box::new(console),
            transcript: Default::default(),
            model,
            params: self.params,
            polling: false,
        }
    }
}
