use crate::ModelMessage;

/// The model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRequest {
    /// Identifier of the model that should answer.
    pub model: String,
    /// The input messages, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Generation settings.
    pub params: GenerationParams,
}

/// Sampling settings sent along with every request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    /// Upper bound of generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.8,
        }
    }
}
