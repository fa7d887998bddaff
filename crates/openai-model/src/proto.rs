use gaslight_model::{ModelMessage, ModelRequest};
use serde::{Deserialize, Serialize};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

/// The body of a non-success reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ModelMessage],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest) -> ChatCompletionRequest<'_> {
    // `ModelMessage` already serializes as `{"role", "content"}`.
    ChatCompletionRequest {
        model: &req.model,
        messages: &req.messages,
        max_tokens: req.params.max_tokens,
        temperature: req.params.temperature,
        stream: true,
    }
}

/// Extracts the human-readable message from an error body, falling back to
/// the raw body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) => resp.error.message,
        Err(_) => body.trim().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use gaslight_model::GenerationParams;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            model: "custom".to_owned(),
            messages: vec![
                ModelMessage::system("You are a helpful assistant."),
                ModelMessage::user("Hello"),
                ModelMessage::assistant("Hi."),
            ],
            params: GenerationParams {
                max_tokens: 64,
                temperature: 0.5,
            },
        };
        let body = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "custom",
                "messages": [
                    { "role": "system", "content": "You are a helpful assistant." },
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Hi." },
                ],
                "max_tokens": 64,
                "temperature": 0.5,
                "stream": true,
            })
        );
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided.","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided.");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_parse_chunk_without_choices() {
        let chunk: ChatCompletionChunk =
            serde_json::from_str(r#"{"id":"c1","choices":[]}"#).unwrap();
        assert!(chunk.choices.is_empty());
    }
}
