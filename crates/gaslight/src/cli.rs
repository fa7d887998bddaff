use std::time::Duration;

use clap::Parser;
use gaslight_model::DEFAULT_MODEL;

/// Attempt to gaslight OpenAI's chat models by spoofing their output.
///
/// Leave an assistant turn blank to let the model answer, or type the answer
/// yourself and the model will believe it said so.
#[derive(Debug, Parser)]
#[command(name = "gaslight", version, about)]
pub struct Args {
    /// OpenAI API key.
    #[arg(
        short = 'a',
        long = "apikey",
        env = "OPENAI_API_KEY",
        hide_env_values = true
    )]
    pub api_key: String,

    /// OpenAI model to use.
    #[arg(short, long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Root URL of an OpenAI-compatible API.
    #[arg(
        long,
        env = "OPENAI_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub base_url: String,

    /// Upper bound of tokens generated per reply.
    #[arg(long, default_value_t = 1024)]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[arg(long, default_value_t = 0.8)]
    pub temperature: f32,

    /// Timeout of a whole API request.
    #[arg(long, value_name = "SECONDS", default_value_t = 600)]
    pub timeout: u64,

    /// How many times a transiently failed request is sent again.
    #[arg(long, default_value_t = 2)]
    pub max_retries: u32,

    /// Don't clear the screen and print the banner.
    #[arg(long)]
    pub no_banner: bool,
}

impl Args {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let args =
            Args::try_parse_from(["gaslight", "-a", "sk-test", "-m", "gpt-4o"])
                .unwrap();
        assert_eq!(args.api_key, "sk-test");
        assert_eq!(args.model, "gpt-4o");
        assert_eq!(args.max_tokens, 1024);
        assert_eq!(args.temperature, 0.8);
        assert_eq!(args.timeout(), Duration::from_secs(600));
        assert_eq!(args.max_retries, 2);
        assert!(!args.no_banner);
    }

    #[test]
    fn test_long_flags() {
        let args = Args::try_parse_from([
            "gaslight",
            "--apikey",
            "sk-test",
            "--model",
            "gpt-4o-mini",
            "--base-url",
            "http://localhost:11434/v1",
            "--max-tokens",
            "64",
            "--temperature",
            "0",
            "--timeout",
            "10",
            "--max-retries",
            "0",
            "--no-banner",
        ])
        .unwrap();
        assert_eq!(args.base_url, "http://localhost:11434/v1");
        assert_eq!(args.max_tokens, 64);
        assert_eq!(args.temperature, 0.0);
        assert_eq!(args.timeout(), Duration::from_secs(10));
        assert_eq!(args.max_retries, 0);
        assert!(args.no_banner);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = Args::try_parse_from([
            "gaslight",
            "-a",
            "sk-test",
            "--max-tokens",
            "lots",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
