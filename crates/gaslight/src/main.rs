//! An interactive chat where you may write the model's replies yourself.

#[macro_use]
extern crate tracing;

mod banner;
mod cli;
mod console;

use std::io::{self, Write};

use clap::Parser as _;
use gaslight_core::{SessionBuilder, SessionEnd, Transcript};
use gaslight_openai_model::{OpenAIConfigBuilder, OpenAIProvider};

use crate::cli::Args;
use crate::console::StdinConsole;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let timeout = args.timeout();
    let config = OpenAIConfigBuilder::with_api_key(args.api_key)
        .with_base_url(args.base_url)
        .with_timeout(timeout)
        .with_max_retries(args.max_retries)
        .build();
    debug!("{config:?}");
    let model_provider = match OpenAIProvider::new(config) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    if !args.no_banner {
        banner::print(&args.model);
    }

    let mut session = SessionBuilder::with_model_provider(model_provider)
        .with_model(args.model)
        .with_max_tokens(args.max_tokens)
        .with_temperature(args.temperature)
        .build(StdinConsole::new());

    let end = session.run_until(interrupted()).await;

    io::stdout().flush().ok();
    write_report(&mut io::stderr(), &end, session.transcript()).ok();

    // A pending read on stdin would keep the runtime from shutting down.
    std::process::exit(end.exit_code().into());
}

/// Resolves on Ctrl+C.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for Ctrl+C: {err}");
        std::future::pending::<()>().await;
    }
}

fn write_report<W: Write>(
    out: &mut W,
    end: &SessionEnd,
    transcript: &Transcript,
) -> io::Result<()> {
    match end {
        SessionEnd::Interrupted => {
            return writeln!(out, "\nGoodbye.");
        }
        SessionEnd::ServiceFailed(err) => {
            writeln!(out, "\nError: {err}")?;
        }
        SessionEnd::InputExhausted => {}
    }

    writeln!(out, "message_list:")?;
    match transcript.to_json() {
        Ok(json) => writeln!(out, "{json}"),
        Err(err) => {
            error!("cannot serialize the transcript: {err}");
            writeln!(out, "{:#?}", transcript.snapshot())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::fmt::{self, Display};

    use gaslight_model::{ErrorKind, ModelProviderError};

    use super::*;

    #[derive(Debug)]
    struct Unreachable;

    impl Display for Unreachable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl StdError for Unreachable {}

    impl ModelProviderError for Unreachable {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Connection
        }
    }

    fn report(end: &SessionEnd) -> String {
        let mut out = Vec::new();
        write_report(&mut out, end, &Transcript::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_on_interrupt() {
        assert_eq!(report(&SessionEnd::Interrupted), "\nGoodbye.\n");
    }

    #[test]
    fn test_report_on_exhausted_input() {
        assert_eq!(
            report(&SessionEnd::InputExhausted),
            "message_list:\n[]\n"
        );
    }

    #[test]
    fn test_report_on_service_failure() {
        let end = SessionEnd::ServiceFailed(Box::new(Unreachable));
        assert_eq!(
            report(&end),
            "\nError: connection refused\nmessage_list:\n[]\n"
        );
    }
}
