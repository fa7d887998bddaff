use std::io::{self, Write as _};
use std::time::Duration;

use async_trait::async_trait;
use gaslight_core::{Console, ReadError};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

const SEPARATOR_WIDTH: usize = 100;

/// A console on the terminal, or on whatever is piped into stdin.
pub struct StdinConsole<R = BufReader<Stdin>> {
    reader: R,
    spinner: Option<ProgressBar>,
    streamed: bool,
}

impl StdinConsole {
    pub fn new() -> Self {
        Self::with_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for StdinConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StdinConsole<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            spinner: None,
            streamed: false,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Console for StdinConsole<R> {
    async fn read_line(&mut self, prompt: &str) -> Result<String, ReadError> {
        print!("{}", prompt.bold());
        io::stdout().flush().ok();

        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => {
                println!();
                Err(ReadError::Exhausted)
            }
            Ok(_) => {
                strip_line_ending(&mut line);
                Ok(line)
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                Err(ReadError::Interrupted)
            }
            Err(err) => {
                error!("error reading input: {err}");
                Err(ReadError::Exhausted)
            }
        }
    }

    fn separator(&mut self) {
        println!("{}", "-".repeat(SEPARATOR_WIDTH).dimmed());
    }

    fn turn_break(&mut self) {
        println!();
    }

    fn completion_started(&mut self) {
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message("Polling API...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
        self.streamed = false;
    }

    fn completion_delta(&mut self, delta: &str) {
        // Finish the spinner before printing anything else.
        self.clear_spinner();
        print!("{}", delta.bright_white());
        io::stdout().flush().ok();
        self.streamed = true;
    }

    fn completion_finished(&mut self) {
        self.clear_spinner();
        if self.streamed {
            println!();
        }
        self.streamed = false;
    }
}

/// Removes one trailing `\n` or `\r\n`, and nothing else.
#[inline]
fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
