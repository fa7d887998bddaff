use std::io::{self, IsTerminal as _, Write};

use owo_colors::OwoColorize;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Clears the terminal and shows what the tool is about.
pub fn print(model: &str) {
    let mut stdout = io::stdout();
    if stdout.is_terminal() {
        print!("{CLEAR_SCREEN}");
    }
    write_banner(&mut stdout, model).ok();
    stdout.flush().ok();
}

fn write_banner<W: Write>(out: &mut W, model: &str) -> io::Result<()> {
    writeln!(out, "{}", env!("CARGO_PKG_NAME").bold())?;
    writeln!(
        out,
        "Attempt to gaslight OpenAI's chat models by spoofing their output."
    )?;
    writeln!(
        out,
        "Press Ctrl+C to exit, or Ctrl+D to print the message list."
    )?;
    writeln!(out)?;
    writeln!(out, "Using model: {}", model.bright_cyan())?;
    writeln!(out)
}
