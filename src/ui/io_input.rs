use anyhow::{Context, Result};
use dialoguer::console::{style, Term};
use std::io::stdin;
use tracing::{debug, info};

/// Where prompt answers come from.
///
/// `Ok(None)` means the input is exhausted and the session should end.
pub trait InputSource {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Standard input source that reads from stdin.
pub struct StdinInputSource;

impl InputSource for StdinInputSource {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let term = Term::stdout();

        info!(target: "plain", "{}\n> ", style(prompt).cyan().bold());

        // Reposition cursor onto the "> " spot
        if term.is_term() {
            term.move_cursor_up(1).context("Failed to move cursor up")?;
            term.move_cursor_right(2)
                .context("Failed to move cursor right")?;
        }

        let mut line = String::new();
        let read = stdin()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            debug!("stdin closed");
            return Ok(None);
        }

        Ok(Some(line))
    }
}

/// Vector-based input source for testing.
pub struct VecInputSource {
    buf: std::vec::IntoIter<String>,
}

impl VecInputSource {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            buf: lines
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl InputSource for VecInputSource {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>> {
        debug!("Prompt: {}", prompt);

        let next = self.buf.next();
        match &next {
            Some(line) => debug!("Providing input line: {}", line),
            None => debug!("No more input lines available"),
        }
        Ok(next)
    }
}
