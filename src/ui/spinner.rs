use indicatif::{ProgressBar, ProgressStyle};
use std::{future::Future, io::IsTerminal, time::Duration};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner on stderr that clears itself when dropped.
struct Spinner(Option<ProgressBar>);

impl Spinner {
    fn start(msg: String) -> Self {
        // Piped output gets no spinner at all
        if !std::io::stderr().is_terminal() {
            return Self(None);
        }

        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        let pb = ProgressBar::new_spinner().with_style(style).with_message(msg);
        pb.enable_steady_tick(Duration::from_millis(80));
        Self(Some(pb))
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

/// Awaits `fut` while a spinner shows `msg`.
pub async fn with_spinner<Fut, T>(msg: impl Into<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    let _spinner = Spinner::start(msg.into());
    fut.await
}
