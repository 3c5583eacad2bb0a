use std::{borrow::Cow, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner shown while the deployment transaction is in flight. Drawn on standard error, so it
/// never mixes with the report on standard output.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }

    /// Progress that is never drawn.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn start(&self, message: impl Into<Cow<'static, str>>) {
        self.bar.set_message(message);
        self.bar.enable_steady_tick(TICK_INTERVAL);
    }

    pub fn update(&self, message: impl Into<Cow<'static, str>>) {
        self.bar.set_message(message);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Stops the spinner, leaving the last message on screen.
    pub fn abandon(&self) {
        self.bar.abandon();
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }
}
