// Mon Jan 19 2026 - Alex

use crate::engine::TaskResultWithMetadata;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Unit-level progress of a scan job.
pub struct JobProgress {
    bar: ProgressBar,
    failures: u64,
}

impl JobProgress {
    pub fn new(units: u64, enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(units)
        } else {
            ProgressBar::with_draw_target(Some(units), ProgressDrawTarget::hidden())
        };

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");
        bar.set_style(style);
        bar.set_message("scanning");
        if enabled {
            bar.enable_steady_tick(Duration::from_millis(100));
        }

        Self { bar, failures: 0 }
    }

    /// Advances on successful units; failed attempts only update the message.
    pub fn record(&mut self, result: &TaskResultWithMetadata) {
        if result.is_success() {
            self.bar.inc(1);
            self.bar.set_message(format!("cdp {}", result.key.cdp));
        } else {
            self.failures += 1;
            self.bar.set_message(format!("{} failed attempt(s)", self.failures));
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }

    pub fn abandon(&self) {
        self.bar.abandon_with_message("failed");
    }
}
