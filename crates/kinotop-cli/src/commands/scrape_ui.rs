use indicatif::{ProgressBar, ProgressStyle};
use kinotop_models::MovieRecord;
use kinotop_sources::ProgressObserver;
use std::io::IsTerminal;

/// Terminal progress for a scrape; falls back to structured logs when not interactive
pub struct ScrapeUI {
    bar: ProgressBar,
    interactive: bool,
}

impl ScrapeUI {
    pub fn new(quiet: bool) -> Self {
        let interactive = is_interactive() && !quiet;
        let bar = if interactive {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            spinner.enable_steady_tick(std::time::Duration::from_millis(120));
            spinner
        } else {
            ProgressBar::hidden()
        };

        Self { bar, interactive }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressObserver for ScrapeUI {
    fn stage(&self, message: &str) {
        if self.interactive {
            self.bar.set_message(message.to_string());
        } else {
            tracing::info!(operation = "stage", message = %message, "Pipeline stage");
        }
    }

    fn links_collected(&self, count: usize) {
        if !self.interactive {
            return;
        }
        self.bar.set_length(count as u64);
        self.bar.set_position(0);
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
    }

    fn movie_extracted(&self, current: usize, total: usize, record: &MovieRecord) {
        if self.interactive {
            self.bar.set_position(current as u64);
            self.bar.set_message(format!("{} ({})", record.title, record.year));
        } else {
            tracing::info!(
                operation = "progress",
                current = current,
                total = total,
                percent = (current as f64 / total.max(1) as f64 * 100.0) as u8,
                "Scrape progress update"
            );
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
