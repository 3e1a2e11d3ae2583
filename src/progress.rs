//! Progress bar utilities for long-running operations
//!
//! Visual feedback for simulation runs and imports using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::simulation::ProgressSink;

/// Progress bar for Monte Carlo simulation runs
pub struct SimulationProgress {
    pub progress: ProgressBar,
    pub total_simulations: usize,
}

impl SimulationProgress {
    pub fn new(total_simulations: usize) -> Self {
        let progress = ProgressBar::new(total_simulations as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({eta})\n{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress.set_message("🎲 Simulating games...");

        Self {
            progress,
            total_simulations,
        }
    }

    /// Hidden bar for non-interactive runs (JSON output, tests)
    pub fn hidden(total_simulations: usize) -> Self {
        let progress = ProgressBar::hidden();
        progress.set_length(total_simulations as u64);

        Self {
            progress,
            total_simulations,
        }
    }

    /// Mark the run as complete with the headline probability
    pub fn finish(&self, home: &str, home_win_probability: f64) {
        self.progress.finish_with_message(format!(
            "✅ {} simulations complete! {} win probability {:.1}%",
            self.total_simulations,
            home,
            home_win_probability * 100.0
        ));
    }

    pub fn finish_with_error(&self, error: &str) {
        self.progress.finish_with_message(format!("❌ Failed: {}", error));
    }
}

impl ProgressSink for SimulationProgress {
    fn advance(&self, completed: u64) {
        self.progress.inc(completed);
    }
}

/// Spinner for quick operations
pub struct Spinner {
    pub spinner: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message.to_string());

        Self { spinner }
    }

    pub fn update(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    /// Finish spinner with success
    pub fn finish(&self, message: &str) {
        self.spinner.finish_with_message(format!("✅ {}", message));
    }

    /// Finish spinner with error
    pub fn finish_with_error(&self, message: &str) {
        self.spinner.finish_with_message(format!("❌ {}", message));
    }
}
