//! Progress bars using indicatif, one per trial.
//!
//! [`TrialProgressBars`] is the terminal renderer of the progress stream: it
//! advances a trial's bar for every stage-1 iteration, shows the fine-tune
//! result on completion and closes the bar on the sentinel.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::domain::models::{ProgressKind, ProgressMessage};
use crate::domain::ports::ProgressSink;

const TRIAL_TEMPLATE: &str =
    "trial {prefix:>3} [{elapsed_precise}] {bar:30.cyan/blue} {pos:>6}/{len:6} {msg}";
const PROGRESS_CHARS: &str = "█▓▒░ ";

fn trial_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(TRIAL_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars(PROGRESS_CHARS))
}

/// Multi-progress manager for concurrent trials
pub struct MultiProgressManager {
    multi: MultiProgress,
}

impl MultiProgressManager {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
        }
    }

    /// Create a multi-progress manager with hidden output (for testing)
    pub fn hidden() -> Self {
        let multi = MultiProgress::new();
        multi.set_draw_target(ProgressDrawTarget::hidden());
        Self { multi }
    }

    /// Add a trial bar of `total` steps labelled with `prefix`
    pub fn add_trial_bar(&self, total: u64, prefix: impl Into<String>) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(trial_style());
        pb.set_prefix(prefix.into());
        pb
    }

    pub const fn inner(&self) -> &MultiProgress {
        &self.multi
    }

    /// Clear all progress bars (useful for cleanup)
    pub fn clear(&self) {
        self.multi.clear().ok();
    }
}

impl Default for MultiProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

struct TrialBar {
    bar: ProgressBar,
    completed: bool,
}

/// Renders the multiplexed progress stream as one bar per trial.
///
/// Bars hold `n_iterations + 1` steps: one per stage-1 iteration plus the
/// completion. Early-stopped trials jump to the end when they finish.
pub struct TrialProgressBars {
    manager: MultiProgressManager,
    bars: Vec<TrialBar>,
}

impl TrialProgressBars {
    pub fn new(manager: MultiProgressManager, n_runs: usize, n_iterations: usize) -> Self {
        let total = n_iterations as u64 + 1;
        let bars = (0..n_runs)
            .map(|trial_id| TrialBar {
                bar: manager.add_trial_bar(total, trial_id.to_string()),
                completed: false,
            })
            .collect();
        Self { manager, bars }
    }

    pub fn bar(&self, trial_id: usize) -> Option<&ProgressBar> {
        self.bars.get(trial_id).map(|t| &t.bar)
    }
}

impl ProgressSink for TrialProgressBars {
    fn on_message(&mut self, message: &ProgressMessage) {
        let Some(trial) = self.bars.get_mut(message.trial_id) else {
            return;
        };

        match message.kind() {
            ProgressKind::Iteration => {
                trial.bar.inc(1);
                if let Some(fitness) = message.fitness {
                    trial.bar.set_message(format!("f(z,2)={fitness:.4e}"));
                }
            }
            ProgressKind::Completion => {
                trial.completed = true;
                trial.bar.inc(1);
                trial.bar.set_message(format!(
                    "f(z,2)={:.4e} p*={:.3} f(z,p*)={:.4e}",
                    message.fitness.unwrap_or(f64::NAN),
                    message.fine_p.unwrap_or(f64::NAN),
                    message.fine_fitness.unwrap_or(f64::NAN),
                ));
            }
            ProgressKind::Sentinel => {
                if trial.completed {
                    trial.bar.finish();
                } else {
                    trial.bar.abandon_with_message("✗ failed");
                }
            }
        }
    }

    fn on_finished(&mut self) {
        self.manager.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_progress_manager_hidden() {
        let manager = MultiProgressManager::hidden();
        assert!(manager.inner().is_hidden());
    }

    #[test]
    fn test_trial_bar_length_includes_completion() {
        let bars = TrialProgressBars::new(MultiProgressManager::hidden(), 3, 50);
        assert_eq!(bars.bar(2).unwrap().length(), Some(51));
        assert!(bars.bar(3).is_none());
    }

    #[test]
    fn test_bars_follow_stream() {
        let mut bars = TrialProgressBars::new(MultiProgressManager::hidden(), 2, 10);

        bars.on_message(&ProgressMessage::iteration(0, 4.0));
        bars.on_message(&ProgressMessage::iteration(0, 3.0));
        bars.on_message(&ProgressMessage::iteration(1, 9.0));
        assert_eq!(bars.bar(0).unwrap().position(), 2);
        assert!(bars.bar(0).unwrap().message().contains("f(z,2)"));

        bars.on_message(&ProgressMessage::completion(0, 3.0, 2.5, 3.25));
        bars.on_message(&ProgressMessage::sentinel(0));
        let first = bars.bar(0).unwrap();
        assert!(first.is_finished());
        assert!(first.message().contains("p*=3.250"));

        bars.on_message(&ProgressMessage::sentinel(1));
        let second = bars.bar(1).unwrap();
        assert!(second.is_finished());
        assert!(second.message().contains("failed"));
    }

    #[test]
    fn test_unknown_trial_is_ignored() {
        let mut bars = TrialProgressBars::new(MultiProgressManager::hidden(), 1, 5);
        bars.on_message(&ProgressMessage::iteration(7, 1.0));
        assert_eq!(bars.bar(0).unwrap().position(), 0);
    }
}
