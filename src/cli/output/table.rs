//! Table output formatting for CLI commands
//!
//! Renders experiment summaries, per-trial outcomes and the benchmark
//! catalogue using comfy-table. Honors `NO_COLOR` and dumb terminals.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{BenchmarkFunction, TrialFailure};
use crate::services::{ExperimentSummary, StageStats};

/// One row of the per-trial table.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TrialRow {
    pub trial_id: usize,
    pub stage1_fitness: f64,
    pub stage2_fitness: f64,
    pub best_p: f64,
    pub stage1_iterations: usize,
}

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Per-stage statistics plus the projection-order distribution
    pub fn format_summary(&self, summary: &ExperimentSummary) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Stage",
            "Mean fitness",
            "Std",
            "Min",
            "Max",
            "Mean time (s)",
            "Mean iters",
        ]));

        for (label, stats) in [
            ("hypercomplex (p = 2)", summary.stage1),
            ("fine-tuned p", summary.stage2),
        ] {
            table.add_row(stage_row(label, stats.as_ref()));
        }

        let p_line = summary.best_p.map_or_else(
            || "p*: n/a".to_string(),
            |p| format!("p*: {:.4} ± {:.4}", p.mean, p.std),
        );
        let counts = format!(
            "{}: {}/{} trials succeeded on {} worker(s)",
            summary.benchmark, summary.succeeded, summary.n_runs, summary.workers
        );

        format!("{counts}\n{table}\n{p_line}")
    }

    /// Per-trial best values
    pub fn format_trials(&self, trials: &[TrialRow]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Trial", "f(z*, 2)", "f(z*, p*)", "p*", "Iterations"]));

        for row in trials {
            let improved = row.stage2_fitness < row.stage1_fitness;
            let fine_cell = Cell::new(format_fitness(row.stage2_fitness));
            let fine_cell = if self.use_colors && improved {
                fine_cell.fg(Color::Green)
            } else {
                fine_cell
            };

            table.add_row(vec![
                Cell::new(row.trial_id).set_alignment(CellAlignment::Right),
                Cell::new(format_fitness(row.stage1_fitness)),
                fine_cell,
                Cell::new(format!("{:.4}", row.best_p)),
                Cell::new(row.stage1_iterations).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }

    /// Failed trials and their reasons
    pub fn format_failures(&self, failures: &[TrialFailure]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Trial", "Reason"]));

        for failure in failures {
            let reason = Cell::new(&failure.reason);
            let reason = if self.use_colors {
                reason.fg(Color::Red)
            } else {
                reason
            };
            table.add_row(vec![Cell::new(failure.trial_id), reason]);
        }

        table.to_string()
    }

    /// The benchmark catalogue
    pub fn format_benchmarks(&self, benchmarks: &[BenchmarkFunction]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Name", "Lower bound", "Upper bound"]));

        for benchmark in benchmarks {
            let name = Cell::new(benchmark.name);
            let name = if self.use_colors {
                name.fg(Color::Cyan)
            } else {
                name
            };
            table.add_row(vec![
                name,
                Cell::new(benchmark.lower_bound).set_alignment(CellAlignment::Right),
                Cell::new(benchmark.upper_bound).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        // Use UTF-8 preset for nice borders
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn stage_row(label: &str, stats: Option<&StageStats>) -> Vec<Cell> {
    let Some(stats) = stats else {
        return vec![Cell::new(label), Cell::new("n/a")];
    };
    vec![
        Cell::new(label),
        Cell::new(format_fitness(stats.fitness.mean)),
        Cell::new(format_fitness(stats.fitness.std)),
        Cell::new(format_fitness(stats.min_fitness)),
        Cell::new(format_fitness(stats.max_fitness)),
        Cell::new(format!("{:.3}", stats.elapsed_secs.mean)),
        Cell::new(format!("{:.1}", stats.mean_iterations)),
    ]
}

fn format_fitness(value: f64) -> String {
    format!("{value:.6e}")
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}
