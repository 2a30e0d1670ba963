//! @ai:module:intent Summary computation and report generation for benchmark sessions
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, ConsoleReporter, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod console_report;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use console_report::ConsoleReporter;
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::error::{BenchError, Result as BenchResult};
use crate::metrics::{AggregateState, BenchmarkResults, SummaryReport};
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    console: ConsoleReporter,
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            console: ConsoleReporter::new(),
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Derive average runtime and throughput from the final session state
    /// @ai:pre at least one runtime and both per-file token counts are known
    /// @ai:post operations_per_second == operation_count / average_runtime
    /// @ai:effects pure
    pub fn summarize(state: &AggregateState) -> BenchResult<SummaryReport> {
        let (Some(first), Some(second), false) = (
            state.first_file_token_count,
            state.second_file_token_count,
            state.runtimes.is_empty(),
        ) else {
            return Err(BenchError::InsufficientData {
                missing: state.missing_for_summary(),
            });
        };

        let operation_count = first
            .checked_mul(second)
            .ok_or(BenchError::OperationCountOverflow { first, second })?;

        let run_count = state.runtimes.len();
        let average_runtime = state.runtimes.iter().sum::<f64>() / run_count as f64;

        if average_runtime == 0.0 {
            return Err(BenchError::UndefinedThroughput { operation_count });
        }

        let min_runtime = state.runtimes.iter().copied().fold(f64::INFINITY, f64::min);
        let max_runtime = state.runtimes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(SummaryReport {
            run_count,
            average_runtime,
            min_runtime,
            max_runtime,
            operation_count,
            operations_per_second: operation_count as f64 / average_runtime,
        })
    }

    /// @ai:intent Console text for a finished session
    /// @ai:effects pure
    pub fn render(&self, summary: &SummaryReport, state: &AggregateState) -> String {
        self.console.render(summary, state)
    }

    /// @ai:intent Console text for the discovery run
    /// @ai:effects pure
    pub fn render_discovery(&self, state: &AggregateState) -> String {
        self.console.render_discovery(state)
    }

    /// @ai:intent Read a results.json written by an earlier session
    /// @ai:effects fs:read
    pub fn load_results(&self, path: &Path) -> Result<BenchmarkResults> {
        self.json.load(path)
    }

    /// @ai:intent Generate all reports
    /// @ai:effects fs:write
    pub fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json.generate(results, &output_dir.join("results.json"))?;
        self.markdown
            .generate(results, &output_dir.join("results.md"))?;

        // Charts need system fonts; the text reports are already on disk
        if let Err(e) = self.charts.generate_all(results, output_dir) {
            tracing::warn!("Skipping charts: {:#}", e);
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
