//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{AggregateState, BenchmarkResults, SummaryReport};
use crate::report::console_report::millions;
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from results
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from benchmark results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    fn cell(value: Option<u64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string())
    }

    /// @ai:intent Generate header section
    /// @ai:effects pure
    fn generate_header(results: &BenchmarkResults) -> String {
        let mut output = String::new();

        writeln!(output, "# Intersection Benchmark Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", results.timestamp).unwrap();
        writeln!(output, "**Command:** `{}`", results.command).unwrap();
        writeln!(
            output,
            "**CPU extensions:** {}",
            if results.extensions_disabled { "disabled" } else { "enabled" }
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate discovered counts table
    /// @ai:effects pure
    fn generate_counts_section(state: &AggregateState) -> String {
        let mut output = String::new();

        writeln!(output, "## Input and Result Sizes").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Quantity | Count |").unwrap();
        writeln!(output, "|----------|-------|").unwrap();
        writeln!(output, "| First file tokens | {} |", Self::cell(state.first_file_token_count)).unwrap();
        writeln!(output, "| Second file tokens | {} |", Self::cell(state.second_file_token_count)).unwrap();
        writeln!(output, "| Result tokens | {} |", Self::cell(state.latest_intersection_tokens)).unwrap();
        writeln!(output, "| Result sets | {} |", Self::cell(state.latest_intersection_sets)).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate per-run runtime table
    /// @ai:effects pure
    fn generate_runs_section(state: &AggregateState) -> String {
        let mut output = String::new();

        writeln!(output, "## Runs").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Run | Wall time (s) |").unwrap();
        writeln!(output, "|-----|---------------|").unwrap();

        for (i, runtime) in state.runtimes.iter().enumerate() {
            writeln!(output, "| {} | {:.3} |", i + 1, runtime).unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate throughput table
    /// @ai:effects pure
    fn generate_summary_section(summary: &SummaryReport) -> String {
        let mut output = String::new();

        writeln!(output, "## Throughput").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Measured runs | {} |", summary.run_count).unwrap();
        writeln!(output, "| Average runtime | {:.3}s |", summary.average_runtime).unwrap();
        writeln!(output, "| Fastest run | {:.3}s |", summary.min_runtime).unwrap();
        writeln!(output, "| Slowest run | {:.3}s |", summary.max_runtime).unwrap();
        writeln!(
            output,
            "| Intersection operations | {} Mio. |",
            summary.operation_count / 1_000_000
        )
        .unwrap();
        writeln!(
            output,
            "| Operations per second | {} Mio. |",
            millions(summary.operations_per_second)
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_header(results));
        content.push_str(&Self::generate_counts_section(&results.state));
        content.push_str(&Self::generate_summary_section(&results.summary));
        content.push_str(&Self::generate_runs_section(&results.state));

        std::fs::write(output_path, content)?;
        Ok(())
    }
}
