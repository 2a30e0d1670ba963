//! @ai:module:intent Plain-text summary printed at the end of a session
//! @ai:module:layer presentation
//! @ai:module:public_api ConsoleReporter, millions
//! @ai:module:stateless true

use crate::metrics::{AggregateState, SummaryReport};
use std::fmt::Write as FmtWrite;

/// @ai:intent Whole millions, truncated toward zero
/// @ai:effects pure
pub fn millions(value: f64) -> u64 {
    (value / 1_000_000.0) as u64
}

/// @ai:intent Formats summary values without recomputing them
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn optional(value: Option<u64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    }

    /// @ai:intent Discovered token and set counts
    /// @ai:effects pure
    pub fn render_discovery(&self, state: &AggregateState) -> String {
        let mut output = String::new();

        writeln!(output, "First file:    {}", Self::optional(state.first_file_token_count)).unwrap();
        writeln!(output, "Second file:   {}", Self::optional(state.second_file_token_count)).unwrap();
        writeln!(output, "Result tokens: {}", Self::optional(state.latest_intersection_tokens)).unwrap();
        writeln!(output, "Result sets:   {}", Self::optional(state.latest_intersection_sets)).unwrap();

        output
    }

    /// @ai:intent Per-run times followed by the throughput block
    /// @ai:effects pure
    pub fn render(&self, summary: &SummaryReport, state: &AggregateState) -> String {
        let mut output = String::new();

        output.push_str(&self.render_discovery(state));
        writeln!(output).unwrap();

        for (i, runtime) in state.runtimes.iter().enumerate() {
            writeln!(output, "Run {:>3}: {:.6}s", i + 1, runtime).unwrap();
        }
        writeln!(output).unwrap();

        writeln!(output, "{:<46}{:.6}s", "Avg time:", summary.average_runtime).unwrap();
        writeln!(
            output,
            "{:<46}{:.6}s / {:.6}s",
            "Fastest / slowest run:", summary.min_runtime, summary.max_runtime
        )
        .unwrap();
        writeln!(
            output,
            "{:<46}{} Mio.",
            "Number of intersection operations:",
            summary.operation_count / 1_000_000
        )
        .unwrap();
        writeln!(
            output,
            "{:<46}{} Mio.",
            "Number of intersection operations per second:",
            millions(summary.operations_per_second)
        )
        .unwrap();

        output
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millions_truncates() {
        assert_eq!(millions(695_999_999.9), 695);
        assert_eq!(millions(999_999.0), 0);
    }

    #[test]
    fn test_render_uses_summary_values() {
        let state = AggregateState {
            first_file_token_count: Some(51784),
            second_file_token_count: Some(1703064),
            latest_intersection_tokens: Some(424454),
            latest_intersection_sets: None,
            runtimes: vec![126.5, 127.25],
        };
        let summary = SummaryReport {
            run_count: 2,
            average_runtime: 126.875,
            min_runtime: 126.5,
            max_runtime: 127.25,
            operation_count: 88_191_466_176,
            operations_per_second: 695_105_623.7,
        };

        let text = ConsoleReporter::new().render(&summary, &state);

        assert!(text.contains("First file:    51784"));
        assert!(text.contains("Result sets:   -"));
        assert!(text.contains("Run   2: 127.250000s"));
        assert!(text.contains("126.875000s"));
        assert!(text.contains("88191 Mio."));
        assert!(text.contains("695 Mio."));
    }
}
