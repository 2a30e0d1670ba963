//! @ai:module:intent JSON report generation and reload
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::BenchmarkResults;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from results
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()>;

    /// @ai:intent Read results previously written by generate
    fn load(&self, input_path: &Path) -> Result<BenchmarkResults>;
}

/// @ai:intent Writes and reads results.json
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }

    /// @ai:effects fs:read
    fn load(&self, input_path: &Path) -> Result<BenchmarkResults> {
        let content = std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read {}", input_path.display()))?;
        let results = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a results file", input_path.display()))?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{AggregateState, SummaryReport};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_generate_and_load_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.json");

        let results = BenchmarkResults {
            timestamp: "2026-01-19T00:00:00+00:00".to_string(),
            command: "./isect -i a -j b -o c".to_string(),
            extensions_disabled: true,
            state: AggregateState {
                first_file_token_count: Some(100),
                second_file_token_count: Some(50),
                latest_intersection_tokens: None,
                latest_intersection_sets: Some(3),
                runtimes: vec![2.0, 4.0, 6.0],
            },
            summary: SummaryReport {
                run_count: 3,
                average_runtime: 4.0,
                min_runtime: 2.0,
                max_runtime: 6.0,
                operation_count: 5000,
                operations_per_second: 1250.0,
            },
        };

        reporter.generate(&results, &output).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("\"operations_per_second\": 1250.0"));

        let loaded = reporter.load(&output).unwrap();
        assert_eq!(loaded.state, results.state);
        assert_eq!(loaded.summary, results.summary);
        assert_eq!(loaded.command, results.command);
    }

    #[test]
    fn test_load_rejects_other_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("other.json");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();

        assert!(JsonReporter::new().load(&path).is_err());
    }
}
