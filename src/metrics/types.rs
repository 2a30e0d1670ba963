//! @ai:module:intent Metric types accumulated across a benchmark session
//! @ai:module:layer domain
//! @ai:module:public_api AggregateState, TokenSlot, SummaryReport, BenchmarkResults

use serde::{Deserialize, Serialize};

/// @ai:intent Where an observed per-file token count ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSlot {
    First,
    Second,
    /// Both slots already filled; the value was discarded
    Ignored,
}

/// @ai:intent Running totals for one session, owned by the run loop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateState {
    pub first_file_token_count: Option<u64>,
    pub second_file_token_count: Option<u64>,
    pub latest_intersection_tokens: Option<u64>,
    pub latest_intersection_sets: Option<u64>,
    /// Wall-clock seconds per measured invocation, in invocation order
    pub runtimes: Vec<f64>,
}

impl AggregateState {
    /// @ai:intent First-two-wins rule for per-file token counts
    /// @ai:post filled slots never change afterwards
    /// @ai:effects state:write
    pub fn observe_token_count(&mut self, value: u64) -> TokenSlot {
        if self.first_file_token_count.is_none() {
            self.first_file_token_count = Some(value);
            TokenSlot::First
        } else if self.second_file_token_count.is_none() {
            self.second_file_token_count = Some(value);
            TokenSlot::Second
        } else {
            TokenSlot::Ignored
        }
    }

    /// @ai:intent Last-write-wins rule for the intersection token count
    /// @ai:effects state:write
    pub fn observe_intersection_tokens(&mut self, value: u64) {
        self.latest_intersection_tokens = Some(value);
    }

    /// @ai:intent Last-write-wins rule for the intersection set count
    /// @ai:effects state:write
    pub fn observe_intersection_sets(&mut self, value: u64) {
        self.latest_intersection_sets = Some(value);
    }

    /// @ai:intent Append a measured runtime, no filtering
    /// @ai:effects state:write
    pub fn push_runtime(&mut self, seconds: f64) {
        self.runtimes.push(seconds);
    }

    /// @ai:intent Names of the fields a summary needs but which are still unset
    /// @ai:effects pure
    pub fn missing_for_summary(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.runtimes.is_empty() {
            missing.push("runtimes");
        }
        if self.first_file_token_count.is_none() {
            missing.push("first_file_token_count");
        }
        if self.second_file_token_count.is_none() {
            missing.push("second_file_token_count");
        }

        missing
    }
}

/// @ai:intent Derived throughput figures, computed once at the end of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub run_count: usize,
    pub average_runtime: f64,
    pub min_runtime: f64,
    pub max_runtime: f64,
    /// first_file_token_count * second_file_token_count
    pub operation_count: u64,
    pub operations_per_second: f64,
}

/// @ai:intent Complete session results as persisted to results.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub timestamp: String,
    pub command: String,
    pub extensions_disabled: bool,
    pub state: AggregateState,
    pub summary: SummaryReport,
}

impl BenchmarkResults {
    /// @ai:intent Stamp a finished session with the current time
    /// @ai:effects time
    pub fn new(
        command: String,
        extensions_disabled: bool,
        state: AggregateState,
        summary: SummaryReport,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            command,
            extensions_disabled,
            state,
            summary,
        }
    }
}
