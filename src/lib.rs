//! @ai:module:intent Benchmark driver for the token intersection program
//! @ai:module:layer application
//! @ai:module:public_api config, error, output, runner, metrics, report, preflight

pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod preflight;
pub mod report;
pub mod runner;

pub use config::BenchmarkConfig;
pub use error::{BenchError, Result};
pub use metrics::{AggregateState, BenchmarkResults, MetricsAggregator, SummaryReport};
pub use output::{OutputGrammar, OutputParser, ParsedFact};
pub use preflight::{Preflight, PreflightStatus};
pub use report::ReportGenerator;
pub use runner::{
    BenchmarkSession, MockProcessRunner, ProcessRunner, ProcessRunnerTrait, RunInvocation,
    RunResult, SessionPlan,
};
