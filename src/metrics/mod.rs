//! @ai:module:intent Session state and derived summary types
//! @ai:module:layer application
//! @ai:module:public_api AggregateState, SummaryReport, BenchmarkResults, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::MetricsAggregator;
pub use types::{AggregateState, BenchmarkResults, SummaryReport, TokenSlot};
