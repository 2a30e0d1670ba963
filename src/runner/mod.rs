//! @ai:module:intent Process invocation and the sequential benchmark loop
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProcessRunner, MockProcessRunner, BenchmarkSession, RunInvocation, RunResult

pub mod process;
pub mod session;

pub use process::{
    split_lines, CpuUsageResult, MockProcessRunner, ProcessRunner, ProcessRunnerTrait,
    RunInvocation, RunResult, NO_CPU_EXTENSIONS_FLAG,
};
pub use session::{BenchmarkSession, SessionEvent, SessionOutcome, SessionPlan};
