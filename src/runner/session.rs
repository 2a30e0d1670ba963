//! @ai:module:intent Sequential run loop feeding one aggregator per session
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkSession, SessionPlan, SessionEvent, SessionOutcome
//! @ai:module:stateless false

use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::metrics::{AggregateState, MetricsAggregator};
use crate::output::OutputParser;
use crate::runner::process::{ProcessRunnerTrait, RunInvocation, RunResult};
use std::sync::Arc;

/// @ai:intent What a session executes and how often
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub invocation: RunInvocation,
    /// Measured invocations
    pub runs: u32,
    /// Unmeasured discovery run before the measured ones
    pub warmup: bool,
}

impl SessionPlan {
    /// @ai:intent Derive the plan from configuration
    /// @ai:effects pure
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self {
            invocation: RunInvocation::new(
                config.program.command_line(),
                config.run.disable_extensions,
            ),
            runs: config.run.runs,
            warmup: config.run.warmup,
        }
    }
}

/// @ai:intent Progress notifications emitted while a session runs
#[derive(Debug)]
pub enum SessionEvent<'a> {
    WarmupStarted,
    WarmupFinished { state: &'a AggregateState },
    RunStarted { index: u32, total: u32 },
    RunFinished { index: u32, total: u32, result: &'a RunResult },
}

/// @ai:intent Final state of a completed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub state: AggregateState,
    /// Including the discovery run
    pub invocations: u32,
}

/// @ai:intent Drives the external program run by run; aborts on the first failure
pub struct BenchmarkSession<R: ProcessRunnerTrait> {
    runner: Arc<R>,
    parser: OutputParser,
    aggregator: MetricsAggregator,
    plan: SessionPlan,
}

impl<R: ProcessRunnerTrait> BenchmarkSession<R> {
    /// @ai:intent Create a session with fresh state
    /// @ai:effects pure
    pub fn new(runner: Arc<R>, plan: SessionPlan) -> Self {
        Self {
            runner,
            parser: OutputParser::new(),
            aggregator: MetricsAggregator::new(),
            plan,
        }
    }

    /// @ai:intent Run one invocation and absorb its facts
    /// @ai:effects io
    async fn invoke(&mut self, index: u32) -> Result<RunResult> {
        let result = self
            .runner
            .run(&self.plan.invocation)
            .await
            .map_err(|e| e.in_run(index))?;

        if result.exit_status != 0 {
            tracing::warn!(
                "Invocation {} exited with status {}",
                index,
                result.exit_status
            );
        }

        let facts = self
            .parser
            .parse(&result.raw_output)
            .map_err(|e| e.in_run(index))?;

        tracing::debug!("Invocation {} produced {} facts", index, facts.len());
        self.aggregator.absorb(&facts);

        Ok(result)
    }

    /// @ai:intent Execute the whole plan without progress reporting
    /// @ai:effects io
    pub async fn run(self) -> Result<SessionOutcome> {
        self.run_with(|_| {}).await
    }

    /// @ai:intent Execute the plan: discovery run (untimed), then measured runs in order
    /// @ai:post runtimes.len() == plan.runs on success
    /// @ai:effects io
    pub async fn run_with<F>(mut self, mut on_event: F) -> Result<SessionOutcome>
    where
        F: FnMut(&SessionEvent<'_>),
    {
        let mut invocations = 0;
        let total = self.plan.runs;

        if self.plan.warmup {
            tracing::info!("Discovery run (time not recorded)");
            on_event(&SessionEvent::WarmupStarted);

            self.invoke(0).await?;
            invocations += 1;

            on_event(&SessionEvent::WarmupFinished {
                state: self.aggregator.state(),
            });
        }

        for index in 1..=total {
            tracing::info!("Run {} / {}", index, total);
            on_event(&SessionEvent::RunStarted { index, total });

            let result = self.invoke(index).await?;
            self.aggregator.record_runtime(result.elapsed_seconds);
            invocations += 1;

            on_event(&SessionEvent::RunFinished {
                index,
                total,
                result: &result,
            });
        }

        Ok(SessionOutcome {
            state: self.aggregator.into_state(),
            invocations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;
    use crate::report::ReportGenerator;
    use crate::runner::process::MockProcessRunner;
    use pretty_assertions::assert_eq;

    const FULL_OUTPUT: &str = "\
51784 tokens found
1703064 tokens found
Intersection tokens found: 424454
Intersection sets found: 202008
";

    const RESULT_ONLY: &str = "\
Intersection tokens found: 424454
Intersection sets found: 202008
";

    fn plan(runs: u32, warmup: bool) -> SessionPlan {
        SessionPlan {
            invocation: RunInvocation::new("./isect -i a -j b -o c", false),
            runs,
            warmup,
        }
    }

    #[tokio::test]
    async fn test_five_measured_runs() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(10.0, FULL_OUTPUT);
        for t in [11.0, 9.0, 10.5, 9.5] {
            mock.push_output(t, RESULT_ONLY);
        }

        let outcome = BenchmarkSession::new(mock.clone(), plan(5, false))
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.invocations, 5);
        assert_eq!(
            outcome.state,
            AggregateState {
                first_file_token_count: Some(51784),
                second_file_token_count: Some(1703064),
                latest_intersection_tokens: Some(424454),
                latest_intersection_sets: Some(202008),
                runtimes: vec![10.0, 11.0, 9.0, 10.5, 9.5],
            }
        );
    }

    #[tokio::test]
    async fn test_five_runs_summarize_to_throughput() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(10.0, FULL_OUTPUT);
        for t in [11.0, 9.0, 10.5, 9.5] {
            mock.push_output(t, RESULT_ONLY);
        }

        let outcome = BenchmarkSession::new(mock, plan(5, false))
            .run()
            .await
            .unwrap();
        let summary = ReportGenerator::summarize(&outcome.state).unwrap();

        assert_eq!(summary.run_count, 5);
        assert_eq!(summary.average_runtime, 10.0);
        assert_eq!(summary.min_runtime, 9.0);
        assert_eq!(summary.max_runtime, 11.0);
        assert_eq!(summary.operation_count, 88_191_466_176);
        assert_eq!(summary.operations_per_second, 88_191_466_176.0 / 10.0);
    }

    #[tokio::test]
    async fn test_warmup_time_is_not_recorded() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(99.0, FULL_OUTPUT);
        mock.push_output(2.0, RESULT_ONLY);
        mock.push_output(4.0, RESULT_ONLY);

        let outcome = BenchmarkSession::new(mock.clone(), plan(2, true))
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.invocations, 3);
        assert_eq!(outcome.state.runtimes, vec![2.0, 4.0]);
        assert_eq!(outcome.state.first_file_token_count, Some(51784));
        assert_eq!(mock.invocations().len(), 3);
    }

    #[tokio::test]
    async fn test_every_run_uses_same_invocation() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(1.0, "");
        mock.push_output(1.0, "");

        let mut p = plan(2, false);
        p.invocation.extensions_disabled = true;

        BenchmarkSession::new(mock.clone(), p.clone()).run().await.unwrap();

        assert_eq!(mock.invocations(), vec![p.invocation.clone(), p.invocation]);
    }

    #[tokio::test]
    async fn test_launch_failure_aborts_with_index() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(1.0, FULL_OUTPUT);
        // nothing scripted for run 2: the mock reports a launch failure

        let err = BenchmarkSession::new(mock.clone(), plan(3, false))
            .run()
            .await
            .unwrap_err();

        match err {
            BenchError::RunFailed { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(*source, BenchError::LaunchFailure { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(mock.invocations().len(), 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_aborts_session() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(1.0, "1 tokens found\nIntersection sets found: many\n");
        mock.push_output(1.0, FULL_OUTPUT);

        let err = BenchmarkSession::new(mock.clone(), plan(2, false))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err.root(),
            BenchError::ExtractionFailure { line_number: 2, .. }
        ));
        assert_eq!(mock.invocations().len(), 1);
    }

    #[tokio::test]
    async fn test_progress_events() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(5.0, FULL_OUTPUT);
        mock.push_output(1.0, RESULT_ONLY);
        mock.push_output(2.0, RESULT_ONLY);

        let mut log = Vec::new();
        BenchmarkSession::new(mock, plan(2, true))
            .run_with(|event| {
                log.push(match event {
                    SessionEvent::WarmupStarted => "warmup".to_string(),
                    SessionEvent::WarmupFinished { state } => {
                        format!("tokens {:?}", state.first_file_token_count)
                    }
                    SessionEvent::RunStarted { index, total } => format!("start {index}/{total}"),
                    SessionEvent::RunFinished { index, result, .. } => {
                        format!("done {index} {}", result.elapsed_seconds)
                    }
                })
            })
            .await
            .unwrap();

        assert_eq!(
            log,
            vec![
                "warmup",
                "tokens Some(51784)",
                "start 1/2",
                "done 1 1",
                "start 2/2",
                "done 2 2",
            ]
        );
    }

    #[test]
    fn test_plan_from_config() {
        let mut config = BenchmarkConfig::default();
        config.program.binary = "./isect".to_string();
        config.run.runs = 7;
        config.run.disable_extensions = true;

        let plan = SessionPlan::from_config(&config);

        assert_eq!(plan.runs, 7);
        assert!(plan.warmup);
        assert!(plan.invocation.extensions_disabled);
        assert!(plan.invocation.command.starts_with("./isect -i "));
    }

    #[tokio::test]
    async fn test_zero_runs_only_discovers() {
        let mock = Arc::new(MockProcessRunner::new());
        mock.push_output(3.0, FULL_OUTPUT);

        let outcome = BenchmarkSession::new(mock, plan(0, true)).run().await.unwrap();

        assert_eq!(outcome.invocations, 1);
        assert!(outcome.state.runtimes.is_empty());
        assert_eq!(outcome.state.second_file_token_count, Some(1703064));
    }
}
