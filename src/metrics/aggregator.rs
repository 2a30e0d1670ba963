//! @ai:module:intent Fold parsed facts and runtimes into the session state
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator
//! @ai:module:stateless false
//! @ai:module:thread_safe false

use crate::metrics::types::{AggregateState, TokenSlot};
use crate::output::ParsedFact;

/// @ai:intent Single-writer accumulator for one benchmark session
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    state: AggregateState,
}

impl MetricsAggregator {
    /// @ai:intent Create an aggregator with empty state
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Apply facts in the order received
    /// @ai:effects state:write
    pub fn absorb(&mut self, facts: &[ParsedFact]) {
        for fact in facts {
            match *fact {
                ParsedFact::TokenCount(v) => {
                    if self.state.observe_token_count(v) == TokenSlot::Ignored {
                        tracing::debug!("Ignoring token count {} (both files already known)", v);
                    }
                }
                ParsedFact::IntersectionTokenCount(v) => self.state.observe_intersection_tokens(v),
                ParsedFact::IntersectionSetCount(v) => self.state.observe_intersection_sets(v),
            }
        }
    }

    /// @ai:effects state:write
    pub fn record_runtime(&mut self, seconds: f64) {
        self.state.push_runtime(seconds);
    }

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn into_state(self) -> AggregateState {
        self.state
    }
}
