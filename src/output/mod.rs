//! @ai:module:intent Recognize measurable facts in the benchmarked program's stdout
//! @ai:module:layer domain
//! @ai:module:public_api OutputGrammar, LinePattern, PatternKind, Extraction, OutputParser, ParsedFact

pub mod grammar;
pub mod parser;

pub use grammar::{Extraction, LinePattern, OutputGrammar, PatternKind};
pub use parser::OutputParser;

use serde::{Deserialize, Serialize};

/// @ai:intent A single structured value extracted from one output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedFact {
    /// "<n> tokens found", printed once per input file
    TokenCount(u64),
    IntersectionTokenCount(u64),
    IntersectionSetCount(u64),
}
