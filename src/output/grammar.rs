//! @ai:module:intent Line patterns describing the fact-carrying subset of program output
//! @ai:module:layer domain
//! @ai:module:public_api OutputGrammar, LinePattern, PatternKind, Extraction
//! @ai:module:stateless true

use crate::output::ParsedFact;
use regex::Regex;

/// @ai:intent Which fact a line pattern produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    TokensFound,
    IntersectionTokens,
    IntersectionSets,
}

impl PatternKind {
    /// @ai:intent Stable pattern name used in diagnostics
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::TokensFound => "TOKENS_FOUND",
            PatternKind::IntersectionTokens => "INTERSECTION_TOKENS",
            PatternKind::IntersectionSets => "INTERSECTION_SETS",
        }
    }

    /// @ai:intent Wrap an extracted number into the matching fact
    /// @ai:effects pure
    pub fn fact(&self, value: u64) -> ParsedFact {
        match self {
            PatternKind::TokensFound => ParsedFact::TokenCount(value),
            PatternKind::IntersectionTokens => ParsedFact::IntersectionTokenCount(value),
            PatternKind::IntersectionSets => ParsedFact::IntersectionSetCount(value),
        }
    }
}

/// @ai:intent Outcome of applying one pattern to a line whose label matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Fact(ParsedFact),
    /// Label present but the payload is not a plain unsigned integer
    Malformed,
}

/// @ai:intent Matcher whose first capture group is the numeric payload of the label
#[derive(Debug, Clone)]
pub struct LinePattern {
    kind: PatternKind,
    span: Regex,
}

impl LinePattern {
    /// @ai:intent Build a pattern from a span expression with one payload group
    /// @ai:pre span is a valid regex with exactly one capture group
    /// @ai:effects pure
    fn new(kind: PatternKind, span: &str) -> Self {
        Self {
            kind,
            span: Regex::new(span).expect("Invalid span regex"),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// @ai:intent Payload must be ASCII digits only and fit in u64
    /// @ai:effects pure
    fn parse_payload(payload: &str) -> Option<u64> {
        if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        payload.parse().ok()
    }

    /// @ai:intent Apply the pattern to one line
    /// @ai:post None when the label is absent; only the captured payload is read
    /// @ai:effects pure
    pub fn extract(&self, line: &str) -> Option<Extraction> {
        let captures = self.span.captures(line)?;
        let payload = captures.get(1).map_or("", |m| m.as_str());

        Some(match Self::parse_payload(payload) {
            Some(v) => Extraction::Fact(self.kind.fact(v)),
            None => Extraction::Malformed,
        })
    }
}

/// @ai:intent Ordered set of line patterns evaluated independently per line
#[derive(Debug, Clone)]
pub struct OutputGrammar {
    patterns: Vec<LinePattern>,
}

impl OutputGrammar {
    /// @ai:intent Grammar of the intersection program's stdout
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            patterns: vec![
                LinePattern::new(PatternKind::TokensFound, r"(\d+) tokens found"),
                // Whole token after the colon is captured, so a bad number is reported, not skipped
                LinePattern::new(
                    PatternKind::IntersectionTokens,
                    r"Intersection tokens found:\s*(\S*)",
                ),
                LinePattern::new(
                    PatternKind::IntersectionSets,
                    r"Intersection sets found:\s*(\S*)",
                ),
            ],
        }
    }

    pub fn patterns(&self) -> &[LinePattern] {
        &self.patterns
    }

    /// @ai:intent Apply every pattern to a line, in grammar order
    /// @ai:effects pure
    pub fn match_line(&self, line: &str) -> Vec<(PatternKind, Extraction)> {
        self.patterns
            .iter()
            .filter_map(|p| p.extract(line).map(|e| (p.kind(), e)))
            .collect()
    }
}

impl Default for OutputGrammar {
    fn default() -> Self {
        Self::new()
    }
}
