//! @ai:module:intent Turn captured stdout lines into an ordered list of facts
//! @ai:module:layer application
//! @ai:module:public_api OutputParser
//! @ai:module:depends_on grammar, error
//! @ai:module:stateless true

use crate::error::{BenchError, Result};
use crate::output::grammar::{Extraction, OutputGrammar};
use crate::output::ParsedFact;

/// @ai:intent Applies the output grammar line by line
#[derive(Debug, Clone, Default)]
pub struct OutputParser {
    grammar: OutputGrammar,
}

impl OutputParser {
    /// @ai:intent Create a parser over the standard grammar
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            grammar: OutputGrammar::new(),
        }
    }

    /// @ai:intent Create a parser over a custom grammar
    /// @ai:effects pure
    pub fn with_grammar(grammar: OutputGrammar) -> Self {
        Self { grammar }
    }

    /// @ai:intent Extract facts from lines, preserving line order then pattern order
    /// @ai:post unmatched lines contribute nothing
    /// @ai:effects pure
    pub fn parse<I, S>(&self, lines: I) -> Result<Vec<ParsedFact>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut facts = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();

            for (kind, extraction) in self.grammar.match_line(line) {
                match extraction {
                    Extraction::Fact(fact) => facts.push(fact),
                    Extraction::Malformed => {
                        tracing::error!(
                            "Pattern {} matched line {} without a number: {:?}",
                            kind.name(),
                            index + 1,
                            line
                        );
                        return Err(BenchError::ExtractionFailure {
                            pattern: kind.name(),
                            line_number: index + 1,
                            line: line.to_string(),
                        });
                    }
                }
            }
        }

        tracing::debug!("Extracted {} facts", facts.len());
        Ok(facts)
    }

    /// @ai:intent Parse a whole stdout blob split on newlines
    /// @ai:effects pure
    pub fn parse_text(&self, text: &str) -> Result<Vec<ParsedFact>> {
        self.parse(text.split('\n'))
    }
}
