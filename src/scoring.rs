//! Guess scoring and the `e:<exact>:p:<partial>` result format.
//!
//! The partial count is deliberately generous: for every answer digit that
//! is not an exact match, it counts each occurrence of that digit anywhere
//! in the guess. Repeated guess digits are counted repeatedly and nothing is
//! paired off, so this is not the classic one-peg-per-digit Mastermind rule.
//! Stored results and clients depend on these numbers, so the rule must not
//! be "fixed".

use std::fmt;
use std::str::FromStr;

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, instrument};

/// Exact and partial match counts for one guess against one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Getters)]
pub struct MatchResult {
    /// Positions where the guess digit equals the answer digit.
    exact: usize,
    /// Generous partial count, see the module docs.
    partial: usize,
}

impl MatchResult {
    /// Creates a result from raw counts.
    pub fn new(exact: usize, partial: usize) -> Self {
        Self { exact, partial }
    }

    /// Returns `true` when every position of an answer of `answer_len`
    /// characters matched exactly.
    pub fn is_full_match(&self, answer_len: usize) -> bool {
        self.exact == answer_len
    }

    /// Parses the `e:<exact>:p:<partial>` form.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreParseError`] if the tags, field count or numbers are
    /// malformed.
    #[instrument(skip(text), fields(text = %text))]
    pub fn parse(text: &str) -> Result<Self, ScoreParseError> {
        let fields: Vec<&str> = text.split(':').collect();
        let [exact_tag, exact, partial_tag, partial] = fields.as_slice() else {
            return Err(ScoreParseError::FieldCount(fields.len()));
        };

        if *exact_tag != "e" {
            return Err(ScoreParseError::Tag((*exact_tag).to_string()));
        }
        if *partial_tag != "p" {
            return Err(ScoreParseError::Tag((*partial_tag).to_string()));
        }

        let exact = exact
            .parse()
            .map_err(|_| ScoreParseError::Count((*exact).to_string()))?;
        let partial = partial
            .parse()
            .map_err(|_| ScoreParseError::Count((*partial).to_string()))?;

        Ok(Self { exact, partial })
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e:{}:p:{}", self.exact, self.partial)
    }
}

impl FromStr for MatchResult {
    type Err = ScoreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Error raised when a serialized match result cannot be read back.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ScoreParseError {
    /// Wrong number of `:`-separated fields.
    #[display("Expected 4 fields in match result, found {}", _0)]
    FieldCount(usize),

    /// A tag other than `e` or `p` in a tag position.
    #[display("Unexpected match result tag '{}'", _0)]
    Tag(String),

    /// A count that is not a non-negative integer.
    #[display("Invalid match count '{}'", _0)]
    Count(String),
}

impl std::error::Error for ScoreParseError {}

/// Scores `guess` against `answer`.
///
/// Callers are expected to reject guesses whose length differs from the
/// answer first. If they do not, positions past the end of the guess simply
/// never match.
#[instrument(skip(guess, answer), fields(len = answer.len()))]
pub fn score(guess: &str, answer: &str) -> MatchResult {
    let guess: Vec<char> = guess.chars().collect();
    let mut result = MatchResult::default();

    for (i, digit) in answer.chars().enumerate() {
        if guess.get(i) == Some(&digit) {
            result.exact += 1;
        } else {
            result.partial += guess.iter().filter(|&&g| g == digit).count();
        }
    }

    debug!(exact = result.exact, partial = result.partial, "Guess scored");
    result
}
