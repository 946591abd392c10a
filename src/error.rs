/*!
Error types shared by the parser, the segmenter and the evaluation entry points. Every fatal
failure ends up in an `EvalError`; recovered tag sequences are not errors and live in
`entity::SequenceWarning`.
*/
use crate::token::{Prefix, Tag, Token};
use thiserror::Error;

/// Could not parse a single tag field into a `Prefix` and a `Tag`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    #[error("unknown BIO prefix `{0}`")]
    Prefix(String),
    #[error("unknown entity type `{0}`")]
    EntityType(String),
    #[error("no `-` between the BIO prefix and the entity type")]
    MissingDelimiter,
    #[error("prefix `{0}` cannot be paired with tag `{1}`")]
    Mismatch(Prefix, Tag),
    #[error("the line has no gold tag column")]
    MissingTag,
}

/// A tag field failed validation. Carries the word, the raw tag and its position so that the
/// offending line can be found in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tag `{tag}` for word `{word}` (sentence {sent_id}, word {word_id}): {source}")]
pub struct FormatError {
    pub word: String,
    pub tag: String,
    pub sent_id: usize,
    pub word_id: usize,
    pub source: ParsingError,
}

/// The segmenter reached a transition that validated tokens cannot produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tag sequence: {previous} => {token}")]
pub struct InvalidSequenceError {
    pub previous: Token,
    pub token: Token,
}

/// Enum error encompassing every failure that aborts an evaluation. There is no partial result:
/// the first error stops the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    InvalidSequence(#[from] InvalidSequenceError),
    /// The scored system column is on some lines but not on this one. `expected` and `found`
    /// count tag columns, gold included.
    #[error(
        "scored system column missing (sentence {sent_id}, word {word_id}): expected {expected} tag columns, found {found}"
    )]
    InconsistentColumns {
        sent_id: usize,
        word_id: usize,
        expected: usize,
        found: usize,
    },
    #[error("system {index} is not in the input, which has {available} system column(s)")]
    MissingSystem { index: usize, available: usize },
}
