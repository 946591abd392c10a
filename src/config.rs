/*
 * This modules contains the `EvalConfig` struct, which implements the default trait, and its
 * builder. The config can be passed to the `evaluate_conf` function to pick the scored system
 * column and the field delimiter of the input.
*/
use either::Either;
use std::fmt::Display;
use std::str::{FromStr, Split, SplitWhitespace};
use thiserror::Error;

/// How the fields of an annotation line are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Delimiter {
    /// A single tab character between each field. Words may contain spaces.
    #[default]
    Tab,
    /// Any run of whitespace between fields.
    Whitespace,
}

impl Delimiter {
    pub(crate) fn split<'a>(&self, line: &'a str) -> Either<Split<'a, char>, SplitWhitespace<'a>> {
        match self {
            Self::Tab => Either::Left(line.split('\t')),
            Self::Whitespace => Either::Right(line.split_whitespace()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Impossible to parse the string ({0}) into a Delimiter")]
pub struct DelimiterParsingError(String);

impl FromStr for Delimiter {
    type Err = DelimiterParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "\t" => Ok(Self::Tab),
            "whitespace" | "space" => Ok(Self::Whitespace),
            _ => Err(DelimiterParsingError(String::from(s))),
        }
    }
}

impl Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tab => write!(f, "tab"),
            Self::Whitespace => write!(f, "whitespace"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
/// Config struct used to simplify the inputs of `evaluate_conf`. It implements the default
/// trait: score the first system column of a tab separated input.
pub struct EvalConfig {
    /// 1-based index of the system column to score.
    pub(crate) system: usize,
    pub(crate) delimiter: Delimiter,
}

impl EvalConfig {
    pub fn system(&self) -> usize {
        self.system
    }
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            system: 1,
            delimiter: Delimiter::Tab,
        }
    }
}

impl Display for EvalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scored system column: {}\nField delimiter: {}",
            self.system, self.delimiter
        )
    }
}

impl From<EvalConfigBuilder> for EvalConfig {
    fn from(value: EvalConfigBuilder) -> Self {
        Self {
            system: value.system,
            delimiter: value.delimiter,
        }
    }
}

/// This builder can be used to build and customize an `EvalConfig` structure.
#[derive(Debug, Clone)]
pub struct EvalConfigBuilder {
    system: usize,
    delimiter: Delimiter,
}

impl Default for EvalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalConfigBuilder {
    pub fn system(mut self, system: usize) -> Self {
        self.system = system;
        self
    }
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
    pub fn new() -> Self {
        let EvalConfig { system, delimiter } = EvalConfig::default();
        Self { system, delimiter }
    }
    pub fn build(self) -> EvalConfig {
        EvalConfig::from(self)
    }
}
