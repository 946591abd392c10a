/*!
This library evaluates named entity recognition output in the style of the W-NUT'17 emerging
entities shared task. It reads a document in the CoNLL column format, where each line holds a word,
its gold label and the label of one or more systems, and scores a system twice: once on exact
entities and once on surface forms.

# FORMAT
Each line holds a word and then one label per source, separated by tabs (or by whitespace, see
`Delimiter`). The first label is the gold annotation. Blank lines separate sentences.

```text
Barack	B-person	B-person
Obama	I-person	O
visited	O	O
Paris	B-location	B-location
```

Labels follow the BIO scheme: `O` is outside an entity, `B-<type>` begins an entity and
`I-<type>` continues it. The entity types are `corporation`, `creative-work`, `group`,
`location`, `person` and `product`.

# Terminology
* An entity is a maximal run of words sharing a tag inside a sentence. Runs of `O` words are
  entities too, one per word, but they are never scored.
* Exact matching compares entities by position: sentence, span and tag must all agree.
* Surface form matching compares entities by their words and tag, ignoring where they occur.
  Two identical mentions of the same entity count once.
* An invalid sequence, such as an `I` following an `O`, is recovered by starting a new entity and
  is reported as a `SequenceWarning`.
*/

mod config;
mod document;
mod entity;
mod error;
mod metrics;
mod reporter;
mod sentence;
mod token;

// The public api starts here
pub use config::{Delimiter, DelimiterParsingError, EvalConfig, EvalConfigBuilder};

pub use document::{Document, Sources};

pub use entity::{
    segment, Entities, Entity, ExactKey, PhraseKey, Segmentation, SequenceWarning, SurfaceKey,
};

pub use error::{EvalError, FormatError, InvalidSequenceError, ParsingError};

pub use metrics::{
    confusion, entity_results, phrase_confusion, set_results, token_results, Confusion, MatchMode,
    MatchModeParsingError, Results,
};

pub use reporter::{Evaluation, Report, TypeMetrics};

pub use sentence::{get_sentences, Sentences};

pub use token::{parse_line, EntityType, Prefix, Tag, Token};

/// Main entrypoint of the library. Scores system 1 of the document against its gold annotation,
/// with tab separated columns. See `evaluate_conf` to pick another system or delimiter.
///
/// * `lines`: The lines of the document.
///
/// #Example
/// ```rust
/// use wnuteval::evaluate;
///
/// let lines = vec![
///     "Barack\tB-person\tB-person",
///     "Obama\tI-person\tI-person",
///     "visited\tO\tO",
///     "Paris\tB-location\tO",
/// ];
/// let evaluation = evaluate(lines).unwrap();
/// let expected_report = "processed 4 tokens with 2 phrases; found: 1 phrases; correct: 1.
/// accuracy:  75.00%; precision: 100.00%; recall:  50.00%; FB1:  66.67
///          location: precision:   0.00%; recall:   0.00%; FB1:   0.00  0
///            person: precision: 100.00%; recall: 100.00%; FB1: 100.00  1\n";
///
/// assert_eq!(expected_report, evaluation.entity.to_string());
/// ```
pub fn evaluate<'a, I>(lines: I) -> Result<Evaluation, EvalError>
where
    I: IntoIterator<Item = &'a str>,
{
    evaluate_conf(lines, &EvalConfig::default())
}

/// Scores the system selected by `config` against the gold annotation. Warnings raised while
/// segmenting are logged and returned in `Evaluation::warnings`.
///
/// * `lines`: The lines of the document.
/// * `config`: The system to score and the column delimiter.
///
/// #Example
/// ```rust
/// use wnuteval::{evaluate_conf, Delimiter, EvalConfigBuilder};
///
/// let lines = vec!["Paris B-location O B-location", "is O O O"];
/// let config = EvalConfigBuilder::default()
///     .system(2)
///     .delimiter(Delimiter::Whitespace)
///     .build();
/// let evaluation = evaluate_conf(lines, &config).unwrap();
/// assert_eq!(evaluation.entity.overall.correct, 1);
/// assert_eq!(evaluation.surface_form.overall.f1, 1.0);
/// ```
pub fn evaluate_conf<'a, I>(lines: I, config: &EvalConfig) -> Result<Evaluation, EvalError>
where
    I: IntoIterator<Item = &'a str>,
{
    let document = Document::parse(lines, config)?;
    let (entities, warnings) = document.entities()?;
    Evaluation::new(&document, &entities, warnings, config.system())
}
