/*!
Assembles a whole document: sentences are split, lines parsed into tokens and tokens segmented
into entities, for the gold annotation and every system column.
*/
use crate::config::EvalConfig;
use crate::entity::{segment, Entities, SequenceWarning};
use crate::error::{EvalError, InvalidSequenceError};
use crate::sentence::get_sentences;
use crate::token::{parse_line, Token};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One value per annotation source: the gold annotation and the system submissions, in column
/// order. `systems[0]` is system 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sources<T> {
    pub gold: T,
    pub systems: Vec<T>,
}

impl<T> Sources<T> {
    /// Total number of sources. The gold source is always there, so this is at least 1.
    pub fn n_sources(&self) -> usize {
        self.systems.len() + 1
    }

    /// The system in column `index`, counting from 1.
    pub fn system(&self, index: usize) -> Option<&T> {
        index.checked_sub(1).and_then(|i| self.systems.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.gold).chain(self.systems.iter())
    }

    pub fn try_map<U, E, F>(&self, mut f: F) -> Result<Sources<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(Sources {
            gold: f(&self.gold)?,
            systems: self.systems.iter().map(f).collect::<Result<_, _>>()?,
        })
    }

    pub fn map<U, F>(&self, mut f: F) -> Sources<U>
    where
        F: FnMut(&T) -> U,
    {
        Sources {
            gold: f(&self.gold),
            systems: self.systems.iter().map(f).collect(),
        }
    }
}

impl<T: Default> Sources<T> {
    fn with_systems(n_systems: usize) -> Self {
        Sources {
            gold: T::default(),
            systems: (0..n_systems).map(|_| T::default()).collect(),
        }
    }
}

impl<T> Sources<Vec<T>> {
    /// Appends each source of `item` to the matching source of `self`. Both must have the same
    /// number of systems.
    fn push(&mut self, item: Sources<T>) {
        debug_assert_eq!(self.systems.len(), item.systems.len());
        self.gold.push(item.gold);
        for (column, value) in self.systems.iter_mut().zip(item.systems) {
            column.push(value);
        }
    }
}

/// Tokens of a parsed document, per source and per sentence. Every source covers every word of
/// every sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sentences: Sources<Vec<Vec<Token>>>,
}

impl Document {
    /// Parses the lines of a document.
    ///
    /// Only the gold column and the scored system column (`config.system`) have to be present
    /// on every line. System columns missing from some lines are dropped. The scored column
    /// missing from some lines but not all is an `InconsistentColumns` error.
    ///
    /// * `lines`: Raw lines. Blank lines separate sentences.
    /// * `config`: The delimiter and the scored system.
    pub fn parse<'a, I>(lines: I, config: &EvalConfig) -> Result<Self, EvalError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let required = config.system + 1;
        let mut columns: Option<(usize, usize)> = None;
        let mut first_short: Option<(usize, usize, usize)> = None;
        let mut has_scored = false;
        let mut parsed: Vec<Vec<Sources<Token>>> = Vec::new();
        for (sent_id, sentence) in get_sentences(lines).enumerate() {
            let mut words = Vec::with_capacity(sentence.len());
            for (word_id, line) in sentence.into_iter().enumerate() {
                let tokens = parse_line(line, sent_id, word_id, config.delimiter)?;
                let found = tokens.n_sources();
                columns = Some(columns.map_or((found, found), |(min, max)| {
                    (min.min(found), max.max(found))
                }));
                if found >= required {
                    has_scored = true;
                } else if first_short.is_none() {
                    first_short = Some((sent_id, word_id, found));
                }
                words.push(tokens);
            }
            parsed.push(words);
        }
        if let (true, Some((sent_id, word_id, found))) = (has_scored, first_short) {
            return Err(EvalError::InconsistentColumns {
                sent_id,
                word_id,
                expected: required,
                found,
            });
        }
        // Only the system columns present on every line are kept.
        let (n_systems, max_systems) = columns.map_or((0, 0), |(min, max)| (min - 1, max - 1));
        if max_systems > n_systems {
            debug!(
                "dropped {} system column(s) missing from some lines",
                max_systems - n_systems
            );
        }
        let mut sentences: Sources<Vec<Vec<Token>>> = Sources::with_systems(n_systems);
        for words in parsed {
            let mut sentence: Sources<Vec<Token>> = Sources::with_systems(n_systems);
            for mut tokens in words {
                tokens.systems.truncate(n_systems);
                sentence.push(tokens);
            }
            sentences.push(sentence);
        }
        debug!(
            "parsed {} sentences, {} gold tokens, {} system column(s)",
            sentences.gold.len(),
            sentences.gold.iter().map(Vec::len).sum::<usize>(),
            n_systems
        );
        Ok(Document { sentences })
    }

    /// Number of sentences, empty ones included.
    pub fn n_sentences(&self) -> usize {
        self.sentences.gold.len()
    }

    pub fn n_systems(&self) -> usize {
        self.sentences.systems.len()
    }

    /// The tokens per source and per sentence.
    pub fn sentences(&self) -> &Sources<Vec<Vec<Token>>> {
        &self.sentences
    }

    /// All the tokens of the document, per source.
    pub fn tokens(&self) -> Sources<Vec<Token>> {
        self.sentences
            .map(|sentences| sentences.iter().flatten().cloned().collect())
    }

    /// Segments every sentence of every source into entities. Sentences and sources are
    /// segmented independently; the first invalid sequence aborts the whole document.
    pub fn entities(
        &self,
    ) -> Result<(Sources<Entities>, Vec<SequenceWarning>), InvalidSequenceError> {
        let mut warnings = Vec::new();
        let entities = self.sentences.try_map(|sentences| {
            let mut entities = Vec::new();
            for (sent_id, tokens) in sentences.iter().enumerate() {
                let (sentence_entities, sentence_warnings) = segment(tokens)?;
                trace!(
                    "sentence {}: {} tokens, {} entities",
                    sent_id,
                    tokens.len(),
                    sentence_entities.len()
                );
                entities.extend(sentence_entities);
                warnings.extend(sentence_warnings);
            }
            Ok::<_, InvalidSequenceError>(Entities::from(entities))
        })?;
        Ok((entities, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Delimiter, EvalConfigBuilder};
    use crate::token::{EntityType, Prefix, Tag};

    fn parse(lines: &[&str]) -> Result<Document, EvalError> {
        Document::parse(lines.iter().copied(), &EvalConfig::default())
    }

    #[test]
    fn test_parse_document() {
        let document = parse(&[
            "Barack\tB-person\tB-person",
            "Obama\tI-person\tO",
            "",
            "Paris\tB-location\tB-location",
        ])
        .unwrap();
        assert_eq!(document.n_sentences(), 2);
        assert_eq!(document.n_systems(), 1);
        let tokens = document.tokens();
        assert_eq!(tokens.gold.len(), 3);
        assert_eq!(tokens.systems[0].len(), 3);
        assert_eq!(tokens.gold[2].sent_id(), 1);
        assert_eq!(tokens.gold[2].word_id(), 0);
        assert_eq!(tokens.systems[0][1].tag(), Tag::O);
    }

    #[test]
    fn test_empty_sentences_contribute_nothing() {
        let document = parse(&["", "a\tO\tO", "", "", "b\tO\tO", ""]).unwrap();
        assert_eq!(document.n_sentences(), 5);
        assert_eq!(document.tokens().gold.len(), 2);
        let (entities, warnings) = document.entities().unwrap();
        assert_eq!(entities.gold.len(), 2);
        assert_eq!(entities.systems[0].len(), 2);
        assert!(warnings.is_empty());
        // Sentence ids count the empty sentences.
        assert_eq!(entities.gold[1].sent_id(), 3);
    }

    #[test]
    fn test_empty_document() {
        let document = parse(&[]).unwrap();
        assert_eq!(document.n_sentences(), 1);
        assert_eq!(document.n_systems(), 0);
        let (entities, _) = document.entities().unwrap();
        assert!(entities.gold.is_empty());
    }

    #[test]
    fn test_inconsistent_columns() {
        let err = parse(&["a\tO\tO", "b\tO"]).unwrap_err();
        assert_eq!(
            err,
            EvalError::InconsistentColumns {
                sent_id: 0,
                word_id: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_extra_system_columns_are_dropped() {
        let document = parse(&["Paris\tB-location\tB-location", "is\tO\tO\tO"]).unwrap();
        assert_eq!(document.n_systems(), 1);
        let tokens = document.tokens();
        assert_eq!(tokens.systems[0].len(), 2);
        assert_eq!(tokens.systems[0][0].tag(), Tag::Entity(EntityType::Location));
    }

    #[test]
    fn test_scored_column_missing_from_first_line() {
        let config = EvalConfigBuilder::new().system(2).build();
        let err =
            Document::parse(vec!["a\tO\tO", "", "b\tO\tO\tO"], &config).unwrap_err();
        assert_eq!(
            err,
            EvalError::InconsistentColumns {
                sent_id: 0,
                word_id: 0,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_scored_column_missing_everywhere_is_not_inconsistent() {
        let config = EvalConfigBuilder::new().system(3).build();
        let document = Document::parse(vec!["a\tO\tO", "b\tO\tO\tO"], &config).unwrap();
        assert_eq!(document.n_systems(), 1);
    }

    #[test]
    fn test_invalid_sequence_aborts_the_document() {
        let previous = Token::try_new("Lady", "B-person", 0, 0).unwrap();
        let token = Token {
            sent_id: 0,
            word_id: 1,
            word: String::from("Gaga"),
            bio: Prefix::O,
            tag: Tag::Entity(EntityType::Person),
        };
        let fine = Token::try_new("Rome", "B-location", 1, 0).unwrap();
        let document = Document {
            sentences: Sources {
                gold: vec![vec![previous.clone(), token.clone()], vec![fine]],
                systems: vec![],
            },
        };
        let err = document.entities().unwrap_err();
        assert_eq!(err, InvalidSequenceError { previous, token });
        assert_eq!(
            EvalError::from(err.clone()),
            EvalError::InvalidSequence(err)
        );
    }

    #[test]
    fn test_format_error_propagates() {
        let err = parse(&["a\tO\tO", "", "Paris\tX-location\tO"]).unwrap_err();
        match err {
            EvalError::Format(e) => {
                assert_eq!(e.sent_id, 1);
                assert_eq!(e.word_id, 0);
                assert_eq!(e.tag, "X-location");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_sources_are_segmented_independently() {
        let document = parse(&[
            "New\tB-location\tB-location",
            "York\tI-location\tI-location",
            "City\tO\tI-location",
        ])
        .unwrap();
        let (entities, warnings) = document.entities().unwrap();
        assert!(warnings.is_empty());
        assert_eq!(entities.gold.tagged()[0].span(), 0..2);
        assert_eq!(entities.systems[0].tagged()[0].span(), 0..3);
        assert_eq!(
            entities.systems[0].entity_types().into_iter().collect::<Vec<_>>(),
            vec![EntityType::Location]
        );
    }

    #[test]
    fn test_whitespace_delimiter() {
        let config = EvalConfigBuilder::new()
            .delimiter(Delimiter::Whitespace)
            .build();
        let document = Document::parse(vec!["Paris B-location   O"], &config).unwrap();
        assert_eq!(document.n_systems(), 1);
    }

    #[test]
    fn test_sources_system_is_one_based() {
        let sources = Sources {
            gold: 0,
            systems: vec![1, 2],
        };
        assert_eq!(sources.system(0), None);
        assert_eq!(sources.system(1), Some(&1));
        assert_eq!(sources.system(2), Some(&2));
        assert_eq!(sources.system(3), None);
        assert_eq!(sources.n_sources(), 3);
        assert_eq!(sources.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
