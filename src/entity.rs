use crate::error::InvalidSequenceError;
use crate::token::{EntityType, Prefix, Tag, Token};
use ahash::AHashSet;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::mem::replace;
use std::ops::{Deref, Range};
use tracing::warn;

/// An entity is a maximal run of contiguous words sharing a tag, as annotated by one source. It
/// contains the words themselves, the sentence it belongs to, a start (inclusive) and a stop
/// (exclusive) word index and the tag. Runs of untagged words are entities too, with the `O`
/// tag, so that the entities of a sentence cover all of its words.
#[derive(Debug, Hash, Clone, PartialEq, Eq)]
pub struct Entity {
    pub(crate) words: Vec<String>,
    pub(crate) sent_id: usize,
    pub(crate) start: usize,
    pub(crate) stop: usize,
    pub(crate) tag: Tag,
}

impl Entity {
    fn from_token(token: &Token) -> Self {
        Entity {
            words: vec![token.word.clone()],
            sent_id: token.sent_id,
            start: token.word_id,
            stop: token.word_id + 1,
            tag: token.tag,
        }
    }

    fn push(&mut self, token: &Token) {
        self.words.push(token.word.clone());
        self.stop = token.word_id + 1;
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
    pub fn sent_id(&self) -> usize {
        self.sent_id
    }
    pub fn span(&self) -> Range<usize> {
        self.start..self.stop
    }
    pub fn tag(&self) -> Tag {
        self.tag
    }
    pub fn is_tagged(&self) -> bool {
        self.tag != Tag::O
    }

    /// Position sensitive identity: words, sentence, span and tag.
    pub fn exact_key(&self) -> ExactKey<'_> {
        ExactKey {
            words: &self.words,
            sent_id: self.sent_id,
            start: self.start,
            stop: self.stop,
            tag: self.tag,
        }
    }

    /// Position insensitive identity: the words and the tag.
    pub fn surface_key(&self) -> SurfaceKey<'_> {
        SurfaceKey {
            words: &self.words,
            tag: self.tag,
        }
    }

    /// The words only, regardless of the tag.
    pub fn phrase_key(&self) -> PhraseKey<'_> {
        PhraseKey(&self.words)
    }

    /// Projects the entity back into BIO tokens: `B` then `I` for a tagged entity, `O` for every
    /// word of an untagged one.
    pub fn to_tokens(&self) -> Vec<Token> {
        self.words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let bio = match (self.tag, i) {
                    (Tag::O, _) => Prefix::O,
                    (_, 0) => Prefix::B,
                    _ => Prefix::I,
                };
                Token::from_parts(self.sent_id, self.start + i, word.clone(), bio, self.tag)
            })
            .collect()
    }

    /// CoNLL lines of the tokens of the entity.
    pub fn to_conll(&self) -> Vec<String> {
        self.to_tokens().iter().map(Token::to_conll).collect()
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.sent_id,
            self.tag,
            self.start,
            self.stop,
            self.words.join(" ")
        )
    }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExactKey<'a> {
    words: &'a [String],
    sent_id: usize,
    start: usize,
    stop: usize,
    tag: Tag,
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurfaceKey<'a> {
    words: &'a [String],
    tag: Tag,
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PhraseKey<'a>(&'a [String]);

/// An `I` token continued an entity of another type. The token was read as the start of a new
/// entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceWarning {
    pub previous: Token,
    pub token: Token,
}

impl Display for SequenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid tag sequence: {} => {}", self.previous, self.token)
    }
}

/// Entities of a sentence, with the warnings raised while building them.
pub type Segmentation = (Vec<Entity>, Vec<SequenceWarning>);

/// Folds the tokens of a single sentence into entities. The entities are returned in order and
/// their spans partition the word positions of the sentence.
///
/// * `tokens`: The tokens of one sentence, from one source, in word order.
pub fn segment(tokens: &[Token]) -> Result<Segmentation, InvalidSequenceError> {
    let mut warnings = Vec::new();
    let Some(first) = tokens.first() else {
        return Ok((Vec::new(), warnings));
    };
    let mut entities = Vec::with_capacity(tokens.len());
    let mut current = Entity::from_token(first);
    for (previous, token) in tokens.iter().tuple_windows() {
        match (token.bio, token.tag) {
            (Prefix::I, tag) if tag == current.tag => current.push(token),
            (Prefix::B, _) | (Prefix::O, Tag::O) => {
                entities.push(replace(&mut current, Entity::from_token(token)));
            }
            // tag1 => I-tag2 is read as tag1 => B-tag2
            (Prefix::I, _) => {
                let warning = SequenceWarning {
                    previous: previous.clone(),
                    token: token.clone(),
                };
                warn!("{}", warning);
                warnings.push(warning);
                entities.push(replace(&mut current, Entity::from_token(token)));
            }
            _ => {
                return Err(InvalidSequenceError {
                    previous: previous.clone(),
                    token: token.clone(),
                })
            }
        }
    }
    entities.push(current);
    Ok((entities, warnings))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// The entities of a whole document, from one source, flattened across sentences.
pub struct Entities(Vec<Entity>);

impl Deref for Entities {
    type Target = Vec<Entity>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Entity>> for Entities {
    fn from(value: Vec<Entity>) -> Self {
        Entities(value)
    }
}

impl FromIterator<Entity> for Entities {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Entities(iter.into_iter().collect())
    }
}

impl IntoIterator for Entities {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Entities {
    /// Drops the runs of untagged words.
    pub fn tagged(&self) -> Entities {
        self.iter().filter(|e| e.is_tagged()).cloned().collect()
    }

    /// Keeps the entities of a single type.
    pub fn of_type(&self, entity_type: EntityType) -> Entities {
        let tag = Tag::Entity(entity_type);
        self.iter().filter(|e| e.tag == tag).cloned().collect()
    }

    /// The entity types present, in alphabetical order. `O` is not an entity type.
    pub fn entity_types(&self) -> BTreeSet<EntityType> {
        self.iter().filter_map(|e| e.tag.entity_type()).collect()
    }

    pub fn exact_keys(&self) -> AHashSet<ExactKey<'_>> {
        self.iter().map(Entity::exact_key).collect()
    }

    pub fn surface_keys(&self) -> AHashSet<SurfaceKey<'_>> {
        self.iter().map(Entity::surface_key).collect()
    }

    pub fn phrase_keys(&self) -> AHashSet<PhraseKey<'_>> {
        self.iter().map(Entity::phrase_key).collect()
    }
}
