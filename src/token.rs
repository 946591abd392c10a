/*!
This modules parses the annotation lines into tokens. A line holds a word followed by one BIO tag
per source, the first one being the gold annotation.
*/
use crate::config::Delimiter;
use crate::document::Sources;
use crate::error::{FormatError, ParsingError};
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The BIO prefix of a tag. `O` is only ever paired with the `O` tag.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Sequence)]
pub enum Prefix {
    B,
    I,
    O,
}

impl FromStr for Prefix {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Self::B),
            "I" => Ok(Self::I),
            "O" => Ok(Self::O),
            _ => Err(ParsingError::Prefix(String::from(s))),
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The closed vocabulary of entity types. The variants are declared in alphabetical order of
/// their textual form, so the derived ordering sorts them the way the report lists them.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Sequence,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Corporation,
    CreativeWork,
    Group,
    Location,
    Person,
    Product,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corporation => "corporation",
            Self::CreativeWork => "creative-work",
            Self::Group => "group",
            Self::Location => "location",
            Self::Person => "person",
            Self::Product => "product",
        }
    }
}

impl FromStr for EntityType {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<EntityType>()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParsingError::EntityType(String::from(s)))
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type carried by a token or an entity: either one of the entity types or the `O` sentinel.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Tag {
    O,
    Entity(EntityType),
}

impl Tag {
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            Self::O => None,
            Self::Entity(t) => Some(*t),
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::O => f.write_str("O"),
            Self::Entity(t) => t.fmt(f),
        }
    }
}

/// One word's annotation, from one source, in one sentence.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub struct Token {
    pub(crate) sent_id: usize,
    pub(crate) word_id: usize,
    pub(crate) word: String,
    pub(crate) bio: Prefix,
    pub(crate) tag: Tag,
}

impl Token {
    /// Parses `bio_tag` (`O` or `BIO-type`) and builds the token.
    ///
    /// * `word`: Surface form of the word.
    /// * `bio_tag`: The raw tag field, such as `B-person` or `O`.
    /// * `sent_id`: Index of the sentence in the document.
    /// * `word_id`: Index of the word in the sentence.
    pub fn try_new<S: Into<String>>(
        word: S,
        bio_tag: &str,
        sent_id: usize,
        word_id: usize,
    ) -> Result<Self, FormatError> {
        let word = word.into();
        match parse_bio_tag(bio_tag).and_then(|(bio, tag)| check_pair(bio, tag)) {
            Ok((bio, tag)) => Ok(Token {
                sent_id,
                word_id,
                word,
                bio,
                tag,
            }),
            Err(source) => Err(FormatError {
                word,
                tag: String::from(bio_tag),
                sent_id,
                word_id,
                source,
            }),
        }
    }

    /// Builds a token from already validated parts. Used when projecting entities back to tokens.
    pub(crate) fn from_parts(
        sent_id: usize,
        word_id: usize,
        word: String,
        bio: Prefix,
        tag: Tag,
    ) -> Self {
        debug_assert!((bio == Prefix::O) == (tag == Tag::O));
        Token {
            sent_id,
            word_id,
            word,
            bio,
            tag,
        }
    }

    pub fn sent_id(&self) -> usize {
        self.sent_id
    }
    pub fn word_id(&self) -> usize {
        self.word_id
    }
    pub fn word(&self) -> &str {
        &self.word
    }
    pub fn bio(&self) -> Prefix {
        self.bio
    }
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The tag field as it appears in the input, e.g. `B-person` or `O`.
    pub fn label(&self) -> String {
        match self.tag {
            Tag::O => String::from("O"),
            Tag::Entity(t) => format!("{}-{}", self.bio, t),
        }
    }

    /// Renders the token as a CoNLL line: `word<TAB>label`.
    pub fn to_conll(&self) -> String {
        format!("{}\t{}", self.word, self.label())
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.sent_id,
            self.word_id,
            self.word,
            self.label()
        )
    }
}

fn parse_bio_tag(bio_tag: &str) -> Result<(Prefix, Tag), ParsingError> {
    if bio_tag == "O" {
        return Ok((Prefix::O, Tag::O));
    }
    let (bio, entity_type) = bio_tag
        .split_once('-')
        .ok_or(ParsingError::MissingDelimiter)?;
    Ok((bio.parse()?, Tag::Entity(entity_type.parse()?)))
}

fn check_pair(bio: Prefix, tag: Tag) -> Result<(Prefix, Tag), ParsingError> {
    if (bio == Prefix::O) == (tag == Tag::O) {
        Ok((bio, tag))
    } else {
        Err(ParsingError::Mismatch(bio, tag))
    }
}

/// Parses a non-blank line into the gold token and one token per system column.
///
/// * `line`: The raw line, `word<TAB>gold<TAB>sys_1...`
/// * `sent_id`: Index of the current sentence.
/// * `word_id`: Index of the current word in the sentence.
/// * `delimiter`: How the fields of the line are separated.
pub fn parse_line(
    line: &str,
    sent_id: usize,
    word_id: usize,
    delimiter: Delimiter,
) -> Result<Sources<Token>, FormatError> {
    let mut fields = delimiter.split(line.trim());
    let word = fields.next().unwrap_or_default();
    let gold = match fields.next() {
        Some(bio_tag) => Token::try_new(word, bio_tag, sent_id, word_id)?,
        None => {
            return Err(FormatError {
                word: String::from(word),
                tag: String::new(),
                sent_id,
                word_id,
                source: ParsingError::MissingTag,
            })
        }
    };
    let systems = fields
        .map(|bio_tag| Token::try_new(word, bio_tag, sent_id, word_id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Sources { gold, systems })
}
