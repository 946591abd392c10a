/*!
Set based scoring. Gold and guessed items are turned into sets, compared, and the sizes of the
sets give the precision, recall and f-score. Duplicate items collapse.
*/
use crate::entity::{Entities, Entity, PhraseKey};
use crate::token::Token;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;

/// How two entities are considered to be the same.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum MatchMode {
    /// Same words, sentence, span and tag.
    Exact,
    /// Same words and tag, wherever they occur. Each surface form counts once.
    SurfaceForm,
}

impl Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "ENTITY"),
            Self::SurfaceForm => write!(f, "SURFACE FORM"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
#[error("Impossible to parse the string ({0}) into a MatchMode")]
pub struct MatchModeParsingError(String);

impl FromStr for MatchMode {
    type Err = MatchModeParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "entity" => Ok(Self::Exact),
            "surface" | "surfaceform" | "surface_form" | "surface-form" => Ok(Self::SurfaceForm),
            _ => Err(MatchModeParsingError(String::from(s))),
        }
    }
}

/// Outcome of comparing a gold set with a guessed set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub gold: usize,
    pub guess: usize,
    pub correct: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Results {
    /// Derives the ratios from the counts. An empty denominator gives `0.0`.
    pub fn from_counts(gold: usize, guess: usize, correct: usize) -> Self {
        let precision = ratio(correct, guess);
        let recall = ratio(correct, gold);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Results {
            gold,
            guess,
            correct,
            precision,
            recall,
            f1,
        }
    }
}

#[inline]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// The four cells of a confusion table, as sets of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confusion<K: Hash + Eq> {
    pub true_positive: AHashSet<K>,
    pub false_positive: AHashSet<K>,
    pub false_negative: AHashSet<K>,
    pub true_negative: AHashSet<K>,
}

/// Computes the confusion sets of `gold` and `guess`. `universe` holds every item that could
/// have been guessed; only its items outside of the three other cells are true negatives.
pub fn confusion<K, G, P, U>(gold: G, guess: P, universe: U) -> Confusion<K>
where
    K: Hash + Eq + Clone,
    G: IntoIterator<Item = K>,
    P: IntoIterator<Item = K>,
    U: IntoIterator<Item = K>,
{
    let gold: AHashSet<K> = gold.into_iter().collect();
    let guess: AHashSet<K> = guess.into_iter().collect();
    let true_positive: AHashSet<K> = gold.intersection(&guess).cloned().collect();
    let false_positive: AHashSet<K> = guess.difference(&gold).cloned().collect();
    let false_negative: AHashSet<K> = gold.difference(&guess).cloned().collect();
    let true_negative = universe
        .into_iter()
        .filter(|k| {
            !true_positive.contains(k) && !false_positive.contains(k) && !false_negative.contains(k)
        })
        .collect();
    Confusion {
        true_positive,
        false_positive,
        false_negative,
        true_negative,
    }
}

/// Scores two sets of items.
pub fn set_results<K: Hash + Eq>(gold: &AHashSet<K>, guess: &AHashSet<K>) -> Results {
    let correct = gold.intersection(guess).count();
    Results::from_counts(gold.len(), guess.len(), correct)
}

/// Scores guessed entities against gold entities under `mode`.
pub fn entity_results(gold: &Entities, guess: &Entities, mode: MatchMode) -> Results {
    match mode {
        MatchMode::Exact => set_results(&gold.exact_keys(), &guess.exact_keys()),
        MatchMode::SurfaceForm => set_results(&gold.surface_keys(), &guess.surface_keys()),
    }
}

/// Token level agreement, `O` tokens included. `correct / gold` is the accuracy.
pub fn token_results(gold: &[Token], guess: &[Token]) -> Results {
    let gold: AHashSet<&Token> = gold.iter().collect();
    let guess: AHashSet<&Token> = guess.iter().collect();
    set_results(&gold, &guess)
}

/// Confusion over the word sequences of the entities. A phrase is a true positive only when
/// its entity is matched exactly; the other cells ignore tags and positions.
///
/// * `universe`: Every entity of the document (usually all the entities of every source).
pub fn phrase_confusion<'a>(
    gold: &'a Entities,
    guess: &'a Entities,
    universe: &'a Entities,
) -> Confusion<PhraseKey<'a>> {
    let guess_keys = guess.exact_keys();
    let true_positive: AHashSet<PhraseKey<'a>> = gold
        .iter()
        .filter(|e| guess_keys.contains(&e.exact_key()))
        .map(Entity::phrase_key)
        .collect();
    let false_positive: AHashSet<PhraseKey<'a>> = guess
        .phrase_keys()
        .into_iter()
        .filter(|k| !true_positive.contains(k))
        .collect();
    let false_negative: AHashSet<PhraseKey<'a>> = gold
        .phrase_keys()
        .into_iter()
        .filter(|k| !true_positive.contains(k))
        .collect();
    let true_negative = universe
        .phrase_keys()
        .into_iter()
        .filter(|k| {
            !true_positive.contains(k) && !false_positive.contains(k) && !false_negative.contains(k)
        })
        .collect();
    Confusion {
        true_positive,
        false_positive,
        false_negative,
        true_negative,
    }
}
