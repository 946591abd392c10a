/*!
This modules gives a few tools to prettyprint the results of an evaluation, overall and for each
entity type.
*/
use crate::document::{Document, Sources};
use crate::entity::{Entities, SequenceWarning};
use crate::error::EvalError;
use crate::metrics::{entity_results, token_results, MatchMode, Results};
use crate::token::{EntityType, Token};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Metrics of a single entity type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeMetrics {
    pub entity_type: EntityType,
    pub results: Results,
}

/// The report holds the token counts, the overall metrics and the metrics of each entity type
/// found in the gold annotation, for one `MatchMode`. It prettyprints itself in the format of the
/// CoNLL evaluation script:
///
/// ```text
/// processed 4 tokens with 2 phrases; found: 2 phrases; correct: 2.
/// accuracy: 100.00%; precision: 100.00%; recall: 100.00%; FB1: 100.00
///          location: precision: 100.00%; recall: 100.00%; FB1: 100.00  1
///            person: precision: 100.00%; recall: 100.00%; FB1: 100.00  1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub mode: MatchMode,
    /// Token level agreement. `tokens.gold` is the number of processed tokens.
    pub tokens: Results,
    /// Metrics over every tagged entity.
    pub overall: Results,
    /// One entry per entity type of the gold annotation, sorted alphabetically.
    pub types: Vec<TypeMetrics>,
}

impl Report {
    /// Scores a guessed annotation against the gold annotation.
    ///
    /// * `gold_tokens`, `guess_tokens`: Every token of the document.
    /// * `gold`, `guess`: Every entity of the document, untagged runs included.
    /// * `mode`: How entities are matched.
    pub fn new(
        gold_tokens: &[Token],
        guess_tokens: &[Token],
        gold: &Entities,
        guess: &Entities,
        mode: MatchMode,
    ) -> Self {
        let gold_tagged = gold.tagged();
        let guess_tagged = guess.tagged();
        let types = gold_tagged
            .entity_types()
            .into_iter()
            .map(|entity_type| TypeMetrics {
                entity_type,
                results: entity_results(
                    &gold_tagged.of_type(entity_type),
                    &guess_tagged.of_type(entity_type),
                    mode,
                ),
            })
            .collect();
        Report {
            mode,
            tokens: token_results(gold_tokens, guess_tokens),
            overall: entity_results(&gold_tagged, &guess_tagged, mode),
            types,
        }
    }

    /// Token accuracy, as a percentage.
    pub fn accuracy(&self) -> f64 {
        if self.tokens.gold == 0 {
            0.0
        } else {
            100. * self.tokens.correct as f64 / self.tokens.gold as f64
        }
    }

    /// The report, line by line. The accuracy line is left out when no token was processed.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.types.len() + 2);
        lines.push(format!(
            "processed {} tokens with {} phrases; found: {} phrases; correct: {}.",
            self.tokens.gold, self.overall.gold, self.overall.guess, self.overall.correct
        ));
        if self.tokens.gold > 0 {
            lines.push(format!(
                "accuracy: {:6.2}%; precision: {:6.2}%; recall: {:6.2}%; FB1: {:6.2}",
                self.accuracy(),
                100. * self.overall.precision,
                100. * self.overall.recall,
                100. * self.overall.f1
            ));
        }
        for TypeMetrics {
            entity_type,
            results,
        } in self.types.iter()
        {
            lines.push(format!(
                "{:>17}: precision: {:6.2}%; recall: {:6.2}%; FB1: {:6.2}  {}",
                entity_type.as_str(),
                100. * results.precision,
                100. * results.recall,
                100. * results.f1,
                results.correct
            ));
        }
        lines
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?
        }
        Ok(())
    }
}

/// Both reports of a system: exact entity matching and surface form matching. The warnings
/// raised while segmenting are kept aside and are not part of the reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub entity: Report,
    pub surface_form: Report,
    #[serde(skip)]
    pub warnings: Vec<SequenceWarning>,
}

impl Evaluation {
    /// Scores the system in column `system` (counting from 1) of a parsed document.
    ///
    /// * `document`: The parsed document.
    /// * `entities`: The entities of the document, per source.
    /// * `warnings`: Warnings raised while segmenting the document.
    /// * `system`: The system to score. Other system columns are ignored.
    pub fn new(
        document: &Document,
        entities: &Sources<Entities>,
        warnings: Vec<SequenceWarning>,
        system: usize,
    ) -> Result<Self, EvalError> {
        let tokens = document.tokens();
        let empty = (Vec::new(), Entities::default());
        let (guess_tokens, guess_entities) = match (tokens.system(system), entities.system(system))
        {
            (Some(t), Some(e)) => (t, e),
            _ if tokens.gold.is_empty() => (&empty.0, &empty.1),
            _ => {
                return Err(EvalError::MissingSystem {
                    index: system,
                    available: document.n_systems(),
                })
            }
        };
        let report = |mode| {
            Report::new(
                &tokens.gold,
                guess_tokens,
                &entities.gold,
                guess_entities,
                mode,
            )
        };
        Ok(Evaluation {
            entity: report(MatchMode::Exact),
            surface_form: report(MatchMode::SurfaceForm),
            warnings,
        })
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "### {} F1-SCORES ###", self.entity.mode)?;
        write!(f, "{}", self.entity)?;
        writeln!(f)?;
        writeln!(f, "### {} F1-SCORES ###", self.surface_form.mode)?;
        write!(f, "{}", self.surface_form)
    }
}
