//! The Decision value object.
//!
//! A decision is one scored act or statement. Its name, description, moral
//! scores and goodness are fixed at construction; to change a score, build a
//! new decision. The philosophical evaluation lives in a separate slot that
//! the evaluator fills (and may refill) afterwards.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::types::{first_max, MoralDimension, PhilosophicalScores, Philosophy};

/// Lowest score a dimension can hold.
pub const MIN_SCORE: f64 = -10.0;

/// Highest score a dimension can hold.
pub const MAX_SCORE: f64 = 10.0;

/// Errors that can occur when constructing a decision.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Invalid moral dimension: {0}")]
    InvalidDimension(String),

    #[error("Moral dimension scored more than once: {0}")]
    DuplicateDimension(MoralDimension),

    #[error("Score for {dimension} is NaN")]
    NanScore { dimension: MoralDimension },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// One scored act or statement.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    name: String,
    description: String,
    moral_scores: BTreeMap<MoralDimension, f64>,
    goodness: f64,
    philosophical_scores: PhilosophicalScores,
}

impl Decision {
    /// Build a decision from typed dimension scores.
    ///
    /// Scores outside [`MIN_SCORE`, `MAX_SCORE`] saturate at the nearest
    /// bound. NaN scores, duplicate dimensions and an empty name are
    /// rejected; nothing is built on error.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        scores: impl IntoIterator<Item = (MoralDimension, f64)>,
    ) -> Result<Self, DecisionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DecisionError::MissingField("name".to_string()));
        }

        let moral_scores = Self::validate_scores(scores)?;
        let goodness = Self::calculate_goodness(&moral_scores);

        Ok(Self {
            name,
            description: description.into(),
            moral_scores,
            goodness,
            philosophical_scores: PhilosophicalScores::new(),
        })
    }

    /// Build a decision from string-tagged scores, as produced by an external
    /// analyzer or read from a file.
    ///
    /// The first key that is not a moral dimension fails the whole call with
    /// [`DecisionError::InvalidDimension`] naming that key.
    pub fn from_tagged<K: AsRef<str>>(
        name: impl Into<String>,
        description: impl Into<String>,
        scores: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, DecisionError> {
        let typed = scores
            .into_iter()
            .map(|(tag, score)| {
                tag.as_ref()
                    .parse::<MoralDimension>()
                    .map(|dimension| (dimension, score))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(name, description, typed)
    }

    fn validate_scores(
        scores: impl IntoIterator<Item = (MoralDimension, f64)>,
    ) -> Result<BTreeMap<MoralDimension, f64>, DecisionError> {
        let mut validated = BTreeMap::new();

        for (dimension, score) in scores {
            if score.is_nan() {
                return Err(DecisionError::NanScore { dimension });
            }

            let clamped = score.clamp(MIN_SCORE, MAX_SCORE);
            if clamped != score {
                tracing::debug!(dimension = %dimension, raw = score, clamped, "Score saturated");
            }

            if validated.insert(dimension, clamped).is_some() {
                return Err(DecisionError::DuplicateDimension(dimension));
            }
        }

        Ok(validated)
    }

    /// Mean score as a fraction of the maximum, bounded to [-1, 1].
    fn calculate_goodness(scores: &BTreeMap<MoralDimension, f64>) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }

        let total: f64 = scores.values().sum();
        let max_possible = MAX_SCORE * scores.len() as f64;
        (total / max_possible).clamp(-1.0, 1.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Only the dimensions that were scored, in canonical order.
    pub fn moral_scores(&self) -> &BTreeMap<MoralDimension, f64> {
        &self.moral_scores
    }

    /// Aggregate moral valence in [-1, 1].
    pub fn goodness(&self) -> f64 {
        self.goodness
    }

    /// Score for one dimension; 0 if the dimension was not scored.
    pub fn dimension_score(&self, dimension: MoralDimension) -> f64 {
        self.moral_scores.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Highest-scoring dimension, `None` for an unscored decision. Ties go
    /// to the earlier dimension in canonical order.
    pub fn dominant_dimension(&self) -> Option<(MoralDimension, f64)> {
        first_max(self.moral_scores.iter().map(|(dimension, score)| (*dimension, *score)))
    }

    pub fn philosophical_scores(&self) -> &PhilosophicalScores {
        &self.philosophical_scores
    }

    /// Record an evaluation, replacing any earlier one.
    pub fn set_philosophical_scores(&mut self, scores: PhilosophicalScores) {
        self.philosophical_scores = scores;
    }

    /// Recorded score for one philosophy; 0 if none was recorded.
    pub fn philosophical_score(&self, philosophy: Philosophy) -> f64 {
        self.philosophical_scores.get(philosophy)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decision: {} (Goodness: {:.2})", self.name, self.goodness)
    }
}
