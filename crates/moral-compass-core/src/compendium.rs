//! Philosophical Compendium: evaluates a decision against each philosophy.
//!
//! Every philosophy starts from its constant base weight and is scaled by
//! the decision's scores on the dimensions that philosophy cares about:
//!
//! | Philosophy | Signal | Scale |
//! |------------|--------|-------|
//! | Golden Rule | Fairness/Reciprocity | 10 |
//! | Utilitarianism | Harm/Care | 10 |
//! | Kantian Ethics | Authority/Respect | 10 |
//! | Virtue Ethics | Purity/Sanctity | 10 |
//! | Care Ethics | Harm/Care + Loyalty/Ingroup | 20 |
//!
//! `score = base_weight * (1 + signal / scale)`
//!
//! The result is deliberately not clamped: a perfect score doubles the base
//! weight and a fully negative one drives it to zero.

use crate::decision::{Decision, MAX_SCORE};
use crate::types::{PhilosophicalScores, Philosophy};

/// Stateless evaluator holding the five base weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhilosophicalCompendium;

impl PhilosophicalCompendium {
    pub fn new() -> Self {
        Self
    }

    /// Base weight for a philosophy.
    pub fn base_weight(&self, philosophy: Philosophy) -> f64 {
        philosophy.base_weight()
    }

    /// Evaluate a decision against all five philosophies.
    ///
    /// Always returns one entry per philosophy, computed fresh from the
    /// decision's moral scores. The decision is not modified.
    pub fn evaluate(&self, decision: &Decision) -> PhilosophicalScores {
        let scores: PhilosophicalScores = Philosophy::ALL
            .into_iter()
            .map(|philosophy| (philosophy, self.evaluate_philosophy(philosophy, decision)))
            .collect();

        tracing::debug!(
            decision = %decision.name(),
            goodness = decision.goodness(),
            mean = scores.mean(),
            "Evaluated decision"
        );

        scores
    }

    /// Score a decision under a single philosophy.
    pub fn evaluate_philosophy(&self, philosophy: Philosophy, decision: &Decision) -> f64 {
        let dimensions = philosophy.dimensions();
        let signal: f64 = dimensions
            .iter()
            .map(|dimension| decision.dimension_score(*dimension))
            .sum();
        let scale = MAX_SCORE * dimensions.len() as f64;

        self.base_weight(philosophy) * (1.0 + signal / scale)
    }

    /// Evaluate a decision and record the result in its evaluation slot.
    pub fn evaluate_into<'a>(&self, decision: &'a mut Decision) -> &'a PhilosophicalScores {
        let scores = self.evaluate(decision);
        decision.set_philosophical_scores(scores);
        decision.philosophical_scores()
    }
}
