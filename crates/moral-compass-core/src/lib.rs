//! # moral-compass-core
//!
//! Deterministic moral scoring and philosophical evaluation engine.
//!
//! This crate turns per-dimension moral scores into:
//! - a bounded goodness value for the decision,
//! - a score under each of five ethical philosophies,
//! - the geometry of a radial compass graphic.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same scores always produce the same evaluation
//! 2. **No text analysis**: Scores come from an external analyzer
//! 3. **Total**: Once a decision is built, evaluation and geometry cannot fail
//!
//! ## Example
//!
//! ```rust,ignore
//! use moral_compass_core::{analyze, CompassConfig, Decision, MoralDimension};
//!
//! let mut decision = Decision::new(
//!     "Return the wallet",
//!     "Found a wallet and returned it",
//!     [(MoralDimension::HarmCare, 8.0), (MoralDimension::FairnessReciprocity, 6.0)],
//! )?;
//! let report = analyze(&mut decision, &CompassConfig::default());
//! println!("{}", report);
//! ```

pub mod compass;
pub mod compendium;
pub mod config;
pub mod context;
pub mod decision;
pub mod report;
pub mod scenario;
pub mod signals;
pub mod types;

// Re-export main types at crate root
pub use compass::{
    arrow_tip, arrowhead, blended_goodness, decision_angle, dimension_angle, dimension_point,
    label_anchor, normalize_score, ArrowGeometry, AxisProjection, Canvas, CompassLayout, Point,
};
pub use compendium::PhilosophicalCompendium;
pub use config::{BlendWeights, CompassConfig, ConfigError, DeterminismConfig, GeometryConfig};
pub use context::{ContextSummary, ConversationContext};
pub use decision::{Decision, DecisionError, MAX_SCORE, MIN_SCORE};
pub use report::CompassReport;
pub use scenario::{DecisionSpec, Scenario, ScenarioError, TurnSpec};
pub use signals::{EmotionScores, MoralSignals};
pub use types::{MoralDimension, PhilosophicalScores, Philosophy};

use chrono::{DateTime, Utc};

/// Evaluate a decision and report on it.
///
/// The evaluation is recorded on the decision. The report is stamped with
/// `config.determinism.evaluated_at` when set, otherwise the current time;
/// use [`analyze_at`] to pass the timestamp explicitly.
pub fn analyze(decision: &mut Decision, config: &CompassConfig) -> CompassReport {
    let evaluated_at = config.determinism.evaluated_at.unwrap_or_else(Utc::now);
    analyze_at(decision, config, evaluated_at)
}

/// Evaluate a decision and report on it with an explicit timestamp.
///
/// Fully deterministic: same inputs always produce the same report.
pub fn analyze_at(
    decision: &mut Decision,
    config: &CompassConfig,
    evaluated_at: DateTime<Utc>,
) -> CompassReport {
    PhilosophicalCompendium::new().evaluate_into(decision);
    CompassReport::from_decision(decision, &config.blend, evaluated_at)
}

/// Build and analyze every decision in a scenario.
pub fn analyze_scenario_at(
    scenario: &Scenario,
    config: &CompassConfig,
    evaluated_at: DateTime<Utc>,
) -> Result<Vec<CompassReport>, ScenarioError> {
    let mut decisions = scenario.decisions()?;
    Ok(decisions
        .iter_mut()
        .map(|decision| analyze_at(decision, config, evaluated_at))
        .collect())
}


/// End-to-end tests across scoring, evaluation, geometry and context.
#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use chrono::TimeZone;

    const SCENARIO: &str = r#"
decisions:
  - name: "Return the wallet"
    description: "Found a wallet and returned it"
    moral_scores:
      Harm/Care: 8
      Fairness/Reciprocity: 9
      Loyalty/Ingroup: 2
      Authority/Respect: 5
      Purity/Sanctity: 6
  - name: "Keep the wallet"
    moral_scores:
      harm_care: -6
      fairness_reciprocity: -9
  - name: "Blank"
conversation:
  - text: "I found a wallet"
    sentiment: 0.2
    emotions: { surprise: 0.6 }
  - text: "I thought about keeping it"
    sentiment: -0.4
    emotions: { fear: 0.3, surprise: 0.1 }
    moral_scores: { Fairness/Reciprocity: -3 }
  - text: "I returned it"
    sentiment: 0.6
    emotions: { joy: 0.8 }
    moral_scores: { Fairness/Reciprocity: 9 }
"#;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 20, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_scenario_reports() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let reports =
            analyze_scenario_at(&scenario, &CompassConfig::default(), fixed_time()).unwrap();

        assert_eq!(reports.len(), 3);
        assert!((reports[0].goodness - 0.6).abs() < 1e-12);
        assert!((reports[1].goodness - -0.75).abs() < 1e-12);
        assert_eq!(reports[2].goodness, 0.0);

        // Every report evaluates every philosophy
        assert!(reports.iter().all(|r| r.philosophical_evaluation.len() == 5));

        // A better decision points further north
        assert!(reports[0].direction < reports[2].direction);
        assert!(reports[2].direction < reports[1].direction);
    }

    #[test]
    fn test_blank_decision_evaluates_to_base_weights() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let reports =
            analyze_scenario_at(&scenario, &CompassConfig::default(), fixed_time()).unwrap();

        let blank = &reports[2];
        for philosophy in Philosophy::ALL {
            assert!((blank.philosophical_evaluation.get(philosophy) - philosophy.base_weight()).abs() < 1e-12);
        }
        assert!(blank.moral_scores.is_empty());
        assert!(blank.dominant_dimension.is_none());
    }

    #[test]
    fn test_layouts_follow_goodness() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let config = CompassConfig::default();

        let layouts: Vec<CompassLayout> = scenario
            .decisions()
            .unwrap()
            .iter()
            .map(|decision| CompassLayout::project(decision, config.canvas, &config.geometry))
            .collect();

        // The arrow leans north (smaller y) for the good decision, south for the bad
        assert!(layouts[0].arrow.tip.y < layouts[0].center.y);
        assert!(layouts[1].arrow.tip.y > layouts[1].center.y);
        // Neutral arrow points east along the horizon
        assert!((layouts[2].arrow.tip.y - layouts[2].center.y).abs() < 1e-9);
    }

    #[test]
    fn test_conversation_summary() {
        let scenario = Scenario::from_yaml(SCENARIO).unwrap();
        let summary = scenario.conversation().unwrap().summary();

        assert_eq!(summary.message_count, 3);
        assert!((summary.average_sentiment - 0.4 / 3.0).abs() < 1e-12);
        // joy 0.8 beats surprise's 0.7 total and fear's 0.3
        assert_eq!(summary.dominant_emotion.as_deref(), Some("joy"));
        assert_eq!(summary.moral_dimension_averages[&MoralDimension::FairnessReciprocity], 3.0);
        assert_eq!(summary.moral_dimension_averages[&MoralDimension::HarmCare], 0.0);
    }
}
