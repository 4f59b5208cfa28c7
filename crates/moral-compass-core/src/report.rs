//! Compass report: the structured result of analyzing one decision.
//!
//! A report snapshots the decision's scores, its philosophical evaluation
//! and the blended compass direction, stamped with the time of evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use crate::compass::{blended_goodness, decision_angle};
use crate::config::BlendWeights;
use crate::decision::Decision;
use crate::types::{MoralDimension, PhilosophicalScores};

/// Result of analyzing a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompassReport {
    pub name: String,

    pub description: String,

    /// Aggregate goodness in [-1, 1]
    pub goodness: f64,

    /// Scored dimensions only
    pub moral_scores: BTreeMap<MoralDimension, f64>,

    /// Highest-scoring dimension, if any was scored
    pub dominant_dimension: Option<MoralDimension>,

    /// Score under each philosophy
    pub philosophical_evaluation: PhilosophicalScores,

    /// Goodness blended with the mean philosophy score
    pub combined_goodness: f64,

    /// Compass angle of the blended goodness, in radians (0 = north)
    pub direction: f64,

    /// When the evaluation occurred
    pub evaluated_at: DateTime<Utc>,
}

impl CompassReport {
    /// Snapshot an evaluated decision.
    ///
    /// Uses whatever evaluation is recorded on the decision; run the
    /// compendium's `evaluate_into` first.
    pub fn from_decision(
        decision: &Decision,
        blend: &BlendWeights,
        evaluated_at: DateTime<Utc>,
    ) -> Self {
        let evaluation = decision.philosophical_scores().clone();
        let combined_goodness = blended_goodness(decision.goodness(), &evaluation, blend);

        Self {
            name: decision.name().to_string(),
            description: decision.description().to_string(),
            goodness: decision.goodness(),
            moral_scores: decision.moral_scores().clone(),
            dominant_dimension: decision.dominant_dimension().map(|(dimension, _)| dimension),
            philosophical_evaluation: evaluation,
            combined_goodness,
            direction: decision_angle(combined_goodness),
            evaluated_at,
        }
    }

    /// Plain-text rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "Moral Compass Report for: {}", self.name)?;
        writeln!(out, "Description: {}", self.description)?;
        writeln!(out)?;
        writeln!(out, "Overall Goodness: {:.2}", self.goodness)?;
        writeln!(out)?;
        writeln!(out, "Moral Dimension Scores:")?;
        for (dimension, score) in &self.moral_scores {
            writeln!(out, "  {}: {:.2}", dimension.label(), score)?;
        }
        writeln!(out)?;
        writeln!(out, "Philosophical Evaluation:")?;
        for (philosophy, score) in self.philosophical_evaluation.iter() {
            writeln!(out, "  {}: {:.2}", philosophy.tenet(), score)?;
        }
        Ok(())
    }
}

impl fmt::Display for CompassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compendium::PhilosophicalCompendium;
    use chrono::TimeZone;
    use std::f64::consts::PI;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 20, 10, 0, 0).unwrap()
    }

    fn evaluated(decision: &mut Decision) {
        PhilosophicalCompendium::new().evaluate_into(decision);
    }

    #[test]
    fn test_report_snapshots_decision() {
        let mut decision = Decision::new(
            "Return the wallet",
            "Found a wallet and returned it",
            [(MoralDimension::HarmCare, 8.0), (MoralDimension::FairnessReciprocity, 6.0)],
        )
        .unwrap();
        evaluated(&mut decision);

        let report = CompassReport::from_decision(&decision, &BlendWeights::default(), fixed_time());

        assert_eq!(report.name, "Return the wallet");
        assert!((report.goodness - 0.7).abs() < 1e-12);
        assert_eq!(report.moral_scores.len(), 2);
        assert_eq!(report.dominant_dimension, Some(MoralDimension::HarmCare));
        assert_eq!(report.philosophical_evaluation.len(), 5);
        assert_eq!(report.evaluated_at, fixed_time());

        let expected = 0.7 * 0.6 + report.philosophical_evaluation.mean() * 0.4;
        assert!((report.combined_goodness - expected).abs() < 1e-12);
        assert!((report.direction - PI * (1.0 - expected) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_text_layout() {
        let mut decision =
            Decision::new("Skip work", "Called in sick", [(MoralDimension::LoyaltyIngroup, -4.0)])
                .unwrap();
        evaluated(&mut decision);
        let text = CompassReport::from_decision(&decision, &BlendWeights::default(), fixed_time())
            .render_text();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Moral Compass Report for: Skip work");
        assert_eq!(lines[1], "Description: Called in sick");
        assert_eq!(lines[3], "Overall Goodness: -0.40");
        assert_eq!(lines[5], "Moral Dimension Scores:");
        assert_eq!(lines[6], "  Loyalty/Ingroup: -4.00");
        assert_eq!(lines[8], "Philosophical Evaluation:");
        assert_eq!(lines[9], "  Treat others as you would like to be treated: 0.80");
        // Care Ethics: 0.85 * (1 - 4/20) = 0.68
        assert_eq!(
            lines[13],
            "  Emphasize compassion, responsibility, and relationships: 0.68"
        );
    }

    #[test]
    fn test_unevaluated_decision_reports_empty_evaluation() {
        let decision = Decision::new("Raw", "", [(MoralDimension::HarmCare, 10.0)]).unwrap();
        let report = CompassReport::from_decision(&decision, &BlendWeights::default(), fixed_time());

        assert!(report.philosophical_evaluation.is_empty());
        assert_eq!(report.dominant_dimension, Some(MoralDimension::HarmCare));
        assert!((report.combined_goodness - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_report_serializes_with_labels() {
        let mut decision = Decision::new("Json", "", [(MoralDimension::HarmCare, 2.0)]).unwrap();
        evaluated(&mut decision);
        let report = CompassReport::from_decision(&decision, &BlendWeights::default(), fixed_time());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""Harm/Care":2.0"#));
        assert!(json.contains("Care Ethics"));
        assert!(json.contains("2025-12-20T10:00:00Z"));
    }
}
