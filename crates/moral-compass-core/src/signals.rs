//! Signal scoring: turns an external analyzer's output into dimension scores.
//!
//! The analyzer itself (sentiment polarity, emotion classification) lives
//! outside this crate. What it hands over is a polarity in [-1, 1] and a set
//! of emotion probabilities; this module applies fixed heuristics to them.
//!
//! | Dimension | Heuristic |
//! |-----------|-----------|
//! | Harm/Care | (joy - sadness - fear) × 10, clamped to [-10, 10] |
//! | Fairness/Reciprocity | (polarity + 1) × 5 |
//! | Loyalty/Ingroup | trust × 10 |
//! | Authority/Respect | 5 (text alone cannot tell) |
//! | Purity/Sanctity | (1 - disgust) × 10 |

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::decision::{Decision, DecisionError, MAX_SCORE, MIN_SCORE};
use crate::types::{first_max, MoralDimension};

/// Score assigned to Authority/Respect when nothing in the signals speaks to it.
pub const NEUTRAL_AUTHORITY_SCORE: f64 = 5.0;

/// Emotion name → score, in the order the emotions were first reported.
///
/// Serialized as a plain map; deserializing keeps the document's key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionScores(Vec<(String, f64)>);

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an emotion's score. A re-reported emotion keeps its first position.
    pub fn insert(&mut self, emotion: impl Into<String>, score: f64) {
        let emotion = emotion.into();
        match self.0.iter_mut().find(|(name, _)| *name == emotion) {
            Some(entry) => entry.1 = score,
            None => self.0.push((emotion, score)),
        }
    }

    /// Score of an emotion; 0 if it was not reported.
    pub fn get(&self, emotion: &str) -> f64 {
        self.0
            .iter()
            .find(|(name, _)| name == emotion)
            .map(|(_, score)| *score)
            .unwrap_or(0.0)
    }

    /// Iterate in first-reported order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest-scoring emotion. Ties go to the one reported first.
    pub fn dominant(&self) -> Option<&str> {
        first_max(self.iter()).map(|(emotion, _)| emotion)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (emotion, score) in iter {
            scores.insert(emotion, score);
        }
        scores
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EmotionScoresVisitor)
    }
}

struct EmotionScoresVisitor;

impl<'de> Visitor<'de> for EmotionScoresVisitor {
    type Value = EmotionScores;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of emotion names to scores")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut scores = EmotionScores::new();
        while let Some((emotion, score)) = access.next_entry::<String, f64>()? {
            scores.insert(emotion, score);
        }
        Ok(scores)
    }
}

/// Output of an external sentiment and emotion analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoralSignals {
    /// Sentiment polarity in [-1, 1]
    #[serde(default)]
    pub polarity: f64,

    /// Emotion name (lowercase) → probability
    #[serde(default)]
    pub emotions: EmotionScores,
}

impl MoralSignals {
    pub fn new(polarity: f64) -> Self {
        Self {
            polarity,
            emotions: EmotionScores::new(),
        }
    }

    /// Builder-style emotion setter.
    pub fn with_emotion(mut self, emotion: impl Into<String>, probability: f64) -> Self {
        self.emotions.insert(emotion.into(), probability);
        self
    }

    /// Probability of an emotion; 0 if the analyzer did not report it.
    pub fn emotion(&self, emotion: &str) -> f64 {
        self.emotions.get(emotion)
    }

    /// Most probable emotion. Ties go to the one the analyzer reported first.
    pub fn dominant_emotion(&self) -> Option<&str> {
        self.emotions.dominant()
    }

    /// Score all five dimensions.
    pub fn score_dimensions(&self) -> BTreeMap<MoralDimension, f64> {
        MoralDimension::ALL
            .into_iter()
            .map(|dimension| (dimension, self.score(dimension)))
            .collect()
    }

    fn score(&self, dimension: MoralDimension) -> f64 {
        match dimension {
            MoralDimension::HarmCare => {
                let care = self.emotion("joy") - self.emotion("sadness") - self.emotion("fear");
                (care * 10.0).clamp(MIN_SCORE, MAX_SCORE)
            }
            MoralDimension::FairnessReciprocity => (self.polarity + 1.0) * 5.0,
            MoralDimension::LoyaltyIngroup => self.emotion("trust") * 10.0,
            MoralDimension::AuthorityRespect => NEUTRAL_AUTHORITY_SCORE,
            MoralDimension::PuritySanctity => (1.0 - self.emotion("disgust")) * 10.0,
        }
    }

    /// Build a decision scored from these signals.
    pub fn to_decision(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Decision, DecisionError> {
        Decision::new(name, description, self.score_dimensions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_joy() {
        let signals = MoralSignals::new(0.0).with_emotion("joy", 1.0);
        let scores = signals.score_dimensions();

        assert_eq!(scores[&MoralDimension::HarmCare], 10.0);
        assert_eq!(scores[&MoralDimension::FairnessReciprocity], 5.0);
        assert_eq!(scores[&MoralDimension::LoyaltyIngroup], 0.0);
        assert_eq!(scores[&MoralDimension::AuthorityRespect], 5.0);
        assert_eq!(scores[&MoralDimension::PuritySanctity], 10.0);
    }

    #[test]
    fn test_distress_and_disgust() {
        let signals = MoralSignals::new(-1.0)
            .with_emotion("sadness", 0.5)
            .with_emotion("fear", 0.75)
            .with_emotion("disgust", 1.0)
            .with_emotion("trust", 0.25);
        let scores = signals.score_dimensions();

        // (0 - 0.5 - 0.75) * 10 = -12.5 clamps to -10
        assert_eq!(scores[&MoralDimension::HarmCare], -10.0);
        assert_eq!(scores[&MoralDimension::FairnessReciprocity], 0.0);
        assert_eq!(scores[&MoralDimension::LoyaltyIngroup], 2.5);
        assert_eq!(scores[&MoralDimension::PuritySanctity], 0.0);
    }

    #[test]
    fn test_no_emotions_still_scores_everything() {
        let scores = MoralSignals::default().score_dimensions();
        assert_eq!(scores.len(), 5);
        assert_eq!(scores[&MoralDimension::HarmCare], 0.0);
        assert_eq!(scores[&MoralDimension::PuritySanctity], 10.0);
    }

    #[test]
    fn test_dominant_emotion() {
        let signals = MoralSignals::new(0.2)
            .with_emotion("surprise", 0.3)
            .with_emotion("anger", 0.3)
            .with_emotion("neutral", 0.1);
        assert_eq!(signals.dominant_emotion(), Some("surprise"));
        assert_eq!(MoralSignals::default().dominant_emotion(), None);
    }

    #[test]
    fn test_emotion_order_survives_parsing() {
        let yaml = "polarity: 0.1\nemotions:\n  trust: 0.4\n  joy: 0.4\n  anger: 0.2\n";
        let signals: MoralSignals = serde_yaml::from_str(yaml).unwrap();

        let names: Vec<&str> = signals.emotions.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["trust", "joy", "anger"]);
        assert_eq!(signals.dominant_emotion(), Some("trust"));

        let json = r#"{"emotions": {"joy": 0.4, "trust": 0.4}}"#;
        let signals: MoralSignals = serde_json::from_str(json).unwrap();
        assert_eq!(signals.dominant_emotion(), Some("joy"));
        assert_eq!(signals.polarity, 0.0);
    }

    #[test]
    fn test_reported_emotion_keeps_position() {
        let mut emotions: EmotionScores = [("fear", 0.2), ("joy", 0.5)].into_iter().collect();
        emotions.insert("fear", 0.5);

        assert_eq!(emotions.len(), 2);
        assert_eq!(emotions.get("fear"), 0.5);
        assert_eq!(emotions.get("anger"), 0.0);
        assert_eq!(emotions.dominant(), Some("fear"));
        assert_eq!(serde_json::to_string(&emotions).unwrap(), r#"{"fear":0.5,"joy":0.5}"#);
    }

    #[test]
    fn test_to_decision() {
        let signals = MoralSignals::new(1.0).with_emotion("joy", 0.5);
        let decision = signals.to_decision("User Input", "What a lovely day").unwrap();

        // Harm 5, Fairness 10, Loyalty 0, Authority 5, Purity 10 => 30 / 50
        assert!((decision.goodness() - 0.6).abs() < 1e-12);
        assert_eq!(decision.description(), "What a lovely day");
    }
}
