//! Scenario parsing from YAML/JSON.
//!
//! A scenario is the file-level boundary format: a list of decisions scored
//! by an external analyzer and/or the turns of a conversation. Dimension
//! keys are free-form tags here and are validated into [`MoralDimension`]s
//! when the scenario is turned into core types.
//!
//! ```yaml
//! decisions:
//!   - name: "Return the wallet"
//!     description: "Found a wallet and returned it"
//!     moral_scores:
//!       Harm/Care: 8
//!       fairness_reciprocity: 6
//!   - name: "User Input"
//!     signals:
//!       polarity: 0.4
//!       emotions: { joy: 0.7, fear: 0.1 }
//! conversation:
//!   - text: "I returned it"
//!     sentiment: 0.6
//!     emotions: { joy: 0.8 }
//!     moral_scores: { Harm/Care: 7 }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::context::ConversationContext;
use crate::decision::{Decision, DecisionError};
use crate::signals::{EmotionScores, MoralSignals};
use crate::types::MoralDimension;

/// Errors that can occur when loading a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Decision {index} ('{name}') is invalid: {source}")]
    Decision {
        index: usize,
        name: String,
        #[source]
        source: DecisionError,
    },

    #[error("Conversation turn {index} is invalid: {source}")]
    Turn {
        index: usize,
        #[source]
        source: DecisionError,
    },

    #[error("Scenario validation failed: {0}")]
    ValidationError(String),
}

/// One decision as written in a scenario file.
///
/// Scores come either as explicit `moral_scores` or as analyzer `signals`,
/// never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Dimension tag → raw score
    #[serde(default)]
    pub moral_scores: BTreeMap<String, f64>,

    /// Analyzer output to derive scores from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<MoralSignals>,
}

impl DecisionSpec {
    /// Build the decision this entry describes.
    pub fn to_decision(&self) -> Result<Decision, DecisionError> {
        match &self.signals {
            Some(signals) => signals.to_decision(&self.name, &self.description),
            None => Decision::from_tagged(
                &self.name,
                &self.description,
                self.moral_scores.iter().map(|(tag, score)| (tag, *score)),
            ),
        }
    }
}

/// One conversation turn as written in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSpec {
    pub text: String,

    #[serde(default)]
    pub sentiment: f64,

    /// Emotion → score, in the order written
    #[serde(default)]
    pub emotions: EmotionScores,

    /// Dimension tag → score
    #[serde(default)]
    pub moral_scores: BTreeMap<String, f64>,
}

impl TurnSpec {
    /// Parse the turn's dimension tags.
    fn dimension_scores(&self) -> Result<BTreeMap<MoralDimension, f64>, DecisionError> {
        let mut scores = BTreeMap::new();
        for (tag, score) in &self.moral_scores {
            let dimension: MoralDimension = tag.parse()?;
            if score.is_nan() {
                return Err(DecisionError::NanScore { dimension });
            }
            if scores.insert(dimension, *score).is_some() {
                return Err(DecisionError::DuplicateDimension(dimension));
            }
        }
        Ok(scores)
    }
}

/// A scenario document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub decisions: Vec<DecisionSpec>,

    #[serde(default)]
    pub conversation: Vec<TurnSpec>,
}

impl Scenario {
    /// Parse a scenario from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a scenario from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a scenario file, choosing the format by extension
    /// (`.json` is JSON, anything else YAML).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
        let scenario = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_yaml_file(path)?
        };

        tracing::debug!(
            path = %path.display(),
            decisions = scenario.decisions.len(),
            turns = scenario.conversation.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    /// Validate the scenario structure and every entry in it.
    fn validate(&self) -> Result<(), ScenarioError> {
        if self.decisions.is_empty() && self.conversation.is_empty() {
            return Err(ScenarioError::ValidationError(
                "scenario has neither decisions nor conversation".to_string(),
            ));
        }

        for (index, spec) in self.decisions.iter().enumerate() {
            if spec.signals.is_some() && !spec.moral_scores.is_empty() {
                return Err(ScenarioError::ValidationError(format!(
                    "decision {} ('{}') has both moral_scores and signals",
                    index, spec.name
                )));
            }
        }

        self.decisions()?;
        self.conversation()?;
        Ok(())
    }

    /// Build every decision in the scenario.
    pub fn decisions(&self) -> Result<Vec<Decision>, ScenarioError> {
        self.decisions
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.to_decision().map_err(|source| ScenarioError::Decision {
                    index,
                    name: spec.name.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Replay the conversation into a fresh context.
    pub fn conversation(&self) -> Result<ConversationContext, ScenarioError> {
        let mut context = ConversationContext::new();

        for (index, turn) in self.conversation.iter().enumerate() {
            if turn.sentiment.is_nan() {
                return Err(ScenarioError::ValidationError(format!(
                    "conversation turn {} has a NaN sentiment",
                    index
                )));
            }
            if let Some((emotion, _)) = turn.emotions.iter().find(|(_, score)| score.is_nan()) {
                return Err(ScenarioError::ValidationError(format!(
                    "conversation turn {} has a NaN score for emotion '{}'",
                    index, emotion
                )));
            }

            let scores = turn
                .dimension_scores()
                .map_err(|source| ScenarioError::Turn { index, source })?;
            context.add_message(
                turn.text.as_str(),
                turn.sentiment,
                turn.emotions.iter(),
                scores,
            );
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SCENARIO: &str = r#"
decisions:
  - name: "Return the wallet"
    description: "Found a wallet and returned it"
    moral_scores:
      Harm/Care: 8
      fairness_reciprocity: 6
  - name: "User Input"
    signals:
      polarity: 1.0
      emotions:
        joy: 0.5
conversation:
  - text: "I found a wallet"
    sentiment: 0.2
    emotions: { surprise: 0.6 }
  - text: "I returned it"
    sentiment: 0.6
    emotions: { joy: 0.8 }
    moral_scores: { Harm/Care: 7 }
"#;

    #[test]
    fn test_parse_valid_scenario() {
        let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();
        assert_eq!(scenario.decisions.len(), 2);
        assert_eq!(scenario.conversation.len(), 2);

        let decisions = scenario.decisions().unwrap();
        assert!((decisions[0].goodness() - 0.7).abs() < 1e-12);
        assert_eq!(decisions[0].dimension_score(MoralDimension::FairnessReciprocity), 6.0);
        // Signals score all five dimensions
        assert_eq!(decisions[1].moral_scores().len(), 5);
        assert!((decisions[1].goodness() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_conversation_replay() {
        let scenario = Scenario::from_yaml(VALID_SCENARIO).unwrap();
        let context = scenario.conversation().unwrap();
        let summary = context.summary();

        assert_eq!(summary.message_count, 2);
        assert!((summary.average_sentiment - 0.4).abs() < 1e-12);
        assert_eq!(summary.dominant_emotion.as_deref(), Some("joy"));
        assert_eq!(summary.moral_dimension_averages[&MoralDimension::HarmCare], 7.0);
    }

    #[test]
    fn test_unknown_dimension_reports_index_and_key() {
        let yaml = r#"
decisions:
  - name: "Fine"
    moral_scores: { Harm/Care: 1 }
  - name: "Broken"
    moral_scores: { Liberty/Oppression: 4 }
"#;
        let err = Scenario::from_yaml(yaml).unwrap_err();
        match err {
            ScenarioError::Decision { index, name, source } => {
                assert_eq!(index, 1);
                assert_eq!(name, "Broken");
                assert_eq!(source, DecisionError::InvalidDimension("Liberty/Oppression".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_conversation_tag() {
        let yaml = r#"
conversation:
  - text: "hi"
    moral_scores: { Sanctity: 2 }
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(result, Err(ScenarioError::Turn { index: 0, .. })));
    }

    #[test]
    fn test_nan_in_conversation_rejected() {
        let nan_sentiment = r#"
conversation:
  - text: "fine"
    sentiment: 0.1
  - text: "broken"
    sentiment: .nan
"#;
        let err = Scenario::from_yaml(nan_sentiment).unwrap_err();
        assert!(matches!(err, ScenarioError::ValidationError(_)));
        assert!(err.to_string().contains("turn 1"));

        let nan_emotion = r#"
conversation:
  - text: "broken"
    emotions: { joy: 0.2, fear: .nan }
"#;
        let err = Scenario::from_yaml(nan_emotion).unwrap_err();
        assert!(err.to_string().contains("'fear'"));

        let nan_score = r#"
conversation:
  - text: "broken"
    moral_scores: { Harm/Care: .nan }
"#;
        let result = Scenario::from_yaml(nan_score);
        assert!(matches!(
            result,
            Err(ScenarioError::Turn {
                index: 0,
                source: DecisionError::NanScore { dimension: MoralDimension::HarmCare },
            })
        ));
    }

    #[test]
    fn test_nan_decision_score_rejected() {
        let yaml = r#"
decisions:
  - name: "Broken"
    moral_scores: { Loyalty/Ingroup: .nan }
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(ScenarioError::Decision { source: DecisionError::NanScore { .. }, .. })
        ));
    }

    #[test]
    fn test_conversation_keeps_emotion_order() {
        let yaml = r#"
conversation:
  - text: "a"
    emotions: { trust: 0.5 }
  - text: "b"
    emotions: { joy: 0.5 }
"#;
        let summary = Scenario::from_yaml(yaml).unwrap().conversation().unwrap().summary();
        assert_eq!(summary.dominant_emotion.as_deref(), Some("trust"));
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let result = Scenario::from_yaml("decisions: []");
        assert!(matches!(result, Err(ScenarioError::ValidationError(_))));
    }

    #[test]
    fn test_scores_and_signals_conflict() {
        let yaml = r#"
decisions:
  - name: "Both"
    moral_scores: { Harm/Care: 1 }
    signals: { polarity: 0.5 }
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(result, Err(ScenarioError::ValidationError(_))));
    }

    #[test]
    fn test_missing_name_rejected() {
        let yaml = r#"
decisions:
  - name: ""
    moral_scores: { Harm/Care: 1 }
"#;
        let result = Scenario::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(ScenarioError::Decision { source: DecisionError::MissingField(_), .. })
        ));
    }

    #[test]
    fn test_json_scenario() {
        let json = r#"{
            "decisions": [
                { "name": "Json", "moral_scores": { "Purity/Sanctity": 20 } }
            ]
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        let decisions = scenario.decisions().unwrap();
        assert_eq!(decisions[0].dimension_score(MoralDimension::PuritySanctity), 10.0);
        assert_eq!(decisions[0].goodness(), 1.0);
    }
}
