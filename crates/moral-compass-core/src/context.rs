//! Conversation context: rolling history of a conversation's turns.
//!
//! Trends are append-only. Emotion trends are created lazily the first time
//! an emotion is reported, so an emotion first seen on turn 3 has no entries
//! for turns 1 and 2 (not zeros). Averages are always taken over a trend's
//! own length, never over the turn count. Emotions are remembered in the
//! order they were first reported.
//!
//! Not synchronized; wrap in a mutex if several callers share one context.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{first_max, MoralDimension};

/// Accumulated trends for one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationContext {
    history: Vec<String>,
    sentiment_trend: Vec<f64>,
    emotion_trend: BTreeMap<String, Vec<f64>>,
    #[serde(skip)]
    emotion_order: Vec<String>,
    moral_dimension_trend: BTreeMap<MoralDimension, Vec<f64>>,
}

/// Read-only projection of a conversation's trends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub message_count: usize,

    /// Mean sentiment, 0 for an empty conversation
    pub average_sentiment: f64,

    /// Emotion with the greatest cumulative score
    pub dominant_emotion: Option<String>,

    /// Mean score per dimension; always all five, 0 when unscored
    pub moral_dimension_averages: BTreeMap<MoralDimension, f64>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            sentiment_trend: Vec::new(),
            emotion_trend: BTreeMap::new(),
            emotion_order: Vec::new(),
            moral_dimension_trend: MoralDimension::ALL
                .into_iter()
                .map(|dimension| (dimension, Vec::new()))
                .collect(),
        }
    }

    /// Record one turn of the conversation.
    pub fn add_message<'a>(
        &mut self,
        message: impl Into<String>,
        sentiment: f64,
        emotions: impl IntoIterator<Item = (&'a str, f64)>,
        moral_scores: impl IntoIterator<Item = (MoralDimension, f64)>,
    ) {
        self.history.push(message.into());
        self.sentiment_trend.push(sentiment);

        for (emotion, score) in emotions {
            if !self.emotion_trend.contains_key(emotion) {
                self.emotion_order.push(emotion.to_string());
            }
            self.emotion_trend
                .entry(emotion.to_string())
                .or_default()
                .push(score);
        }

        for (dimension, score) in moral_scores {
            self.moral_dimension_trend
                .entry(dimension)
                .or_default()
                .push(score);
        }

        tracing::trace!(
            turn = self.history.len(),
            sentiment,
            emotions = self.emotion_trend.len(),
            "Recorded conversation turn"
        );
    }

    /// Summarize the trends recorded so far.
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            message_count: self.history.len(),
            average_sentiment: mean(&self.sentiment_trend),
            dominant_emotion: self.dominant_emotion(),
            moral_dimension_averages: MoralDimension::ALL
                .into_iter()
                .map(|dimension| (dimension, mean(self.dimension_trend(dimension))))
                .collect(),
        }
    }

    /// Emotion with the greatest summed score. Ties go to the emotion
    /// reported first.
    fn dominant_emotion(&self) -> Option<String> {
        let totals = self
            .emotion_order
            .iter()
            .map(|emotion| (emotion, self.emotion_trend(emotion).iter().sum::<f64>()));
        first_max(totals).map(|(emotion, _)| emotion.clone())
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn sentiment_trend(&self) -> &[f64] {
        &self.sentiment_trend
    }

    /// Trend for one emotion; empty if the emotion was never reported.
    pub fn emotion_trend(&self, emotion: &str) -> &[f64] {
        self.emotion_trend
            .get(emotion)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn dimension_trend(&self, dimension: MoralDimension) -> &[f64] {
        self.moral_dimension_trend
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
