//! Core types for moral compass evaluation.
//!
//! The dimension registry: the five moral dimensions every decision is
//! scored along, the five philosophies it is evaluated against, and the
//! per-philosophy score map the evaluator produces.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::decision::DecisionError;

lazy_static! {
    /// Separator runs accepted between the words of a tag.
    static ref TAG_SEPARATORS: Regex = Regex::new(r"[\s/_-]+").unwrap();
}

/// Normalize a tag for comparison: lowercase, separators collapsed to one space.
fn normalize_tag(tag: &str) -> String {
    TAG_SEPARATORS
        .replace_all(tag, " ")
        .trim()
        .to_lowercase()
}

/// The five moral dimensions.
///
/// Declared in canonical order; `Ord` follows it, so `BTreeMap` iteration
/// always yields dimensions in the same order as the compass axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoralDimension {
    #[serde(rename = "Harm/Care")]
    HarmCare,
    #[serde(rename = "Fairness/Reciprocity")]
    FairnessReciprocity,
    #[serde(rename = "Loyalty/Ingroup")]
    LoyaltyIngroup,
    #[serde(rename = "Authority/Respect")]
    AuthorityRespect,
    #[serde(rename = "Purity/Sanctity")]
    PuritySanctity,
}

impl MoralDimension {
    /// Every dimension, in canonical order.
    pub const ALL: [MoralDimension; 5] = [
        MoralDimension::HarmCare,
        MoralDimension::FairnessReciprocity,
        MoralDimension::LoyaltyIngroup,
        MoralDimension::AuthorityRespect,
        MoralDimension::PuritySanctity,
    ];

    /// Canonical display label (e.g. "Harm/Care").
    pub fn label(&self) -> &'static str {
        match self {
            MoralDimension::HarmCare => "Harm/Care",
            MoralDimension::FairnessReciprocity => "Fairness/Reciprocity",
            MoralDimension::LoyaltyIngroup => "Loyalty/Ingroup",
            MoralDimension::AuthorityRespect => "Authority/Respect",
            MoralDimension::PuritySanctity => "Purity/Sanctity",
        }
    }

    /// Position of this dimension on the compass, starting at 0.
    pub fn index(&self) -> usize {
        match self {
            MoralDimension::HarmCare => 0,
            MoralDimension::FairnessReciprocity => 1,
            MoralDimension::LoyaltyIngroup => 2,
            MoralDimension::AuthorityRespect => 3,
            MoralDimension::PuritySanctity => 4,
        }
    }

    /// Look up a dimension from a boundary tag.
    ///
    /// Case-insensitive; whitespace, `/`, `_` and `-` are interchangeable
    /// separators, so `"harm_care"` and `"Harm / Care"` both match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let wanted = normalize_tag(tag);
        Self::ALL
            .into_iter()
            .find(|dimension| normalize_tag(dimension.label()) == wanted)
    }
}

impl FromStr for MoralDimension {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| DecisionError::InvalidDimension(s.to_string()))
    }
}

impl fmt::Display for MoralDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five ethical philosophies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Philosophy {
    #[serde(rename = "Golden Rule")]
    GoldenRule,
    #[serde(rename = "Utilitarianism")]
    Utilitarianism,
    #[serde(rename = "Kantian Ethics")]
    KantianEthics,
    #[serde(rename = "Virtue Ethics")]
    VirtueEthics,
    #[serde(rename = "Care Ethics")]
    CareEthics,
}

impl Philosophy {
    /// Every philosophy, in canonical order.
    pub const ALL: [Philosophy; 5] = [
        Philosophy::GoldenRule,
        Philosophy::Utilitarianism,
        Philosophy::KantianEthics,
        Philosophy::VirtueEthics,
        Philosophy::CareEthics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Philosophy::GoldenRule => "Golden Rule",
            Philosophy::Utilitarianism => "Utilitarianism",
            Philosophy::KantianEthics => "Kantian Ethics",
            Philosophy::VirtueEthics => "Virtue Ethics",
            Philosophy::CareEthics => "Care Ethics",
        }
    }

    /// The principle this philosophy asks a decision to honor.
    pub fn tenet(&self) -> &'static str {
        match self {
            Philosophy::GoldenRule => "Treat others as you would like to be treated",
            Philosophy::Utilitarianism => "Act to maximize overall happiness and well-being",
            Philosophy::KantianEthics => {
                "Act only according to rules you could will to be universal laws"
            }
            Philosophy::VirtueEthics => "Cultivate moral character and virtues",
            Philosophy::CareEthics => "Emphasize compassion, responsibility, and relationships",
        }
    }

    /// Prior credibility of this philosophy, in [0, 1].
    ///
    /// These are compile-time constants; nothing adjusts them at runtime.
    pub fn base_weight(&self) -> f64 {
        match self {
            Philosophy::GoldenRule => 0.8,
            Philosophy::Utilitarianism => 0.7,
            Philosophy::KantianEthics => 0.75,
            Philosophy::VirtueEthics => 0.65,
            Philosophy::CareEthics => 0.85,
        }
    }

    /// The dimensions whose scores modulate this philosophy's weight.
    pub fn dimensions(&self) -> &'static [MoralDimension] {
        match self {
            Philosophy::GoldenRule => &[MoralDimension::FairnessReciprocity],
            Philosophy::Utilitarianism => &[MoralDimension::HarmCare],
            Philosophy::KantianEthics => &[MoralDimension::AuthorityRespect],
            Philosophy::VirtueEthics => &[MoralDimension::PuritySanctity],
            Philosophy::CareEthics => &[MoralDimension::HarmCare, MoralDimension::LoyaltyIngroup],
        }
    }

    /// Look up a philosophy by tag, with the same normalization as
    /// [`MoralDimension::from_tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        let wanted = normalize_tag(tag);
        Self::ALL
            .into_iter()
            .find(|philosophy| normalize_tag(philosophy.label()) == wanted)
    }
}

impl fmt::Display for Philosophy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-philosophy evaluation scores.
///
/// Reads of a philosophy that was never scored return 0, which callers
/// cannot tell apart from a genuine 0 score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhilosophicalScores(BTreeMap<Philosophy, f64>);

impl PhilosophicalScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a philosophy, or 0 if it has not been scored.
    pub fn get(&self, philosophy: Philosophy) -> f64 {
        self.0.get(&philosophy).copied().unwrap_or(0.0)
    }

    /// Set the score for one philosophy, replacing any previous value.
    pub fn insert(&mut self, philosophy: Philosophy, score: f64) {
        self.0.insert(philosophy, score);
    }

    pub fn contains(&self, philosophy: Philosophy) -> bool {
        self.0.contains_key(&philosophy)
    }

    /// Iterate in canonical philosophy order.
    pub fn iter(&self) -> impl Iterator<Item = (Philosophy, f64)> + '_ {
        self.0.iter().map(|(philosophy, score)| (*philosophy, *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean of the recorded scores, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.values().sum::<f64>() / self.0.len() as f64
    }

    /// The highest-scoring philosophy. Ties go to the earlier one in
    /// canonical order.
    pub fn top(&self) -> Option<(Philosophy, f64)> {
        first_max(self.iter())
    }
}

/// Highest-scoring entry; a later entry replaces the current best only when
/// it scores strictly higher, so ties go to the first one seen.
pub(crate) fn first_max<T>(entries: impl IntoIterator<Item = (T, f64)>) -> Option<(T, f64)> {
    entries.into_iter().fold(None, |best, (key, score)| match best {
        Some((_, best_score)) if best_score >= score => best,
        _ => Some((key, score)),
    })
}

impl FromIterator<(Philosophy, f64)> for PhilosophicalScores {
    fn from_iter<I: IntoIterator<Item = (Philosophy, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
