mod insights;
mod rules;

pub use insights::InsightCatalog;

use super::answers::AnswerSet;
use serde::{Deserialize, Serialize};

/// Stateless classifier turning questionnaire answers into a situational snapshot.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    insights: InsightCatalog,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(InsightCatalog::standard())
    }
}

impl ScoringEngine {
    pub fn new(insights: InsightCatalog) -> Self {
        Self { insights }
    }

    /// Classify a complete answer set. Deterministic and side-effect free.
    pub fn score(&self, answers: &AnswerSet) -> ScoredProfile {
        let primary_constraint = rules::primary_constraint(answers);

        ScoredProfile {
            stability_level: rules::stability_level(answers),
            mobility_score: rules::mobility_score(answers),
            income_flexibility: rules::income_flexibility(answers),
            primary_constraint,
            insight: self.insights.insight_for(primary_constraint).to_string(),
        }
    }
}

/// The five rule-derived fields of an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProfile {
    pub stability_level: StabilityLevel,
    pub mobility_score: Rating,
    pub income_flexibility: Rating,
    pub primary_constraint: PrimaryConstraint,
    pub insight: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StabilityLevel {
    Stable,
    #[serde(rename = "Watch Closely")]
    WatchClosely,
    #[serde(rename = "Immediate Action Needed")]
    ImmediateActionNeeded,
}

impl StabilityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::WatchClosely => "Watch Closely",
            Self::ImmediateActionNeeded => "Immediate Action Needed",
        }
    }
}

/// Three-step rating shared by mobility score and income flexibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    High,
    Medium,
    Low,
}

impl Rating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryConstraint {
    Transportation,
    Time,
    Urgency,
    Skills,
}

impl PrimaryConstraint {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Transportation => "Transportation",
            Self::Time => "Time",
            Self::Urgency => "Urgency",
            Self::Skills => "Skills",
        }
    }
}
