use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::answers::AnswerSet;
use super::narrative::NarrativePlan;
use super::recommend::SuggestedResources;
use super::scoring::ScoredProfile;

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl AssessmentId {
    pub fn generate() -> Self {
        Self(format!("asm-{}", Uuid::new_v4().simple()))
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scored questionnaire together with everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: AssessmentId,
    pub answers: AnswerSet,
    #[serde(flatten)]
    pub profile: ScoredProfile,
    pub suggested_resources: SuggestedResources,
    pub financial_plan: NarrativePlan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replacement payload for a re-scored assessment.
///
/// All derived fields travel together so a store can never hold a mix of old and new
/// results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentUpdate {
    pub answers: AnswerSet,
    pub profile: ScoredProfile,
    pub suggested_resources: SuggestedResources,
    pub financial_plan: NarrativePlan,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentUpdate {
    pub fn apply(self, assessment: &mut Assessment) {
        assessment.answers = self.answers;
        assessment.profile = self.profile;
        assessment.suggested_resources = self.suggested_resources;
        assessment.financial_plan = self.financial_plan;
        assessment.updated_at = self.updated_at;
    }
}
