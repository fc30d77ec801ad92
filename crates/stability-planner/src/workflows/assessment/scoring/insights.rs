use super::PrimaryConstraint;
use serde::{Deserialize, Serialize};

/// One canonical insight sentence per primary constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightCatalog {
    pub transportation: String,
    pub time: String,
    pub urgency: String,
    pub skills: String,
}

impl InsightCatalog {
    pub fn standard() -> Self {
        Self {
            transportation: "Limited transportation is your biggest barrier right now, so focus on remote work and support you can reach from home.".to_string(),
            time: "Your available time is the tightest constraint, so prioritize help that pays off quickly without a large weekly commitment.".to_string(),
            urgency: "Your timeline is critical, so secure emergency assistance first and line up the fastest sources of income.".to_string(),
            skills: "You have time and mobility on your side; turning your existing skills into income is your strongest next move.".to_string(),
        }
    }

    pub fn insight_for(&self, constraint: PrimaryConstraint) -> &str {
        match constraint {
            PrimaryConstraint::Transportation => &self.transportation,
            PrimaryConstraint::Time => &self.time,
            PrimaryConstraint::Urgency => &self.urgency,
            PrimaryConstraint::Skills => &self.skills,
        }
    }
}
