//! Financial stability assessment: questionnaire scoring, resource recommendations, and
//! the phased action plan built from them.
//!
//! The engines (`scoring`, `recommend`, `narrative`, `plan`) are pure and take time as an
//! argument. [`AssessmentService`] wires them to an [`AssessmentRepository`] and is the
//! only layer that persists or logs.

pub mod answers;
pub mod domain;
pub mod narrative;
pub mod plan;
pub mod recommend;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, AnswerSetError};
pub use domain::{Assessment, AssessmentId, AssessmentUpdate};
pub use narrative::{NarrativePlan, NarrativePlanner};
pub use plan::{
    FinancialPlan, PendingAddition, PlanChange, PlanManager, PlanPhase, PlanProgress,
    PlanSettings, PlanTask, ProgressStatus, Rejection, ReorderDirection, TaskEdit, TaskId,
    TaskStatus,
};
pub use recommend::{
    Resource, ResourceCatalog, ResourceCategory, ResourceId, ResourceLink, ResourceRecommender,
    SuggestedResources,
};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use scoring::{
    InsightCatalog, PrimaryConstraint, Rating, ScoredProfile, ScoringEngine, StabilityLevel,
};
pub use service::{AdditionProposal, AssessmentService, AssessmentServiceError, PlanUpdate};
pub use views::{RecommendationEntry, RecommendationView};
