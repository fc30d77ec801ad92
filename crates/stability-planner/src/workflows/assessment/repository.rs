use super::domain::{Assessment, AssessmentId, AssessmentUpdate};
use super::plan::FinancialPlan;

/// Storage abstraction so the service can be exercised against any key-value store.
///
/// Implementations must round-trip every field unchanged; the service always writes
/// whole records.
pub trait AssessmentRepository: Send + Sync {
    fn insert_assessment(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn update_assessment(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Assessment, RepositoryError>;
    fn fetch_assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;

    fn insert_plan(&self, plan: FinancialPlan) -> Result<FinancialPlan, RepositoryError>;
    fn update_plan(&self, plan: FinancialPlan) -> Result<(), RepositoryError>;
    fn fetch_plan_for_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Option<FinancialPlan>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
