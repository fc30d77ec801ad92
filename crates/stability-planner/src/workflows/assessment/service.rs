use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::answers::{AnswerSet, AnswerSetError};
use super::domain::{Assessment, AssessmentId, AssessmentUpdate};
use super::narrative::{NarrativePlan, NarrativePlanner};
use super::plan::{
    FinancialPlan, PendingAddition, PlanChange, PlanManager, PlanPhase, PlanProgress,
    PlanSettings, Rejection, ReorderDirection, TaskEdit, TaskId, TaskStatus,
};
use super::recommend::{Resource, ResourceId, ResourceRecommender, SuggestedResources};
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::{ScoredProfile, ScoringEngine};
use super::views::RecommendationView;

/// Service composing the scoring engine, recommender, plan manager, and repository.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    scoring: ScoringEngine,
    recommender: ResourceRecommender,
    narrative: NarrativePlanner,
    settings: PlanSettings,
}

/// Plan snapshot after a mutation, together with whether anything changed.
#[derive(Debug, Clone, Serialize)]
pub struct PlanUpdate {
    pub change: PlanChange,
    pub plan: FinancialPlan,
}

/// Outcome of the first half of "add to plan".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AdditionProposal {
    Ready(PendingAddition),
    Rejected { reason: Rejection },
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: PlanSettings) -> Self {
        Self::with_engines(
            repository,
            ScoringEngine::default(),
            ResourceRecommender::default(),
            settings,
        )
    }

    pub fn with_engines(
        repository: Arc<R>,
        scoring: ScoringEngine,
        recommender: ResourceRecommender,
        settings: PlanSettings,
    ) -> Self {
        Self {
            repository,
            scoring,
            recommender,
            narrative: NarrativePlanner,
            settings,
        }
    }

    pub fn settings(&self) -> PlanSettings {
        self.settings
    }

    /// Score a completed questionnaire and store the resulting assessment.
    pub fn submit(
        &self,
        answers: AnswerSet,
        now: DateTime<Utc>,
    ) -> Result<Assessment, AssessmentServiceError> {
        answers.validate()?;
        let (profile, suggested_resources, financial_plan) = self.derive(&answers);

        let assessment = Assessment {
            id: AssessmentId::generate(),
            answers,
            profile,
            suggested_resources,
            financial_plan,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_assessment(assessment)?;
        info!(
            assessment_id = %stored.id,
            stability = stored.profile.stability_level.label(),
            constraint = stored.profile.primary_constraint.label(),
            resources = stored.suggested_resources.len(),
            "assessment scored"
        );
        Ok(stored)
    }

    /// Re-run every derived field for amended answers and overwrite them together.
    pub fn rescore(
        &self,
        id: &AssessmentId,
        answers: AnswerSet,
        now: DateTime<Utc>,
    ) -> Result<Assessment, AssessmentServiceError> {
        answers.validate()?;
        let (profile, suggested_resources, financial_plan) = self.derive(&answers);

        let update = AssessmentUpdate {
            answers,
            profile,
            suggested_resources,
            financial_plan,
            updated_at: now,
        };

        let updated = self.repository.update_assessment(id, update)?;
        info!(
            assessment_id = %updated.id,
            stability = updated.profile.stability_level.label(),
            constraint = updated.profile.primary_constraint.label(),
            "assessment re-scored"
        );
        Ok(updated)
    }

    pub fn get(&self, id: &AssessmentId) -> Result<Assessment, AssessmentServiceError> {
        let assessment = self
            .repository
            .fetch_assessment(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(assessment)
    }

    /// Fetch the plan for an assessment, creating it on first access and clearing an
    /// expired lock.
    pub fn plan(
        &self,
        id: &AssessmentId,
        now: DateTime<Utc>,
    ) -> Result<FinancialPlan, AssessmentServiceError> {
        let assessment = self.get(id)?;
        self.load_plan(&assessment, now)
    }

    pub fn progress(
        &self,
        id: &AssessmentId,
        now: DateTime<Utc>,
    ) -> Result<PlanProgress, AssessmentServiceError> {
        let plan = self.plan(id, now)?;
        Ok(PlanProgress::from_tasks(&plan.selected_resources))
    }

    pub fn recommendations(
        &self,
        id: &AssessmentId,
        now: DateTime<Utc>,
    ) -> Result<RecommendationView, AssessmentServiceError> {
        let assessment = self.get(id)?;
        let plan = self.load_plan(&assessment, now)?;
        Ok(RecommendationView::build(
            &assessment.suggested_resources,
            &plan,
        ))
    }

    pub fn propose_addition(
        &self,
        id: &AssessmentId,
        resource_id: &ResourceId,
        now: DateTime<Utc>,
    ) -> Result<AdditionProposal, AssessmentServiceError> {
        let assessment = self.get(id)?;
        let plan = self.load_plan(&assessment, now)?;
        let resource = resolve_resource(&assessment, &plan, resource_id)?;
        let manager = PlanManager::new(plan, &assessment, self.settings);

        Ok(match manager.propose_addition(&resource) {
            Ok(pending) => AdditionProposal::Ready(pending),
            Err(reason) => AdditionProposal::Rejected { reason },
        })
    }

    pub fn confirm_addition(
        &self,
        id: &AssessmentId,
        pending: PendingAddition,
        phase: PlanPhase,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        // Only the id is trusted; the resource itself is looked up again.
        let resource_id = pending.resource_id.clone();
        self.mutate_resource(id, &resource_id, now, "confirm_addition", |manager, resource| {
            let pending = PendingAddition {
                resource: resource.clone(),
                ..pending
            };
            manager.confirm_addition(pending, phase, now)
        })
    }

    /// Add a suggested or saved resource, defaulting to its suggested phase.
    pub fn add_to_plan(
        &self,
        id: &AssessmentId,
        resource_id: &ResourceId,
        phase: Option<PlanPhase>,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_resource(id, resource_id, now, "add_to_plan", |manager, resource| {
            manager.add_to_plan(resource, phase, now)
        })
    }

    pub fn save_for_later(
        &self,
        id: &AssessmentId,
        resource_id: &ResourceId,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_resource(id, resource_id, now, "save_for_later", |manager, resource| {
            manager.save_for_later(resource, now)
        })
    }

    pub fn dismiss(
        &self,
        id: &AssessmentId,
        resource_id: &ResourceId,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "dismiss", |manager| {
            manager.dismiss(resource_id, now)
        })
    }

    pub fn update_task_status(
        &self,
        id: &AssessmentId,
        task_id: &TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "update_task_status", |manager| {
            manager.update_task_status(task_id, status, now)
        })
    }

    pub fn remove_task(
        &self,
        id: &AssessmentId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "remove_task", |manager| {
            manager.remove_task(task_id, now)
        })
    }

    pub fn update_task_due_date(
        &self,
        id: &AssessmentId,
        task_id: &TaskId,
        due_by: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "update_task_due_date", |manager| {
            manager.update_task_due_date(task_id, due_by, now)
        })
    }

    pub fn update_task_notes(
        &self,
        id: &AssessmentId,
        task_id: &TaskId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "update_task_notes", |manager| {
            manager.update_task_notes(task_id, notes, now)
        })
    }

    /// Change several task fields at once. Nothing is saved unless every field applies.
    pub fn edit_task(
        &self,
        id: &AssessmentId,
        task_id: &TaskId,
        edit: TaskEdit,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "edit_task", |manager| {
            manager.edit_task(task_id, edit, now)
        })
    }

    pub fn reorder_task(
        &self,
        id: &AssessmentId,
        task_id: &TaskId,
        direction: ReorderDirection,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        self.mutate_plan(id, now, "reorder_task", |manager| {
            manager.reorder_task(task_id, direction, now)
        })
    }

    pub fn lock_plan(
        &self,
        id: &AssessmentId,
        now: DateTime<Utc>,
    ) -> Result<PlanUpdate, AssessmentServiceError> {
        let update = self.mutate_plan(id, now, "lock_plan", |manager| manager.lock(now))?;
        if update.change.is_applied() {
            info!(
                plan_id = %update.plan.id,
                locked_until = ?update.plan.locked_until,
                "plan locked"
            );
        }
        Ok(update)
    }

    fn derive(&self, answers: &AnswerSet) -> (ScoredProfile, SuggestedResources, NarrativePlan) {
        let profile = self.scoring.score(answers);
        let suggested = self.recommender.recommend(answers, profile.mobility_score);
        let narrative = self.narrative.build(answers, &profile);
        (profile, suggested, narrative)
    }

    fn load_plan(
        &self,
        assessment: &Assessment,
        now: DateTime<Utc>,
    ) -> Result<FinancialPlan, AssessmentServiceError> {
        match self.repository.fetch_plan_for_assessment(&assessment.id)? {
            Some(mut plan) => {
                if plan.clear_expired_lock(now) {
                    self.repository.update_plan(plan.clone())?;
                    info!(plan_id = %plan.id, "plan lock expired and was cleared");
                }
                Ok(plan)
            }
            None => {
                let plan = FinancialPlan::new(assessment.id.clone(), now);
                let stored = self.repository.insert_plan(plan)?;
                info!(plan_id = %stored.id, assessment_id = %assessment.id, "plan created");
                Ok(stored)
            }
        }
    }

    fn mutate_plan<F>(
        &self,
        id: &AssessmentId,
        now: DateTime<Utc>,
        action: &'static str,
        op: F,
    ) -> Result<PlanUpdate, AssessmentServiceError>
    where
        F: FnOnce(&mut PlanManager<'_>) -> PlanChange,
    {
        let assessment = self.get(id)?;
        let plan = self.load_plan(&assessment, now)?;
        self.apply(&assessment, plan, action, op)
    }

    fn mutate_resource<F>(
        &self,
        id: &AssessmentId,
        resource_id: &ResourceId,
        now: DateTime<Utc>,
        action: &'static str,
        op: F,
    ) -> Result<PlanUpdate, AssessmentServiceError>
    where
        F: FnOnce(&mut PlanManager<'_>, &Resource) -> PlanChange,
    {
        let assessment = self.get(id)?;
        let plan = self.load_plan(&assessment, now)?;
        let resource = resolve_resource(&assessment, &plan, resource_id)?;
        self.apply(&assessment, plan, action, |manager| op(manager, &resource))
    }

    fn apply<F>(
        &self,
        assessment: &Assessment,
        plan: FinancialPlan,
        action: &'static str,
        op: F,
    ) -> Result<PlanUpdate, AssessmentServiceError>
    where
        F: FnOnce(&mut PlanManager<'_>) -> PlanChange,
    {
        let mut manager = PlanManager::new(plan, assessment, self.settings);
        let change = op(&mut manager);
        let plan = manager.into_plan();

        match &change {
            PlanChange::Applied => {
                self.repository.update_plan(plan.clone())?;
                debug!(action, plan_id = %plan.id, "plan updated");
            }
            PlanChange::Rejected(reason) => {
                debug!(action, plan_id = %plan.id, reason = %reason.summary(), "plan change rejected");
            }
        }

        Ok(PlanUpdate { change, plan })
    }
}

// Saved entries keep their resource even after a re-score drops it from the suggestions.
fn resolve_resource(
    assessment: &Assessment,
    plan: &FinancialPlan,
    resource_id: &ResourceId,
) -> Result<Resource, AssessmentServiceError> {
    assessment
        .suggested_resources
        .find(resource_id)
        .cloned()
        .or_else(|| {
            plan.saved_resources
                .iter()
                .find(|saved| &saved.resource_id == resource_id)
                .map(|saved| saved.resource.clone())
        })
        .ok_or_else(|| AssessmentServiceError::UnknownResource(resource_id.clone()))
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    InvalidAnswers(#[from] AnswerSetError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("resource {0} is not among this assessment's recommendations")]
    UnknownResource(ResourceId),
}
