use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::assessment::answers::{
    AnswerSet, EducationLevel, EmploymentStatus, Frequency, HoursPerWeek, InternetAccess,
    PressureArea, PriorExperience, SellableItem, SellingComfort, Skill, TravelAbility, Urgency,
    VehicleAccess, YesNo,
};
use crate::workflows::assessment::domain::{Assessment, AssessmentId, AssessmentUpdate};
use crate::workflows::assessment::plan::{FinancialPlan, PlanManager, PlanSettings};
use crate::workflows::assessment::recommend::{
    Resource, ResourceCategory, ResourceRecommender,
};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::{
    assessment_router, AssessmentService, NarrativePlanner, ScoringEngine,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Laid off, mobile, full-time available, stable runway, reliable internet.
pub(super) fn scenario_answers() -> AnswerSet {
    AnswerSet {
        employment_status: EmploymentStatus::RecentlyLaidOff,
        primary_pressure: vec![PressureArea::Housing, PressureArea::Food],
        vehicle_access: VehicleAccess::Reliable,
        has_license: YesNo::Yes,
        can_travel: TravelAbility::Yes,
        skills: vec![Skill::TechTroubleshooting],
        selling_comfort: SellingComfort::No,
        sellable_items: vec![SellableItem::Nothing],
        hours_per_week: HoursPerWeek::FortyPlus,
        urgency: Urgency::Stable,
        education_level: EducationLevel::SomeCollege,
        internet_access: InternetAccess::Reliable,
        childcare_needs: Frequency::No,
        health_limitations: Frequency::No,
        previous_experience: vec![PriorExperience::Office],
    }
}

/// Critical runway with no vehicle and little time.
pub(super) fn crisis_answers() -> AnswerSet {
    AnswerSet {
        employment_status: EmploymentStatus::LongTermUnemployed,
        primary_pressure: vec![PressureArea::Utilities, PressureArea::Medical],
        vehicle_access: VehicleAccess::None,
        has_license: YesNo::No,
        can_travel: TravelAbility::Limited,
        skills: vec![Skill::WritingContent, Skill::Caregiving],
        selling_comfort: SellingComfort::Somewhat,
        sellable_items: vec![SellableItem::Electronics, SellableItem::Furniture],
        hours_per_week: HoursPerWeek::UnderTen,
        urgency: Urgency::Critical,
        education_level: EducationLevel::HighSchool,
        internet_access: InternetAccess::Limited,
        childcare_needs: Frequency::Yes,
        health_limitations: Frequency::Sometimes,
        previous_experience: vec![PriorExperience::FoodService, PriorExperience::Retail],
    }
}

/// Score and recommend in-process, the way the service does, without persisting.
pub(super) fn assessment_for(answers: AnswerSet) -> Assessment {
    let profile = ScoringEngine::default().score(&answers);
    let suggested_resources =
        ResourceRecommender::default().recommend(&answers, profile.mobility_score);
    let financial_plan = NarrativePlanner.build(&answers, &profile);

    Assessment {
        id: AssessmentId("asm-fixture".to_string()),
        answers,
        profile,
        suggested_resources,
        financial_plan,
        created_at: now(),
        updated_at: now(),
    }
}

pub(super) fn manager_for(assessment: &Assessment) -> PlanManager<'_> {
    let plan = FinancialPlan::new(assessment.id.clone(), now());
    PlanManager::new(plan, assessment, PlanSettings::default())
}

pub(super) fn suggested(
    assessment: &Assessment,
    category: ResourceCategory,
    title: &str,
) -> Resource {
    assessment
        .suggested_resources
        .for_category(category)
        .iter()
        .find(|resource| resource.title == title)
        .cloned()
        .unwrap_or_else(|| panic!("{title} should be suggested in {}", category.key()))
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone(), PlanSettings::default());
    (service, repository)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
    pub(super) plans: Arc<Mutex<HashMap<AssessmentId, FinancialPlan>>>,
    plan_writes: Arc<AtomicUsize>,
}

impl MemoryRepository {
    /// Number of plan updates persisted so far.
    pub(super) fn plan_writes(&self) -> usize {
        self.plan_writes.load(Ordering::SeqCst)
    }

    pub(super) fn stored_plan(&self, id: &AssessmentId) -> Option<FinancialPlan> {
        self.plans.lock().expect("plan mutex poisoned").get(id).cloned()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert_assessment(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update_assessment(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Assessment, RepositoryError> {
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply(stored);
        Ok(stored.clone())
    }

    fn fetch_assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_plan(&self, plan: FinancialPlan) -> Result<FinancialPlan, RepositoryError> {
        let mut guard = self.plans.lock().expect("plan mutex poisoned");
        if guard.contains_key(&plan.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(plan.assessment_id.clone(), plan.clone());
        Ok(plan)
    }

    fn update_plan(&self, plan: FinancialPlan) -> Result<(), RepositoryError> {
        let mut guard = self.plans.lock().expect("plan mutex poisoned");
        if !guard.contains_key(&plan.assessment_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(plan.assessment_id.clone(), plan);
        self.plan_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn fetch_plan_for_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Option<FinancialPlan>, RepositoryError> {
        let guard = self.plans.lock().expect("plan mutex poisoned");
        Ok(guard.get(assessment_id).cloned())
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert_assessment(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_assessment(
        &self,
        _id: &AssessmentId,
        _update: AssessmentUpdate,
    ) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_assessment(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(None)
    }

    fn insert_plan(&self, _plan: FinancialPlan) -> Result<FinancialPlan, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_plan(&self, _plan: FinancialPlan) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_plan_for_assessment(
        &self,
        _assessment_id: &AssessmentId,
    ) -> Result<Option<FinancialPlan>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert_assessment(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_assessment(
        &self,
        _id: &AssessmentId,
        _update: AssessmentUpdate,
    ) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_assessment(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_plan(&self, _plan: FinancialPlan) -> Result<FinancialPlan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_plan(&self, _plan: FinancialPlan) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_plan_for_assessment(
        &self,
        _assessment_id: &AssessmentId,
    ) -> Result<Option<FinancialPlan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
