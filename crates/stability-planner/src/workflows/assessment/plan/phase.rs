use super::super::domain::Assessment;
use super::super::recommend::ResourceCategory;
use super::super::scoring::{Rating, StabilityLevel};
use super::domain::PlanPhase;

/// Default phase offered when a resource is added to the plan.
pub fn suggest_phase(category: ResourceCategory, assessment: &Assessment) -> PlanPhase {
    let profile = &assessment.profile;
    let urgent = profile.stability_level == StabilityLevel::ImmediateActionNeeded;

    match category {
        ResourceCategory::Assistance => {
            let basic_need = assessment
                .answers
                .primary_pressure
                .iter()
                .any(|area| area.is_basic_need());
            if urgent || basic_need {
                PlanPhase::Immediate
            } else {
                PlanPhase::ThirtyDays
            }
        }
        ResourceCategory::Money => PlanPhase::Immediate,
        ResourceCategory::Monetization => {
            if urgent && profile.income_flexibility == Rating::High {
                PlanPhase::ThirtyDays
            } else if profile.income_flexibility == Rating::Low {
                PlanPhase::SixtyDays
            } else {
                PlanPhase::ThirtyDays
            }
        }
        ResourceCategory::Unemployment => PlanPhase::ThirtyDays,
    }
}
