use super::super::answers::PressureArea;
use super::super::domain::Assessment;
use super::super::recommend::{Resource, ResourceCategory};
use super::super::scoring::{PrimaryConstraint, Rating, StabilityLevel};

const FALLBACK: &str = "This resource matches your assessment profile.";

/// Explain why a resource belongs in the plan, from the assessment that produced it.
pub fn explain(resource: &Resource, assessment: &Assessment) -> String {
    let profile = &assessment.profile;
    let category = resource.category;
    let mut reasons: Vec<String> = Vec::new();

    if profile.stability_level == StabilityLevel::ImmediateActionNeeded {
        reasons.push(
            "Your timeline is critical, so this is prioritized for fast relief".to_string(),
        );
    }

    match (profile.income_flexibility, category) {
        (Rating::High, ResourceCategory::Money | ResourceCategory::Monetization) => {
            reasons.push("You have the weekly hours to put this to work right away".to_string());
        }
        (Rating::Low, ResourceCategory::Assistance) => {
            reasons.push(
                "With limited hours available, support programs stretch your time further"
                    .to_string(),
            );
        }
        _ => {}
    }

    match (profile.mobility_score, category) {
        (Rating::High, ResourceCategory::Money) => {
            reasons.push(
                "Your reliable transportation opens up local earning options".to_string(),
            );
        }
        (Rating::Low, ResourceCategory::Money | ResourceCategory::Monetization) => {
            reasons.push("This can be done without needing to travel".to_string());
        }
        _ => {}
    }

    use PrimaryConstraint as C;
    use ResourceCategory as R;
    let constraint_reason = match (profile.primary_constraint, category) {
        (C::Transportation, R::Assistance | R::Monetization) => {
            Some("It works around your transportation limits")
        }
        (C::Time, R::Assistance | R::Unemployment) => Some("It fits around a tight weekly schedule"),
        (C::Urgency, R::Assistance | R::Money) => {
            Some("It addresses money you need in the next few weeks")
        }
        (C::Skills, R::Unemployment | R::Monetization) => {
            Some("It builds on the skills you already have")
        }
        _ => None,
    };
    if let Some(reason) = constraint_reason {
        reasons.push(reason.to_string());
    }

    if category == ResourceCategory::Assistance {
        let title = resource.title.to_ascii_lowercase();
        if let Some(area) = assessment
            .answers
            .primary_pressure
            .iter()
            .copied()
            .find(|area| pressure_keywords(*area).iter().any(|kw| title.contains(*kw)))
        {
            reasons.push(format!(
                "It targets your {} pressure",
                area.label().to_ascii_lowercase()
            ));
        }
    }

    if reasons.is_empty() {
        return FALLBACK.to_string();
    }

    let mut sentence = reasons.join(". ");
    sentence.push('.');
    sentence
}

fn pressure_keywords(area: PressureArea) -> &'static [&'static str] {
    match area {
        PressureArea::Housing => &["rent", "housing"],
        PressureArea::Food => &["food", "snap"],
        PressureArea::Utilities => &["energy", "utility", "liheap"],
        PressureArea::Medical => &["medicaid", "health", "clinic"],
        PressureArea::Insurance => &["insurance", "marketplace"],
        PressureArea::Transportation
        | PressureArea::Debt
        | PressureArea::Childcare => &[],
    }
}
