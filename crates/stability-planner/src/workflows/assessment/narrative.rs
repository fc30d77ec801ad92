use super::answers::{AnswerSet, InternetAccess, PressureArea, Skill};
use super::scoring::{PrimaryConstraint, Rating, ScoredProfile, StabilityLevel};
use serde::{Deserialize, Serialize};

/// Three-horizon narrative attached to an assessment.
///
/// This is free text for the snapshot view and is unrelated to the task-based
/// [`FinancialPlan`](super::plan::FinancialPlan).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativePlan {
    #[serde(rename = "next7Days")]
    pub next_7_days: Vec<String>,
    #[serde(rename = "next30Days")]
    pub next_30_days: Vec<String>,
    #[serde(rename = "next60to90Days")]
    pub next_60_to_90_days: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativePlanner;

impl NarrativePlanner {
    pub fn build(&self, answers: &AnswerSet, profile: &ScoredProfile) -> NarrativePlan {
        NarrativePlan {
            next_7_days: first_week(answers, profile),
            next_30_days: first_month(answers, profile),
            next_60_to_90_days: growth_window(answers, profile),
        }
    }
}

fn first_week(answers: &AnswerSet, profile: &ScoredProfile) -> Vec<String> {
    let mut steps = Vec::new();

    if profile.stability_level == StabilityLevel::ImmediateActionNeeded {
        steps.push("Call 211 to reach local emergency assistance today".to_string());
    }

    for area in &answers.primary_pressure {
        let step = match area {
            PressureArea::Housing => {
                "Apply for emergency rental assistance and tell your landlord you are seeking help"
            }
            PressureArea::Utilities => {
                "Ask your utility provider about payment plans and apply for energy assistance"
            }
            PressureArea::Food => "Apply for SNAP and visit a local food bank this week",
            PressureArea::Medical => {
                "Check Medicaid eligibility and find a sliding-scale clinic near you"
            }
            _ => continue,
        };
        steps.push(step.to_string());
    }

    if answers.employment_status.is_out_of_work() {
        steps.push("Contact your state unemployment office and file a claim".to_string());
    }

    if answers.has_sellable_items() {
        steps.push("List items you can sell this week".to_string());
    }

    if steps.is_empty() {
        steps.push("Review your budget and list every bill due in the next two weeks".to_string());
    }

    steps
}

fn first_month(answers: &AnswerSet, profile: &ScoredProfile) -> Vec<String> {
    let mut steps = Vec::new();

    if profile.mobility_score == Rating::High {
        steps.push("Sign up for one delivery or gig platform and complete onboarding".to_string());
    }

    if answers.internet_access == InternetAccess::Reliable {
        steps.push("Apply to remote roles that match your experience".to_string());
    }

    if answers.skills.iter().copied().any(Skill::is_freelance_ready) {
        steps.push("Create a freelance profile showcasing your strongest skill".to_string());
    }

    if answers.employment_status.is_out_of_work() {
        steps.push("Update your resume and apply to at least five roles each week".to_string());
    }

    if profile.primary_constraint == PrimaryConstraint::Transportation {
        steps.push("Map out transit routes or ride-share options for work and appointments".to_string());
    }

    if steps.is_empty() {
        steps.push("Set up a simple weekly budget check-in".to_string());
    }

    steps
}

fn growth_window(answers: &AnswerSet, profile: &ScoredProfile) -> Vec<String> {
    let mut steps = Vec::new();

    let growth = match profile.primary_constraint {
        PrimaryConstraint::Transportation => {
            "Build remote-friendly skills so more work is reachable from home"
        }
        PrimaryConstraint::Time => "Shift toward income that pays more per hour you work",
        PrimaryConstraint::Urgency => {
            "Turn short-term income into a steady routine once the crisis eases"
        }
        PrimaryConstraint::Skills => "Take a short course or certification to grow your skills",
    };
    steps.push(growth.to_string());

    if profile.stability_level == StabilityLevel::ImmediateActionNeeded {
        steps.push("Aim to cover one full month of essentials".to_string());
    } else {
        steps.push("Build a starter emergency fund".to_string());
    }

    if answers.has_pressure(PressureArea::Debt) {
        steps.push("Contact a nonprofit credit counselor about a debt repayment plan".to_string());
    }

    steps
}
