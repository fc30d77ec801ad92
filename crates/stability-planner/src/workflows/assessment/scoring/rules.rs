use super::super::answers::{
    AnswerSet, HoursPerWeek, TravelAbility, Urgency, VehicleAccess, YesNo,
};
use super::{PrimaryConstraint, Rating, StabilityLevel};

pub(crate) fn mobility_score(answers: &AnswerSet) -> Rating {
    if answers.vehicle_access == VehicleAccess::Reliable
        && answers.has_license == YesNo::Yes
        && answers.can_travel == TravelAbility::Yes
    {
        Rating::High
    } else if answers.vehicle_access == VehicleAccess::Unreliable
        || answers.can_travel == TravelAbility::Limited
    {
        Rating::Medium
    } else {
        Rating::Low
    }
}

pub(crate) fn income_flexibility(answers: &AnswerSet) -> Rating {
    match answers.hours_per_week {
        HoursPerWeek::FortyPlus => Rating::High,
        HoursPerWeek::TwentyToForty => Rating::Medium,
        HoursPerWeek::TenToTwenty | HoursPerWeek::UnderTen => Rating::Low,
    }
}

pub(crate) fn stability_level(answers: &AnswerSet) -> StabilityLevel {
    match answers.urgency {
        Urgency::Critical => StabilityLevel::ImmediateActionNeeded,
        Urgency::Tight => StabilityLevel::WatchClosely,
        Urgency::Stable => StabilityLevel::Stable,
    }
}

// Transportation outranks urgency: a critical timeline with no way to travel
// is still classified as a transportation problem.
pub(crate) fn primary_constraint(answers: &AnswerSet) -> PrimaryConstraint {
    if answers.vehicle_access == VehicleAccess::None || answers.can_travel == TravelAbility::No {
        PrimaryConstraint::Transportation
    } else if answers.hours_per_week == HoursPerWeek::UnderTen {
        PrimaryConstraint::Time
    } else if answers.urgency == Urgency::Critical {
        PrimaryConstraint::Urgency
    } else {
        PrimaryConstraint::Skills
    }
}
