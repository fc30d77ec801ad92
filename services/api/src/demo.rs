use crate::infra::{clock, parse_date, InMemoryAssessmentRepository, JsonFileRepository};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use stability_planner::config::AppConfig;
use stability_planner::error::AppError;
use stability_planner::workflows::assessment::answers::{
    AnswerSet, EducationLevel, EmploymentStatus, Frequency, HoursPerWeek, InternetAccess,
    PressureArea, PriorExperience, SellableItem, SellingComfort, Skill, TravelAbility, Urgency,
    VehicleAccess, YesNo,
};
use stability_planner::workflows::assessment::{
    Assessment, AssessmentRepository, AssessmentService, FinancialPlan, PlanSettings, PlanUpdate,
    RecommendationView, ResourceCategory, ResourceId, TaskStatus,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding the fifteen questionnaire answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Score an answers file. When `APP_STORE_PATH` is set the assessment is kept there
/// so a running server can pick it up.
pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs { answers, today } = args;
    let config = AppConfig::load()?;
    let raw = fs::read_to_string(&answers)?;
    let answers: AnswerSet = serde_json::from_str(&raw)?;
    let now = clock(today);

    let assessment = match config.storage.store_path {
        Some(path) => {
            let repository = Arc::new(JsonFileRepository::open(path)?);
            assess_with(repository, config.plan, answers, now)?
        }
        None => assess_with(
            Arc::new(InMemoryAssessmentRepository::default()),
            config.plan,
            answers,
            now,
        )?,
    };
    println!("\nStored as {}", assessment.id);
    Ok(())
}

fn assess_with<R>(
    repository: Arc<R>,
    settings: PlanSettings,
    answers: AnswerSet,
    now: DateTime<Utc>,
) -> Result<Assessment, AppError>
where
    R: AssessmentRepository + 'static,
{
    let service = AssessmentService::new(repository, settings);
    let assessment = service.submit(answers, now)?;
    render_snapshot(&assessment);
    render_narrative(&assessment);
    let view = service.recommendations(&assessment.id, now)?;
    render_recommendations(&view);
    Ok(assessment)
}

/// Scripted walk-through: a recently laid-off household with a reliable car and
/// rent and food pressure builds a plan, records progress, and locks it.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = clock(args.today);
    let service = AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        PlanSettings::default(),
    );

    println!("Financial stability demo");
    let assessment = service.submit(demo_answers(), now)?;
    render_snapshot(&assessment);
    render_narrative(&assessment);
    render_recommendations(&service.recommendations(&assessment.id, now)?);

    println!("\nBuilding the plan");
    let picks = [
        (ResourceCategory::Assistance, "Emergency Rental Assistance"),
        (ResourceCategory::Assistance, "SNAP Food Assistance"),
        (
            ResourceCategory::Unemployment,
            "File for State Unemployment Benefits",
        ),
        (ResourceCategory::Money, "Uber Eats Delivery"),
        (ResourceCategory::Monetization, "Tech Freelance Gigs on Upwork"),
    ];
    for (category, title) in picks {
        let resource_id = ResourceId::derive(category, title);
        let update = service.add_to_plan(&assessment.id, &resource_id, None, now)?;
        report_change(&format!("add {title}"), &update);
    }

    let duplicate = ResourceId::derive(ResourceCategory::Money, "Uber Eats Delivery");
    let update = service.add_to_plan(&assessment.id, &duplicate, None, now)?;
    report_change("add Uber Eats Delivery again", &update);

    let plan = service.plan(&assessment.id, now)?;
    let finished: Vec<_> = plan
        .selected_resources
        .iter()
        .take(2)
        .map(|task| task.id.clone())
        .collect();
    for task_id in &finished {
        let update = service.update_task_status(&assessment.id, task_id, TaskStatus::Done, now)?;
        report_change(&format!("complete {task_id}"), &update);
    }

    let update = service.lock_plan(&assessment.id, now)?;
    report_change("lock plan", &update);

    if let Some(last) = update.plan.selected_resources.last() {
        let removal = service.remove_task(&assessment.id, &last.id, now)?;
        report_change(&format!("remove {}", last.resource_title), &removal);
    }

    let plan = service.plan(&assessment.id, now)?;
    render_plan(&plan);
    let progress = service.progress(&assessment.id, now)?;
    println!(
        "\nProgress: {}/{} tasks done | {}% | {}",
        progress.completed,
        progress.total,
        progress.percentage,
        progress.status.label()
    );

    Ok(())
}

fn demo_answers() -> AnswerSet {
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
        previous_experience: vec![PriorExperience::Warehouse],
    }
}

fn render_snapshot(assessment: &Assessment) {
    let profile = &assessment.profile;
    println!("\nAssessment {}", assessment.id);
    println!("- Stability level: {}", profile.stability_level.label());
    println!("- Mobility score: {}", profile.mobility_score.label());
    println!("- Income flexibility: {}", profile.income_flexibility.label());
    println!("- Primary constraint: {}", profile.primary_constraint.label());
    println!("- Insight: {}", profile.insight);
}

fn render_narrative(assessment: &Assessment) {
    let narrative = &assessment.financial_plan;
    let horizons = [
        ("Next 7 days", &narrative.next_7_days),
        ("Next 30 days", &narrative.next_30_days),
        ("Next 60-90 days", &narrative.next_60_to_90_days),
    ];
    for (heading, steps) in horizons {
        println!("\n{heading}");
        for step in steps {
            println!("  - {step}");
        }
    }
}

fn render_recommendations(view: &RecommendationView) {
    for category in ResourceCategory::ordered() {
        let entries = view.for_category(category);
        println!("\n{} ({})", category.label(), entries.len());
        if entries.is_empty() {
            println!("  (nothing matched these answers)");
        }
        for entry in entries {
            let marker = if entry.in_plan {
                " [in plan]"
            } else if entry.saved {
                " [saved]"
            } else {
                ""
            };
            println!(
                "  - {} -> {}{}",
                entry.resource.title, entry.resource.link, marker
            );
        }
    }
}

fn render_plan(plan: &FinancialPlan) {
    println!("\nPlan {}", plan.id);
    if let Some(until) = plan.locked_until {
        println!("Locked until {}", until.format("%Y-%m-%d %H:%M UTC"));
    }
    for (phase, tasks) in plan.tasks_by_phase() {
        println!("{} ({})", phase.label(), tasks.len());
        for task in tasks {
            println!(
                "  {}. {} [{}] due {}",
                task.order + 1,
                task.resource_title,
                task.status.label(),
                task.due_by
            );
            println!("     {}", task.why);
        }
    }
}

fn report_change(action: &str, update: &PlanUpdate) {
    match update.change.rejection() {
        None => println!("  {action}: applied"),
        Some(rejection) => println!("  {action}: skipped ({})", rejection.summary()),
    }
}
