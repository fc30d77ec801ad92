use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::workflows::assessment::answers::{AnswerSet, AnswerSetError, EmploymentStatus};
use crate::workflows::assessment::domain::AssessmentId;
use crate::workflows::assessment::plan::{
    PendingAddition, PlanChange, PlanPhase, PlanSettings, ProgressStatus, Rejection,
    ReorderDirection, TaskEdit, TaskStatus,
};
use crate::workflows::assessment::recommend::{
    Resource, ResourceCategory, ResourceId, ResourceLink,
};
use crate::workflows::assessment::repository::RepositoryError;
use crate::workflows::assessment::{AdditionProposal, AssessmentService, AssessmentServiceError};

fn rental_id() -> ResourceId {
    ResourceId::derive(ResourceCategory::Assistance, "Emergency Rental Assistance")
}

fn delivery_id() -> ResourceId {
    ResourceId::derive(ResourceCategory::Money, "DoorDash Delivery Driver")
}

#[test]
fn submit_scores_and_stores_the_assessment() {
    let (service, repository) = build_service();

    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");

    assert!(assessment.id.0.starts_with("asm-"));
    assert_eq!(assessment.created_at, now());
    assert!(!assessment.suggested_resources.is_empty());
    assert!(!assessment.financial_plan.next_7_days.is_empty());

    let stored = service.get(&assessment.id).expect("stored assessment");
    assert_eq!(stored, assessment);
    assert!(repository.stored_plan(&assessment.id).is_none(), "plan is created lazily");
}

#[test]
fn submit_rejects_incomplete_answers_before_scoring() {
    let (service, repository) = build_service();
    let mut answers = scenario_answers();
    answers.skills.clear();

    match service.submit(answers, now()) {
        Err(AssessmentServiceError::InvalidAnswers(AnswerSetError::MissingSelection {
            field: "skills",
        })) => {}
        other => panic!("expected missing skills, got {other:?}"),
    }
    assert!(repository.assessments.lock().expect("mutex").is_empty());
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();

    match service.get(&AssessmentId("missing".to_string())) {
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn unavailable_store_is_surfaced() {
    let service = AssessmentService::new(Arc::new(UnavailableRepository), PlanSettings::default());

    match service.submit(scenario_answers(), now()) {
        Err(AssessmentServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline");
        }
        other => panic!("expected unavailable error, got {other:?}"),
    }
    assert!(matches!(
        service.plan(&AssessmentId("asm-1".to_string()), now()),
        Err(AssessmentServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn conflicting_insert_is_reported() {
    let service = AssessmentService::new(Arc::new(ConflictRepository), PlanSettings::default());
    assert!(matches!(
        service.submit(scenario_answers(), now()),
        Err(AssessmentServiceError::Repository(RepositoryError::Conflict))
    ));
}

#[test]
fn rescore_replaces_every_derived_field() {
    let (service, _) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");

    let later = now() + Duration::days(1);
    let employed = AnswerSet {
        employment_status: EmploymentStatus::EmployedFullTime,
        ..crisis_answers()
    };
    let rescored = service
        .rescore(&assessment.id, employed.clone(), later)
        .expect("rescore succeeds");

    assert_eq!(rescored.id, assessment.id);
    assert_eq!(rescored.answers, employed);
    assert_eq!(rescored.created_at, now());
    assert_eq!(rescored.updated_at, later);
    assert_ne!(rescored.profile, assessment.profile);
    assert!(rescored.suggested_resources.unemployment.is_empty());
    assert_ne!(rescored.financial_plan, assessment.financial_plan);
}

#[test]
fn rescore_of_unknown_assessment_is_not_found() {
    let (service, _) = build_service();
    assert!(matches!(
        service.rescore(&AssessmentId("asm-missing".to_string()), scenario_answers(), now()),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn plan_is_created_once_per_assessment() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");

    let first = service.plan(&assessment.id, now()).expect("plan created");
    let second = service.plan(&assessment.id, now()).expect("plan loaded");

    assert_eq!(first.id, second.id);
    assert_eq!(first.assessment_id, assessment.id);
    assert_eq!(repository.plans.lock().expect("mutex").len(), 1);
}

#[test]
fn add_propose_and_confirm_persist_through_the_store() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");

    let proposal = service
        .propose_addition(&assessment.id, &rental_id(), now())
        .expect("proposal computed");
    let pending = match proposal {
        AdditionProposal::Ready(pending) => pending,
        other => panic!("expected a ready proposal, got {other:?}"),
    };
    assert_eq!(pending.suggested_phase, PlanPhase::Immediate);

    let update = service
        .confirm_addition(&assessment.id, pending, PlanPhase::ThirtyDays, now())
        .expect("confirmation succeeds");
    assert!(update.change.is_applied());

    let stored = repository
        .stored_plan(&assessment.id)
        .expect("plan persisted");
    assert_eq!(stored.selected_resources.len(), 1);
    assert_eq!(stored.selected_resources[0].phase, PlanPhase::ThirtyDays);

    let again = service
        .propose_addition(&assessment.id, &rental_id(), now())
        .expect("proposal computed");
    assert_eq!(
        again,
        AdditionProposal::Rejected {
            reason: Rejection::AlreadyInPlan
        }
    );
}

#[test]
fn rejected_changes_are_not_persisted() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");

    let first = service
        .add_to_plan(&assessment.id, &delivery_id(), None, now())
        .expect("add succeeds");
    assert!(first.change.is_applied());
    let writes = repository.plan_writes();

    let second = service
        .add_to_plan(&assessment.id, &delivery_id(), None, now())
        .expect("duplicate is not an error");
    assert_eq!(second.change, PlanChange::Rejected(Rejection::AlreadyInPlan));
    assert_eq!(second.plan.selected_resources.len(), 1);
    assert_eq!(repository.plan_writes(), writes);
}

#[test]
fn unknown_resource_is_an_error() {
    let (service, _) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let bogus = ResourceId("money_lotterytickets".to_string());

    match service.add_to_plan(&assessment.id, &bogus, None, now()) {
        Err(AssessmentServiceError::UnknownResource(id)) => assert_eq!(id, bogus),
        other => panic!("expected unknown resource, got {other:?}"),
    }
}

#[test]
fn saved_resource_survives_a_rescore_that_drops_it() {
    let (service, _) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let resume = ResourceId::derive(ResourceCategory::Unemployment, "Build Your Resume");

    assert!(service
        .save_for_later(&assessment.id, &resume, now())
        .expect("save succeeds")
        .change
        .is_applied());

    let employed = AnswerSet {
        employment_status: EmploymentStatus::EmployedFullTime,
        ..scenario_answers()
    };
    service
        .rescore(&assessment.id, employed, now())
        .expect("rescore succeeds");

    let update = service
        .add_to_plan(&assessment.id, &resume, None, now())
        .expect("saved resource can still be added");
    assert!(update.change.is_applied());
    assert!(update.plan.saved_resources.is_empty());
    assert_eq!(update.plan.selected_resources[0].phase, PlanPhase::ThirtyDays);
}

#[test]
fn recommendations_hide_dismissed_and_flag_membership() {
    let (service, _) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let snap = ResourceId::derive(ResourceCategory::Assistance, "SNAP Food Assistance");

    service
        .add_to_plan(&assessment.id, &rental_id(), None, now())
        .expect("add succeeds");
    service
        .dismiss(&assessment.id, &snap, now())
        .expect("dismiss succeeds");

    let view = service
        .recommendations(&assessment.id, now())
        .expect("view builds");
    assert_eq!(
        view.len(),
        assessment.suggested_resources.len() - 1,
        "only the dismissed entry is hidden"
    );
    assert!(view.assistance.iter().all(|entry| entry.resource_id != snap));
    let rental = view
        .assistance
        .iter()
        .find(|entry| entry.resource_id == rental_id())
        .expect("rental entry present");
    assert!(rental.in_plan);
    assert!(!rental.saved);
}

#[test]
fn locked_plan_blocks_removal_but_accepts_progress() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let added = service
        .add_to_plan(&assessment.id, &delivery_id(), None, now())
        .expect("add succeeds");
    let task_id = added.plan.selected_resources[0].id.clone();

    let locked = service.lock_plan(&assessment.id, now()).expect("lock applies");
    assert!(locked.change.is_applied());
    assert_eq!(locked.plan.locked_until, Some(now() + Duration::days(7)));

    let removal = service
        .remove_task(&assessment.id, &task_id, now() + Duration::days(1))
        .expect("removal evaluated");
    assert!(matches!(
        removal.change,
        PlanChange::Rejected(Rejection::Locked { .. })
    ));
    assert_eq!(removal.plan.selected_resources.len(), 1);

    let status = service
        .update_task_status(&assessment.id, &task_id, TaskStatus::Done, now())
        .expect("status evaluated");
    assert!(status.change.is_applied());

    let progress = service
        .progress(&assessment.id, now())
        .expect("progress computed");
    assert_eq!(progress.percentage, 100);
    assert_eq!(progress.status, ProgressStatus::Improving);
    assert_eq!(
        repository
            .stored_plan(&assessment.id)
            .expect("plan stored")
            .selected_resources[0]
            .status,
        TaskStatus::Done
    );
}

#[test]
fn expired_lock_is_cleared_and_persisted_on_read() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    service.lock_plan(&assessment.id, now()).expect("lock applies");

    let after_expiry = now() + Duration::days(8);
    let plan = service
        .plan(&assessment.id, after_expiry)
        .expect("plan loads");
    assert_eq!(plan.locked_until, None);
    assert_eq!(
        repository
            .stored_plan(&assessment.id)
            .expect("plan stored")
            .locked_until,
        None
    );
}

#[test]
fn plan_settings_drive_lock_and_due_dates() {
    let repository = Arc::new(MemoryRepository::default());
    let settings = PlanSettings {
        lock_days: 3,
        due_days_immediate: 1,
        ..PlanSettings::default()
    };
    let service = AssessmentService::new(repository, settings);
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");

    let added = service
        .add_to_plan(&assessment.id, &delivery_id(), None, now())
        .expect("add succeeds");
    assert_eq!(
        added.plan.selected_resources[0].due_by,
        now().date_naive() + Duration::days(1)
    );

    let locked = service.lock_plan(&assessment.id, now()).expect("lock applies");
    assert_eq!(locked.plan.locked_until, Some(now() + Duration::days(3)));
}

#[test]
fn edits_reorder_and_remove_round_trip() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let instacart = ResourceId::derive(ResourceCategory::Money, "Instacart Shopper");

    service
        .add_to_plan(&assessment.id, &delivery_id(), None, now())
        .expect("add succeeds");
    let update = service
        .add_to_plan(&assessment.id, &instacart, None, now())
        .expect("add succeeds");
    let first = update.plan.tasks_in_phase(PlanPhase::Immediate)[0].id.clone();
    let second = update.plan.tasks_in_phase(PlanPhase::Immediate)[1].id.clone();

    let due = now().date_naive() + Duration::days(10);
    assert!(service
        .update_task_due_date(&assessment.id, &first, due, now())
        .expect("due date evaluated")
        .change
        .is_applied());
    assert!(service
        .update_task_notes(&assessment.id, &first, Some("sign up".to_string()), now())
        .expect("notes evaluated")
        .change
        .is_applied());
    assert!(service
        .reorder_task(&assessment.id, &first, ReorderDirection::Down, now())
        .expect("reorder evaluated")
        .change
        .is_applied());

    let plan = repository.stored_plan(&assessment.id).expect("plan stored");
    let ordered = plan.tasks_in_phase(PlanPhase::Immediate);
    assert_eq!(ordered[0].id, second);
    assert_eq!(ordered[1].id, first);
    assert_eq!(ordered[1].due_by, due);
    assert_eq!(ordered[1].notes.as_deref(), Some("sign up"));

    let removed = service
        .remove_task(&assessment.id, &second, now())
        .expect("removal evaluated");
    assert!(removed.change.is_applied());
    let remaining = removed.plan.tasks_in_phase(PlanPhase::Immediate);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].order, 0);
}

#[test]
fn confirming_an_unrecommended_resource_is_an_error() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let invented = Resource::new(
        "Anything",
        ResourceCategory::Money,
        ResourceLink::external("https://example.com"),
    );
    let pending = PendingAddition {
        resource_id: invented.id(),
        resource: invented,
        suggested_phase: PlanPhase::Immediate,
    };

    match service.confirm_addition(&assessment.id, pending, PlanPhase::Immediate, now()) {
        Err(AssessmentServiceError::UnknownResource(id)) => {
            assert_eq!(id.as_str(), "money_anything")
        }
        other => panic!("expected unknown resource, got {other:?}"),
    }
    let stored = repository.stored_plan(&assessment.id);
    assert!(stored.map_or(true, |plan| plan.selected_resources.is_empty()));
}

#[test]
fn confirmation_uses_the_recommended_copy_of_the_resource() {
    let (service, _) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let pending = PendingAddition {
        resource_id: rental_id(),
        resource: Resource::new(
            "Emergency Rental Assistance",
            ResourceCategory::Assistance,
            ResourceLink::external("https://phishing.example"),
        ),
        suggested_phase: PlanPhase::Immediate,
    };

    let update = service
        .confirm_addition(&assessment.id, pending, PlanPhase::Immediate, now())
        .expect("confirmation succeeds");
    assert!(update.change.is_applied());
    assert_eq!(
        update.plan.selected_resources[0].resource_link.as_str(),
        "https://www.consumerfinance.gov/renthelp/"
    );
}

#[test]
fn rejected_multi_field_edit_saves_nothing() {
    let (service, repository) = build_service();
    let assessment = service
        .submit(scenario_answers(), now())
        .expect("submission succeeds");
    let added = service
        .add_to_plan(&assessment.id, &delivery_id(), None, now())
        .expect("add succeeds");
    let task_id = added.plan.selected_resources[0].id.clone();
    assert!(service
        .lock_plan(&assessment.id, now())
        .expect("lock evaluated")
        .change
        .is_applied());
    let writes = repository.plan_writes();

    let edit = TaskEdit {
        status: Some(TaskStatus::Done),
        notes: Some("called them".to_string()),
        ..TaskEdit::default()
    };
    let update = service
        .edit_task(&assessment.id, &task_id, edit, now())
        .expect("edit evaluated");
    assert!(matches!(
        update.change,
        PlanChange::Rejected(Rejection::Locked { .. })
    ));
    assert_eq!(repository.plan_writes(), writes);
    let stored = repository.stored_plan(&assessment.id).expect("plan stored");
    assert_eq!(stored.selected_resources[0].status, TaskStatus::NotStarted);
    assert_eq!(stored.selected_resources[0].notes, None);
}
