use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::answers::AnswerSet;
use super::domain::AssessmentId;
use super::plan::{
    FinancialPlan, PlanChange, PlanPhase, Rejection, ReorderDirection, TaskEdit, TaskId,
    TaskStatus,
};
use super::recommend::ResourceId;
use super::repository::{AssessmentRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError, PlanUpdate};

type SharedService<R> = State<Arc<AssessmentService<R>>>;

/// Router builder exposing assessment and plan endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(submit_handler::<R>))
        .route("/api/v1/assessments/:assessment_id", get(fetch_handler::<R>))
        .route(
            "/api/v1/assessments/:assessment_id/answers",
            put(rescore_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/resources",
            get(resources_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan",
            get(plan_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/progress",
            get(progress_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/lock",
            post(lock_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/proposals",
            post(propose_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/tasks",
            post(add_task_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/saved",
            post(save_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/dismissed",
            post(dismiss_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/tasks/:task_id",
            patch(edit_task_handler::<R>).delete(remove_task_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/plan/tasks/:task_id/reorder",
            post(reorder_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceRequest {
    pub(crate) resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddTaskRequest {
    pub(crate) resource_id: ResourceId,
    #[serde(default)]
    pub(crate) phase: Option<PlanPhase>,
}

/// Partial task edit. An empty `notes` string clears the notes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskEditRequest {
    #[serde(default)]
    pub(crate) status: Option<TaskStatus>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    #[serde(default)]
    pub(crate) due_by: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReorderRequest {
    pub(crate) direction: ReorderDirection,
}

/// Wire shape for every plan mutation.
#[derive(Debug, Serialize)]
pub(crate) struct PlanChangeResponse {
    pub(crate) applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rejection: Option<Rejection>,
    pub(crate) plan: FinancialPlan,
}

impl From<PlanUpdate> for PlanChangeResponse {
    fn from(update: PlanUpdate) -> Self {
        let rejection = update.change.rejection().cloned();
        Self {
            applied: update.change.is_applied(),
            reason: rejection.as_ref().map(Rejection::summary),
            rejection,
            plan: update.plan,
        }
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): SharedService<R>,
    Json(answers): Json<AnswerSet>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.submit(answers, Utc::now()) {
        Ok(assessment) => (StatusCode::CREATED, Json(assessment)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.get(&AssessmentId(assessment_id)) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn rescore_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
    Json(answers): Json<AnswerSet>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.rescore(&AssessmentId(assessment_id), answers, Utc::now()) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn resources_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.recommendations(&AssessmentId(assessment_id), Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn plan_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.plan(&AssessmentId(assessment_id), Utc::now()) {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.progress(&AssessmentId(assessment_id), Utc::now()) {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn lock_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    plan_change_response(service.lock_plan(&AssessmentId(assessment_id), Utc::now()))
}

pub(crate) async fn propose_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
    Json(request): Json<ResourceRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.propose_addition(&id, &request.resource_id, Utc::now()) {
        Ok(proposal) => (StatusCode::OK, Json(proposal)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn add_task_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
    Json(request): Json<AddTaskRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    plan_change_response(service.add_to_plan(
        &id,
        &request.resource_id,
        request.phase,
        Utc::now(),
    ))
}

pub(crate) async fn save_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
    Json(request): Json<ResourceRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    plan_change_response(service.save_for_later(&id, &request.resource_id, Utc::now()))
}

pub(crate) async fn dismiss_handler<R>(
    State(service): SharedService<R>,
    Path(assessment_id): Path<String>,
    Json(request): Json<ResourceRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    plan_change_response(service.dismiss(&id, &request.resource_id, Utc::now()))
}

pub(crate) async fn edit_task_handler<R>(
    State(service): SharedService<R>,
    Path((assessment_id, task_id)): Path<(String, String)>,
    Json(request): Json<TaskEditRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let TaskEditRequest {
        status,
        notes,
        due_by,
    } = request;
    let edit = TaskEdit {
        status,
        due_by,
        notes,
    };
    if edit.is_empty() {
        let payload = json!({ "error": "request must change status, notes, or dueBy" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let id = AssessmentId(assessment_id);
    plan_change_response(service.edit_task(&id, &TaskId(task_id), edit, Utc::now()))
}

pub(crate) async fn remove_task_handler<R>(
    State(service): SharedService<R>,
    Path((assessment_id, task_id)): Path<(String, String)>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    plan_change_response(service.remove_task(&id, &TaskId(task_id), Utc::now()))
}

pub(crate) async fn reorder_handler<R>(
    State(service): SharedService<R>,
    Path((assessment_id, task_id)): Path<(String, String)>,
    Json(request): Json<ReorderRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    plan_change_response(service.reorder_task(
        &id,
        &TaskId(task_id),
        request.direction,
        Utc::now(),
    ))
}

fn plan_change_response(result: Result<PlanUpdate, AssessmentServiceError>) -> Response {
    match result {
        Ok(update) => {
            let status = match &update.change {
                PlanChange::Rejected(Rejection::TaskNotFound(_)) => StatusCode::NOT_FOUND,
                _ => StatusCode::OK,
            };
            (status, Json(PlanChangeResponse::from(update))).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::InvalidAnswers(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::UnknownResource(_)
        | AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            warn!(%reason, "assessment store unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
