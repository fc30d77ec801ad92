use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::super::domain::AssessmentId;
use super::super::recommend::{Resource, ResourceCategory, ResourceId, ResourceLink};

/// Plan horizon a task is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanPhase {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "60d")]
    SixtyDays,
}

impl PlanPhase {
    pub const fn ordered() -> [Self; 3] {
        [Self::Immediate, Self::ThirtyDays, Self::SixtyDays]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::ThirtyDays => "30d",
            Self::SixtyDays => "60d",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "Immediate (0-7 days)",
            Self::ThirtyDays => "30-Day Stabilization",
            Self::SixtyDays => "60-90 Day Growth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn generate() -> Self {
        Self(format!("task-{}", Uuid::new_v4().simple()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn generate() -> Self {
        Self(format!("plan-{}", Uuid::new_v4().simple()))
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resource the user committed to, tracked through to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTask {
    pub id: TaskId,
    pub resource_id: ResourceId,
    pub resource_title: String,
    pub resource_category: ResourceCategory,
    pub resource_link: ResourceLink,
    pub status: TaskStatus,
    pub phase: PlanPhase,
    pub order: u32,
    pub due_by: NaiveDate,
    pub why: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanTask {
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// A resource parked for later, without any task tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResource {
    pub resource_id: ResourceId,
    pub resource: Resource,
    pub saved_at: DateTime<Utc>,
}

/// Task-based action plan; exactly one per assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPlan {
    pub id: PlanId,
    pub assessment_id: AssessmentId,
    pub selected_resources: Vec<PlanTask>,
    pub saved_resources: Vec<SavedResource>,
    pub dismissed_resources: Vec<ResourceId>,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialPlan {
    pub fn new(assessment_id: AssessmentId, now: DateTime<Utc>) -> Self {
        Self {
            id: PlanId::generate(),
            assessment_id,
            selected_resources: Vec::new(),
            saved_resources: Vec::new(),
            dismissed_resources: Vec::new(),
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_resource_in_plan(&self, resource_id: &ResourceId) -> bool {
        self.selected_resources
            .iter()
            .any(|task| &task.resource_id == resource_id)
    }

    pub fn is_resource_saved(&self, resource_id: &ResourceId) -> bool {
        self.saved_resources
            .iter()
            .any(|saved| &saved.resource_id == resource_id)
    }

    pub fn is_resource_dismissed(&self, resource_id: &ResourceId) -> bool {
        self.dismissed_resources.contains(resource_id)
    }

    /// The lock expiry if the plan is still locked at `now`.
    pub fn active_lock(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_until.filter(|until| *until > now)
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.active_lock(now).is_some()
    }

    /// Drop a lock whose expiry has passed. Returns true when the plan changed and
    /// needs to be persisted.
    pub fn clear_expired_lock(&mut self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) if until <= now => {
                self.locked_until = None;
                self.updated_at = now;
                true
            }
            _ => false,
        }
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&PlanTask> {
        self.selected_resources.iter().find(|task| &task.id == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: &TaskId) -> Option<&mut PlanTask> {
        self.selected_resources
            .iter_mut()
            .find(|task| &task.id == task_id)
    }

    pub fn phase_count(&self, phase: PlanPhase) -> usize {
        self.selected_resources
            .iter()
            .filter(|task| task.phase == phase)
            .count()
    }

    /// Tasks of one phase sorted by their `order`.
    pub fn tasks_in_phase(&self, phase: PlanPhase) -> Vec<&PlanTask> {
        let mut tasks: Vec<&PlanTask> = self
            .selected_resources
            .iter()
            .filter(|task| task.phase == phase)
            .collect();
        tasks.sort_by_key(|task| task.order);
        tasks
    }

    /// All tasks grouped by phase, each group sorted by `order`.
    pub fn tasks_by_phase(&self) -> Vec<(PlanPhase, Vec<&PlanTask>)> {
        PlanPhase::ordered()
            .into_iter()
            .map(|phase| (phase, self.tasks_in_phase(phase)))
            .collect()
    }
}

/// Tunables for due dates and the commitment lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSettings {
    pub lock_days: i64,
    pub due_days_immediate: i64,
    pub due_days_30d: i64,
    pub due_days_60d: i64,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            lock_days: 7,
            due_days_immediate: 2,
            due_days_30d: 14,
            due_days_60d: 45,
        }
    }
}

impl PlanSettings {
    pub fn default_due_days(&self, phase: PlanPhase) -> i64 {
        match phase {
            PlanPhase::Immediate => self.due_days_immediate,
            PlanPhase::ThirtyDays => self.due_days_30d,
            PlanPhase::SixtyDays => self.due_days_60d,
        }
    }

    /// Default due date for a task added on `today`. The service passes the UTC date of
    /// its clock, so callers in other time zones see dates roll over at UTC midnight.
    pub fn due_date(&self, phase: PlanPhase, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.default_due_days(phase))
    }

    pub fn lock_duration(&self) -> Duration {
        Duration::days(self.lock_days)
    }
}
