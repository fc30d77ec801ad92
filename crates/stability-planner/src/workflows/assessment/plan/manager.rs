use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::Assessment;
use super::super::recommend::{Resource, ResourceId};
use super::domain::{
    FinancialPlan, PlanPhase, PlanSettings, PlanTask, SavedResource, TaskId, TaskStatus,
};
use super::phase::suggest_phase;
use super::progress::PlanProgress;
use super::rationale;

/// Result of a plan mutation. Policy refusals are values, not errors.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "reason")]
pub enum PlanChange {
    Applied,
    Rejected(Rejection),
}

impl PlanChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, PlanChange::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            PlanChange::Applied => None,
            PlanChange::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<Rejection> for PlanChange {
    fn from(value: Rejection) -> Self {
        PlanChange::Rejected(value)
    }
}

/// Why a plan mutation left the plan untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    AlreadyInPlan,
    AlreadySaved,
    AlreadyDismissed,
    Locked { until: DateTime<Utc> },
    TaskNotFound(TaskId),
    AtBoundary,
}

impl Rejection {
    pub fn summary(&self) -> String {
        match self {
            Rejection::AlreadyInPlan => "resource is already in the plan".to_string(),
            Rejection::AlreadySaved => "resource is already saved for later".to_string(),
            Rejection::AlreadyDismissed => "resource was already dismissed".to_string(),
            Rejection::Locked { until } => {
                format!("plan is locked until {}", until.format("%Y-%m-%d %H:%M UTC"))
            }
            Rejection::TaskNotFound(id) => format!("task {id} is not in the plan"),
            Rejection::AtBoundary => "task is already at the edge of its phase".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Several task fields changed together. A locked plan refuses the whole edit when it
/// touches anything besides the status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub status: Option<TaskStatus>,
    pub due_by: Option<NaiveDate>,
    /// Replacement notes; blank text clears them.
    pub notes: Option<String>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.due_by.is_none() && self.notes.is_none()
    }

    fn needs_unlocked_plan(&self) -> bool {
        self.due_by.is_some() || self.notes.is_some()
    }
}

/// A resource waiting for the user to confirm (or change) its phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAddition {
    pub resource: Resource,
    pub resource_id: ResourceId,
    pub suggested_phase: PlanPhase,
}

/// Owns one plan snapshot and applies user actions to it.
///
/// The manager never persists; callers save [`PlanManager::into_plan`] after an
/// [`PlanChange::Applied`] result.
#[derive(Debug)]
pub struct PlanManager<'a> {
    plan: FinancialPlan,
    assessment: &'a Assessment,
    settings: PlanSettings,
}

impl<'a> PlanManager<'a> {
    pub fn new(plan: FinancialPlan, assessment: &'a Assessment, settings: PlanSettings) -> Self {
        Self {
            plan,
            assessment,
            settings,
        }
    }

    pub fn plan(&self) -> &FinancialPlan {
        &self.plan
    }

    pub fn into_plan(self) -> FinancialPlan {
        self.plan
    }

    pub fn progress(&self) -> PlanProgress {
        PlanProgress::from_tasks(&self.plan.selected_resources)
    }

    /// First half of "add to plan": compute the default phase without committing anything.
    pub fn propose_addition(&self, resource: &Resource) -> Result<PendingAddition, Rejection> {
        let resource_id = resource.id();
        if self.plan.is_resource_in_plan(&resource_id) {
            return Err(Rejection::AlreadyInPlan);
        }

        Ok(PendingAddition {
            resource: resource.clone(),
            resource_id,
            suggested_phase: suggest_phase(resource.category, self.assessment),
        })
    }

    /// Commit a pending addition into `phase`, appended to the end of that phase. The due
    /// date counts from the UTC calendar date of `now`.
    pub fn confirm_addition(
        &mut self,
        pending: PendingAddition,
        phase: PlanPhase,
        now: DateTime<Utc>,
    ) -> PlanChange {
        let PendingAddition { resource, .. } = pending;
        // The proposal may be stale by the time it is confirmed.
        let resource_id = resource.id();
        if self.plan.is_resource_in_plan(&resource_id) {
            return Rejection::AlreadyInPlan.into();
        }

        let order = self.plan.phase_count(phase) as u32;
        let task = PlanTask {
            id: TaskId::generate(),
            resource_id: resource_id.clone(),
            resource_title: resource.title.clone(),
            resource_category: resource.category,
            resource_link: resource.link.clone(),
            status: TaskStatus::NotStarted,
            phase,
            order,
            due_by: self.settings.due_date(phase, now.date_naive()),
            why: rationale::explain(&resource, self.assessment),
            notes: None,
            created_at: now,
            updated_at: now,
        };

        self.plan.selected_resources.push(task);
        self.plan
            .saved_resources
            .retain(|saved| saved.resource_id != resource_id);
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    /// Propose and immediately confirm, using the suggested phase unless one is given.
    pub fn add_to_plan(
        &mut self,
        resource: &Resource,
        phase: Option<PlanPhase>,
        now: DateTime<Utc>,
    ) -> PlanChange {
        match self.propose_addition(resource) {
            Ok(pending) => {
                let phase = phase.unwrap_or(pending.suggested_phase);
                self.confirm_addition(pending, phase, now)
            }
            Err(rejection) => rejection.into(),
        }
    }

    pub fn save_for_later(&mut self, resource: &Resource, now: DateTime<Utc>) -> PlanChange {
        let resource_id = resource.id();
        if self.plan.is_resource_in_plan(&resource_id) {
            return Rejection::AlreadyInPlan.into();
        }
        if self.plan.is_resource_saved(&resource_id) {
            return Rejection::AlreadySaved.into();
        }

        self.plan.saved_resources.push(SavedResource {
            resource_id,
            resource: resource.clone(),
            saved_at: now,
        });
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    /// Hide a resource from future recommendation views. There is no undo.
    pub fn dismiss(&mut self, resource_id: &ResourceId, now: DateTime<Utc>) -> PlanChange {
        if self.plan.is_resource_dismissed(resource_id) {
            return Rejection::AlreadyDismissed.into();
        }

        self.plan.dismissed_resources.push(resource_id.clone());
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    /// Status changes ignore the lock so progress can be recorded during a commitment
    /// period. Any status may move to any other.
    pub fn update_task_status(
        &mut self,
        task_id: &TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> PlanChange {
        let Some(task) = self.plan.task_mut(task_id) else {
            return Rejection::TaskNotFound(task_id.clone()).into();
        };

        task.status = status;
        task.touch(now);
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    pub fn remove_task(&mut self, task_id: &TaskId, now: DateTime<Utc>) -> PlanChange {
        if let Err(rejection) = self.ensure_unlocked(now) {
            return rejection.into();
        }
        let Some(index) = self
            .plan
            .selected_resources
            .iter()
            .position(|task| &task.id == task_id)
        else {
            return Rejection::TaskNotFound(task_id.clone()).into();
        };

        let removed = self.plan.selected_resources.remove(index);
        self.compact_phase(removed.phase, now);
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    pub fn update_task_due_date(
        &mut self,
        task_id: &TaskId,
        due_by: NaiveDate,
        now: DateTime<Utc>,
    ) -> PlanChange {
        self.edit_unlocked(task_id, now, |task| task.due_by = due_by)
    }

    /// Replace the task notes; blank text clears them.
    pub fn update_task_notes(
        &mut self,
        task_id: &TaskId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> PlanChange {
        let notes = notes.filter(|text| !text.trim().is_empty());
        self.edit_unlocked(task_id, now, |task| task.notes = notes)
    }

    /// Apply every field of `edit` or none of them.
    pub fn edit_task(
        &mut self,
        task_id: &TaskId,
        edit: TaskEdit,
        now: DateTime<Utc>,
    ) -> PlanChange {
        if edit.needs_unlocked_plan() {
            if let Err(rejection) = self.ensure_unlocked(now) {
                return rejection.into();
            }
        }
        let Some(task) = self.plan.task_mut(task_id) else {
            return Rejection::TaskNotFound(task_id.clone()).into();
        };

        let TaskEdit {
            status,
            due_by,
            notes,
        } = edit;
        if let Some(status) = status {
            task.status = status;
        }
        if let Some(due_by) = due_by {
            task.due_by = due_by;
        }
        if let Some(notes) = notes {
            task.notes = Some(notes).filter(|text| !text.trim().is_empty());
        }
        task.touch(now);
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    /// Swap a task with its neighbour in the same phase.
    pub fn reorder_task(
        &mut self,
        task_id: &TaskId,
        direction: ReorderDirection,
        now: DateTime<Utc>,
    ) -> PlanChange {
        if let Err(rejection) = self.ensure_unlocked(now) {
            return rejection.into();
        }
        let Some(phase) = self.plan.task(task_id).map(|task| task.phase) else {
            return Rejection::TaskNotFound(task_id.clone()).into();
        };

        let siblings: Vec<(TaskId, u32)> = self
            .plan
            .tasks_in_phase(phase)
            .into_iter()
            .map(|task| (task.id.clone(), task.order))
            .collect();
        let Some(position) = siblings.iter().position(|(id, _)| id == task_id) else {
            return Rejection::TaskNotFound(task_id.clone()).into();
        };

        let neighbour = match direction {
            ReorderDirection::Up => position.checked_sub(1),
            ReorderDirection::Down => Some(position + 1).filter(|next| *next < siblings.len()),
        };
        let Some(neighbour) = neighbour else {
            return Rejection::AtBoundary.into();
        };

        let (target_id, target_order) = siblings[position].clone();
        let (neighbour_id, neighbour_order) = siblings[neighbour].clone();

        if let Some(task) = self.plan.task_mut(&target_id) {
            task.order = neighbour_order;
            task.touch(now);
        }
        if let Some(task) = self.plan.task_mut(&neighbour_id) {
            task.order = target_order;
            task.touch(now);
        }
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    /// Start a commitment period during which tasks can only change status.
    pub fn lock(&mut self, now: DateTime<Utc>) -> PlanChange {
        if let Err(rejection) = self.ensure_unlocked(now) {
            return rejection.into();
        }

        self.plan.locked_until = Some(now + self.settings.lock_duration());
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    fn ensure_unlocked(&self, now: DateTime<Utc>) -> Result<(), Rejection> {
        match self.plan.active_lock(now) {
            Some(until) => Err(Rejection::Locked { until }),
            None => Ok(()),
        }
    }

    fn edit_unlocked(
        &mut self,
        task_id: &TaskId,
        now: DateTime<Utc>,
        edit: impl FnOnce(&mut PlanTask),
    ) -> PlanChange {
        if let Err(rejection) = self.ensure_unlocked(now) {
            return rejection.into();
        }
        let Some(task) = self.plan.task_mut(task_id) else {
            return Rejection::TaskNotFound(task_id.clone()).into();
        };

        edit(task);
        task.touch(now);
        self.plan.updated_at = now;
        PlanChange::Applied
    }

    // Keep orders dense so appending at `count` never collides.
    fn compact_phase(&mut self, phase: PlanPhase, now: DateTime<Utc>) {
        let ordered: Vec<TaskId> = self
            .plan
            .tasks_in_phase(phase)
            .into_iter()
            .map(|task| task.id.clone())
            .collect();

        for (order, id) in ordered.iter().enumerate() {
            if let Some(task) = self.plan.task_mut(id) {
                if task.order != order as u32 {
                    task.order = order as u32;
                    task.touch(now);
                }
            }
        }
    }
}
