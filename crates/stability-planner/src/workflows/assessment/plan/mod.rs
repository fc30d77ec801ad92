//! Phased action plan: tasks created from recommended resources, tracked through
//! completion, with a time-boxed commitment lock.

pub mod domain;
mod manager;
mod phase;
mod progress;
mod rationale;

pub use domain::{
    FinancialPlan, PlanId, PlanPhase, PlanSettings, PlanTask, SavedResource, TaskId, TaskStatus,
};
pub use manager::{
    PendingAddition, PlanChange, PlanManager, Rejection, ReorderDirection, TaskEdit,
};
pub use phase::suggest_phase;
pub use progress::{PlanProgress, ProgressStatus};
pub use rationale::explain as explain_resource;
