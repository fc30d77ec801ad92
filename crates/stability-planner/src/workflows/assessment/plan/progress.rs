use serde::{Deserialize, Serialize};

use super::domain::{PlanTask, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressStatus {
    #[serde(rename = "At Risk")]
    AtRisk,
    Stabilizing,
    Improving,
}

impl ProgressStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AtRisk => "At Risk",
            Self::Stabilizing => "Stabilizing",
            Self::Improving => "Improving",
        }
    }

    fn from_percentage(percentage: u8) -> Self {
        if percentage >= 71 {
            Self::Improving
        } else if percentage >= 26 {
            Self::Stabilizing
        } else {
            Self::AtRisk
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanProgress {
    pub total: usize,
    pub completed: usize,
    pub percentage: u8,
    pub status: ProgressStatus,
}

impl PlanProgress {
    pub fn from_tasks(tasks: &[PlanTask]) -> Self {
        let total = tasks.len();
        let completed = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Done)
            .count();

        if total == 0 {
            return Self {
                total,
                completed,
                percentage: 0,
                status: ProgressStatus::AtRisk,
            };
        }

        let percentage = ((completed as f64 / total as f64) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8;

        Self {
            total,
            completed,
            percentage,
            status: ProgressStatus::from_percentage(percentage),
        }
    }
}
