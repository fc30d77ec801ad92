use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use stability_planner::workflows::assessment::{
    Assessment, AssessmentId, AssessmentRepository, AssessmentUpdate, FinancialPlan,
    RepositoryError,
};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
    plans: Arc<Mutex<HashMap<AssessmentId, FinancialPlan>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert_assessment(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = lock(&self.assessments)?;
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update_assessment(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Assessment, RepositoryError> {
        let mut guard = lock(&self.assessments)?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply(stored);
        Ok(stored.clone())
    }

    fn fetch_assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(lock(&self.assessments)?.get(id).cloned())
    }

    fn insert_plan(&self, plan: FinancialPlan) -> Result<FinancialPlan, RepositoryError> {
        let mut guard = lock(&self.plans)?;
        if guard.contains_key(&plan.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(plan.assessment_id.clone(), plan.clone());
        Ok(plan)
    }

    fn update_plan(&self, plan: FinancialPlan) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.plans)?;
        if guard.contains_key(&plan.assessment_id) {
            guard.insert(plan.assessment_id.clone(), plan);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_plan_for_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Option<FinancialPlan>, RepositoryError> {
        Ok(lock(&self.plans)?.get(assessment_id).cloned())
    }
}

/// Everything the file store holds, rewritten in full on every change.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    #[serde(default)]
    assessments: Vec<Assessment>,
    #[serde(default)]
    plans: Vec<FinancialPlan>,
}

/// Single-process JSON file store. Any read or write failure surfaces as
/// [`RepositoryError::Unavailable`].
#[derive(Debug)]
pub(crate) struct JsonFileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Open the store, failing early when an existing file cannot be parsed.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let repository = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        repository.read()?;
        Ok(repository)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreDocument, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StoreDocument::default()),
            Err(err) => return Err(unavailable(&self.path, err)),
        };
        if raw.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        serde_json::from_str(&raw).map_err(|err| unavailable(&self.path, err))
    }

    fn write(&self, document: &StoreDocument) -> Result<(), RepositoryError> {
        let json =
            serde_json::to_string_pretty(document).map_err(|err| unavailable(&self.path, err))?;
        fs::write(&self.path, json).map_err(|err| unavailable(&self.path, err))
    }

    fn modify<T>(
        &self,
        change: impl FnOnce(&mut StoreDocument) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = lock(&self.write_lock)?;
        let mut document = self.read()?;
        let value = change(&mut document)?;
        self.write(&document)?;
        Ok(value)
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}

impl AssessmentRepository for JsonFileRepository {
    fn insert_assessment(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        self.modify(|document| {
            if document.assessments.iter().any(|a| a.id == assessment.id) {
                return Err(RepositoryError::Conflict);
            }
            document.assessments.push(assessment.clone());
            Ok(assessment)
        })
    }

    fn update_assessment(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Assessment, RepositoryError> {
        self.modify(|document| {
            let stored = document
                .assessments
                .iter_mut()
                .find(|a| &a.id == id)
                .ok_or(RepositoryError::NotFound)?;
            update.apply(stored);
            Ok(stored.clone())
        })
    }

    fn fetch_assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self
            .read()?
            .assessments
            .into_iter()
            .find(|a| &a.id == id))
    }

    fn insert_plan(&self, plan: FinancialPlan) -> Result<FinancialPlan, RepositoryError> {
        self.modify(|document| {
            if document
                .plans
                .iter()
                .any(|p| p.assessment_id == plan.assessment_id)
            {
                return Err(RepositoryError::Conflict);
            }
            document.plans.push(plan.clone());
            Ok(plan)
        })
    }

    fn update_plan(&self, plan: FinancialPlan) -> Result<(), RepositoryError> {
        self.modify(|document| {
            let stored = document
                .plans
                .iter_mut()
                .find(|p| p.assessment_id == plan.assessment_id)
                .ok_or(RepositoryError::NotFound)?;
            *stored = plan;
            Ok(())
        })
    }

    fn fetch_plan_for_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Option<FinancialPlan>, RepositoryError> {
        Ok(self
            .read()?
            .plans
            .into_iter()
            .find(|p| &p.assessment_id == assessment_id))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Midnight UTC on `today`, or the current instant when no date was given.
pub(crate) fn clock(today: Option<NaiveDate>) -> DateTime<Utc> {
    match today {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    }
}
