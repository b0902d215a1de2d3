use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use herd_insight::error::AppError;
use herd_insight::predictions::{
    MeasurementRecord, NewPrediction, OwnerId, PredictionId, PredictionRepository,
    RepositoryError, StoredPrediction,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local prediction store. Records are appended in arrival order and listed newest
/// first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPredictionRepository {
    records: Arc<Mutex<Vec<StoredPrediction>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryPredictionRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredPrediction>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl PredictionRepository for InMemoryPredictionRepository {
    fn create(
        &self,
        owner: &OwnerId,
        prediction: NewPrediction,
    ) -> Result<StoredPrediction, RepositoryError> {
        let mut guard = self.lock()?;
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = StoredPrediction {
            id: PredictionId(format!("pred-{sequence:06}")),
            owner: owner.clone(),
            created_at: Utc::now(),
            measurement: prediction.measurement,
            result: prediction.result,
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<StoredPrediction>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }

    fn delete(&self, id: &PredictionId, owner: &OwnerId) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let position = guard
            .iter()
            .position(|record| &record.id == id && &record.owner == owner)
            .ok_or(RepositoryError::NotFoundOrUnauthorized)?;
        guard.remove(position);
        Ok(())
    }

    fn clear_all(&self, owner: &OwnerId) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|record| &record.owner != owner);
        Ok(before - guard.len())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordBatch {
    Many(Vec<MeasurementRecord>),
    One(Box<MeasurementRecord>),
}

/// Parse a JSON document holding either one measurement record or an array of them.
pub(crate) fn parse_records(raw: &str) -> Result<Vec<MeasurementRecord>, AppError> {
    let batch: RecordBatch = serde_json::from_str(raw)?;
    Ok(match batch {
        RecordBatch::Many(records) => records,
        RecordBatch::One(record) => vec![*record],
    })
}

pub(crate) fn load_records(path: &Path) -> Result<Vec<MeasurementRecord>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_records(&raw)
}
