use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::IdentityConfig;
use crate::predictions::domain::{
    Breed, DiseaseStatus, FeedType, HousingCondition, LactationStage, MeasurementRecord,
    NewPrediction, OwnerId, PredictionId, PredictionResult, StoredPrediction,
};
use crate::predictions::repository::{PredictionRepository, RepositoryError};
use crate::predictions::{prediction_router, PredictionService};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

/// Healthy peak-lactation Holstein with every reading inside the normal bands.
pub(super) fn baseline_record() -> MeasurementRecord {
    MeasurementRecord {
        animal_id: "COW-001".to_string(),
        breed: Breed::Holstein,
        age: 4.0,
        weight: 600.0,
        lactation_stage: LactationStage::Peak,
        parity: 2,
        prev_yield: 22.5,
        feed_type: FeedType::HighQuality,
        feed_qty: 20.0,
        walking_km: 5.0,
        rumination_hr: 8.0,
        resting_hr: 10.0,
        body_temp: 39.0,
        heart_rate: 70.0,
        somatic_cell_count: 150_000.0,
        ambient_temp: 25.0,
        humidity: 50.0,
        housing_condition: HousingCondition::Good,
        activity_alerts: 0,
    }
}

pub(super) fn mastitis_record() -> MeasurementRecord {
    MeasurementRecord {
        animal_id: "COW-002".to_string(),
        somatic_cell_count: 250_000.0,
        ..baseline_record()
    }
}

pub(super) fn fever_record() -> MeasurementRecord {
    MeasurementRecord {
        animal_id: "COW-003".to_string(),
        body_temp: 40.0,
        heart_rate: 90.0,
        somatic_cell_count: 100_000.0,
        ambient_temp: 20.0,
        humidity: 40.0,
        ..baseline_record()
    }
}

pub(super) fn owner(name: &str) -> OwnerId {
    OwnerId(name.to_string())
}

pub(super) fn stored(
    sequence: i64,
    animal_id: &str,
    status: DiseaseStatus,
    predicted_milk_yield: f64,
) -> StoredPrediction {
    let base = Utc
        .with_ymd_and_hms(2025, 3, 1, 6, 0, 0)
        .single()
        .expect("valid timestamp");
    StoredPrediction {
        id: PredictionId(format!("pred-{sequence:06}")),
        owner: owner("farmer-a"),
        created_at: base + Duration::hours(sequence),
        measurement: MeasurementRecord {
            animal_id: animal_id.to_string(),
            ..baseline_record()
        },
        result: PredictionResult {
            predicted_milk_yield,
            disease_status: status,
            disease_probability: if status == DiseaseStatus::Healthy {
                0.9
            } else {
                0.4
            },
            recommendations: status.recommendation().to_string(),
        },
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<StoredPrediction>>,
    sequence: AtomicU64,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl PredictionRepository for MemoryRepository {
    fn create(
        &self,
        owner: &OwnerId,
        prediction: NewPrediction,
    ) -> Result<StoredPrediction, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = StoredPrediction {
            id: PredictionId(format!("pred-{id:06}")),
            owner: owner.clone(),
            created_at: Utc::now(),
            measurement: prediction.measurement,
            result: prediction.result,
        };
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<StoredPrediction>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }

    fn delete(&self, id: &PredictionId, owner: &OwnerId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let position = guard
            .iter()
            .position(|record| &record.id == id && &record.owner == owner)
            .ok_or(RepositoryError::NotFoundOrUnauthorized)?;
        guard.remove(position);
        Ok(())
    }

    fn clear_all(&self, owner: &OwnerId) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.owner != owner);
        Ok(before - guard.len())
    }
}

pub(super) struct UnavailableRepository;

impl PredictionRepository for UnavailableRepository {
    fn create(
        &self,
        _owner: &OwnerId,
        _prediction: NewPrediction,
    ) -> Result<StoredPrediction, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_owner(&self, _owner: &OwnerId) -> Result<Vec<StoredPrediction>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &PredictionId, _owner: &OwnerId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn clear_all(&self, _owner: &OwnerId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (PredictionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PredictionService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: PredictionService<MemoryRepository>) -> axum::Router {
    prediction_router(Arc::new(service), &IdentityConfig::default())
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
