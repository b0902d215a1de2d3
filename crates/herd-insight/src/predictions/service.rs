use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::domain::{MeasurementRecord, NewPrediction, OwnerId, PredictionId, StoredPrediction};
use super::engine::PredictionEngine;
use super::intake::{MeasurementGuard, ValidationFailure};
use super::report::{export_csv, ExportError, ExportFormat, FarmReport, HerdSummary};
use super::repository::{PredictionRepository, RepositoryError};

/// Service composing the intake guard, prediction engine, and repository.
///
/// Every operation takes the caller identity supplied by the identity collaborator;
/// `None` means the request is anonymous.
pub struct PredictionService<R> {
    guard: Arc<MeasurementGuard>,
    repository: Arc<R>,
    engine: PredictionEngine,
}

impl<R> PredictionService<R>
where
    R: PredictionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_guard(MeasurementGuard::default(), repository)
    }

    pub fn with_guard(guard: MeasurementGuard, repository: Arc<R>) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
            engine: PredictionEngine::new(),
        }
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    /// Validate a measurement, run the engine, and store the combined record.
    pub fn predict(
        &self,
        owner: Option<&OwnerId>,
        record: MeasurementRecord,
    ) -> Result<StoredPrediction, PredictionServiceError> {
        let owner = owner.ok_or(PredictionServiceError::Unauthenticated)?;
        self.guard.check(&record)?;

        let result = self.engine.predict(&record);
        debug!(
            animal_id = %record.animal_id,
            yield_litres = result.predicted_milk_yield,
            status = result.disease_status.label(),
            probability = result.disease_probability,
            "prediction computed"
        );

        let stored = self.repository.create(
            owner,
            NewPrediction {
                measurement: record,
                result,
            },
        )?;

        info!(
            prediction_id = %stored.id.0,
            animal_id = %stored.measurement.animal_id,
            status = stored.result.disease_status.label(),
            "prediction stored"
        );
        Ok(stored)
    }

    /// Owner's predictions, most recent first. Anonymous callers see an empty history.
    pub fn history(
        &self,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<StoredPrediction>, PredictionServiceError> {
        match owner {
            Some(owner) => Ok(self.repository.list_by_owner(owner)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn delete(
        &self,
        owner: Option<&OwnerId>,
        id: &PredictionId,
    ) -> Result<(), PredictionServiceError> {
        let owner = owner.ok_or(PredictionServiceError::Unauthenticated)?;
        self.repository.delete(id, owner)?;
        info!(prediction_id = %id.0, "prediction deleted");
        Ok(())
    }

    pub fn clear(&self, owner: Option<&OwnerId>) -> Result<usize, PredictionServiceError> {
        let owner = owner.ok_or(PredictionServiceError::Unauthenticated)?;
        let deleted = self.repository.clear_all(owner)?;
        info!(deleted, "prediction history cleared");
        Ok(deleted)
    }

    pub fn summary(&self, owner: Option<&OwnerId>) -> Result<HerdSummary, PredictionServiceError> {
        let history = self.history(owner)?;
        Ok(HerdSummary::from_history(&history))
    }

    pub fn export(
        &self,
        owner: Option<&OwnerId>,
        format: ExportFormat,
    ) -> Result<String, PredictionServiceError> {
        let history = self.history(owner)?;
        Ok(export_csv(&history, format)?)
    }

    /// Printable farm report over the owner's history, dated `generated_on`.
    pub fn farm_report(
        &self,
        owner: Option<&OwnerId>,
        generated_on: NaiveDate,
    ) -> Result<FarmReport, PredictionServiceError> {
        let history = self.history(owner)?;
        let farm_owner = owner.map(|owner| owner.0.as_str()).unwrap_or_default();
        Ok(FarmReport::from_history(farm_owner, &history, generated_on)?)
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error("user not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
