//! Dairy prediction workflow: intake validation, yield and risk scoring, owner-scoped
//! history, herd reporting, and the HTTP surface over them.

pub mod domain;
pub mod engine;
pub mod intake;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Breed, DiseaseStatus, FeedType, HousingCondition, LactationStage, MeasurementRecord,
    NewPrediction, OwnerId, PredictionId, PredictionResult, StoredPrediction,
};
pub use engine::{
    classify_risk, estimate_yield, PredictionEngine, RiskAssessment, RiskComponent, RiskRule,
    YieldFactors,
};
pub use intake::{MeasurementGuard, ValidationFailure};
pub use report::{export_csv, ExportError, ExportFormat, FarmReport, HerdSummary};
pub use repository::{PredictionRepository, RepositoryError};
pub use router::{prediction_router, PredictionRouterState};
pub use service::{PredictionService, PredictionServiceError};
