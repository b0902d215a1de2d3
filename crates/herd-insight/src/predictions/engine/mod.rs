mod risk;
mod yield_model;

pub use risk::{
    classify_risk, RiskAssessment, RiskComponent, RiskRule, ALERT_THRESHOLD,
    HEALTHY_RECOMMENDATION, PROBABILITY_CAP,
};
pub use yield_model::{estimate_yield, YieldFactors, BASE_YIELD_LITRES};

pub(crate) use yield_model::round_to_hundredths;

use super::domain::{MeasurementRecord, PredictionResult};

/// Stateless engine combining the yield estimator and the risk classifier.
///
/// Both scorers read the same record independently; neither can fail, so a prediction is
/// always produced for any well-typed record.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionEngine;

impl PredictionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, record: &MeasurementRecord) -> PredictionResult {
        let predicted_milk_yield = estimate_yield(record);
        let risk = classify_risk(record);

        PredictionResult {
            predicted_milk_yield,
            disease_status: risk.status,
            disease_probability: risk.probability,
            recommendations: risk.recommendations,
        }
    }

    /// Full risk trail for callers that need to explain a result.
    pub fn assess(&self, record: &MeasurementRecord) -> RiskAssessment {
        classify_risk(record)
    }
}
