use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::domain::{DiseaseStatus, PredictionId, StoredPrediction};
use super::super::engine::round_to_hundredths;

/// Number of recent predictions plotted in the yield trend.
pub const TREND_WINDOW: usize = 5;

/// Herd-level rollup over an owner's prediction history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HerdSummary {
    pub total_predictions: usize,
    pub distinct_animals: usize,
    pub average_yield: f64,
    pub healthy_count: usize,
    pub alert_count: usize,
    pub health_percentage: f64,
    pub status_breakdown: Vec<StatusCount>,
    pub yield_trend: Vec<YieldPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: DiseaseStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldPoint {
    pub id: PredictionId,
    pub animal_id: String,
    pub recorded_at: DateTime<Utc>,
    pub predicted_milk_yield: f64,
}

impl HerdSummary {
    /// Build the rollup from a history ordered most recent first.
    pub fn from_history(history: &[StoredPrediction]) -> Self {
        let total_predictions = history.len();
        let distinct_animals = history
            .iter()
            .map(|prediction| prediction.measurement.animal_id.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let healthy_count = history
            .iter()
            .filter(|prediction| !prediction.is_alert())
            .count();
        let alert_count = total_predictions - healthy_count;

        let (average_yield, health_percentage) = if total_predictions == 0 {
            (0.0, 0.0)
        } else {
            let total_yield: f64 = history
                .iter()
                .map(|prediction| prediction.result.predicted_milk_yield)
                .sum();
            let average = round_to_hundredths(total_yield / total_predictions as f64);
            let percentage = healthy_count as f64 / total_predictions as f64 * 100.0;
            (average, (percentage * 10.0).round() / 10.0)
        };

        let status_breakdown = DiseaseStatus::ordered()
            .into_iter()
            .map(|status| StatusCount {
                status,
                status_label: status.label(),
                count: history
                    .iter()
                    .filter(|prediction| prediction.result.disease_status == status)
                    .count(),
            })
            .collect();

        let yield_trend = history
            .iter()
            .take(TREND_WINDOW)
            .rev()
            .map(|prediction| YieldPoint {
                id: prediction.id.clone(),
                animal_id: prediction.measurement.animal_id.clone(),
                recorded_at: prediction.created_at,
                predicted_milk_yield: prediction.result.predicted_milk_yield,
            })
            .collect();

        Self {
            total_predictions,
            distinct_animals,
            average_yield,
            healthy_count,
            alert_count,
            health_percentage,
            status_breakdown,
            yield_trend,
        }
    }
}
