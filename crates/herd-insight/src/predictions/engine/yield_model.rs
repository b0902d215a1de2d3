use serde::Serialize;

use super::super::domain::{FeedType, LactationStage, MeasurementRecord};

/// Baseline daily yield in litres before any factor is applied.
pub const BASE_YIELD_LITRES: f64 = 12.0;

/// Individual multipliers applied to the base yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldFactors {
    pub age: f64,
    pub weight: f64,
    pub lactation: f64,
    pub feed: f64,
    pub health: f64,
}

impl YieldFactors {
    pub fn for_record(record: &MeasurementRecord) -> Self {
        Self {
            age: age_factor(record.age),
            weight: weight_factor(record.weight),
            lactation: lactation_factor(&record.lactation_stage),
            feed: feed_factor(&record.feed_type),
            health: health_factor(record.body_temp, record.heart_rate),
        }
    }
}

/// Estimated daily yield in litres, rounded to two decimals.
pub fn estimate_yield(record: &MeasurementRecord) -> f64 {
    let factors = YieldFactors::for_record(record);
    // Left-to-right product keeps results bit-stable across callers.
    let raw = BASE_YIELD_LITRES
        * factors.age
        * factors.weight
        * factors.lactation
        * factors.feed
        * factors.health;
    round_to_hundredths(raw)
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn age_factor(age: f64) -> f64 {
    if (3.0..=5.0).contains(&age) {
        1.2
    } else if age < 3.0 {
        0.8
    } else {
        0.9
    }
}

fn weight_factor(weight: f64) -> f64 {
    if weight > 500.0 {
        1.1
    } else {
        0.9
    }
}

fn lactation_factor(stage: &LactationStage) -> f64 {
    match stage {
        LactationStage::Peak => 1.3,
        LactationStage::Early => 1.1,
        LactationStage::Mid => 1.0,
        LactationStage::Late | LactationStage::Other(_) => 0.7,
    }
}

fn feed_factor(feed: &FeedType) -> f64 {
    match feed {
        FeedType::HighQuality => 1.2,
        FeedType::MediumQuality => 1.0,
        FeedType::LowQuality | FeedType::Other(_) => 0.8,
    }
}

fn health_factor(body_temp: f64, heart_rate: f64) -> f64 {
    if (38.5..=39.5).contains(&body_temp) && (60.0..=80.0).contains(&heart_rate) {
        1.0
    } else {
        0.8
    }
}
