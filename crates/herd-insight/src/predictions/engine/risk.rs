use serde::{Deserialize, Serialize};

use super::super::domain::{DiseaseStatus, MeasurementRecord};

/// Accumulated scores below this value are reported as healthy.
pub const ALERT_THRESHOLD: f64 = 0.3;
/// Upper bound applied to the accumulated score.
pub const PROBABILITY_CAP: f64 = 0.95;
/// Advice returned whenever the score stays under [`ALERT_THRESHOLD`].
pub const HEALTHY_RECOMMENDATION: &str = "Animal appears healthy. Continue regular monitoring.";

const FEVER_TEMP_C: f64 = 39.5;
const HEART_RATE_LOW_BPM: f64 = 60.0;
const HEART_RATE_HIGH_BPM: f64 = 80.0;
const MASTITIS_CELL_COUNT: f64 = 200_000.0;
const MIN_RESTING_HR: f64 = 8.0;
const MIN_WALKING_KM: f64 = 2.0;
const HEAT_AMBIENT_C: f64 = 30.0;
const HEAT_HUMIDITY_PCT: f64 = 80.0;

/// Scoring rules in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    Fever,
    IrregularHeartRate,
    ElevatedSomaticCells,
    ReducedActivity,
    EnvironmentalStress,
}

impl RiskRule {
    pub const fn weight(self) -> f64 {
        match self {
            RiskRule::Fever => 0.3,
            RiskRule::IrregularHeartRate => 0.2,
            RiskRule::ElevatedSomaticCells => 0.4,
            RiskRule::ReducedActivity => 0.2,
            RiskRule::EnvironmentalStress => 0.1,
        }
    }
}

/// Discrete contribution to a risk score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub rule: RiskRule,
    pub weight: f64,
    pub notes: String,
}

/// Classifier output: final status, probability, advice, and the rule trail behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub status: DiseaseStatus,
    pub probability: f64,
    pub recommendations: String,
    pub raw_score: f64,
    pub components: Vec<RiskComponent>,
}

struct Tally {
    score: f64,
    components: Vec<RiskComponent>,
}

impl Tally {
    fn add(&mut self, rule: RiskRule, notes: String) {
        self.score += rule.weight();
        self.components.push(RiskComponent {
            rule,
            weight: rule.weight(),
            notes,
        });
    }
}

/// Fixed-priority rule table. Mastitis always claims the category; reduced activity and
/// environmental stress only claim it while it is still healthy. Fever and heart rate add
/// score without naming a category.
pub fn classify_risk(record: &MeasurementRecord) -> RiskAssessment {
    let mut tally = Tally {
        score: 0.0,
        components: Vec::new(),
    };
    let mut category = DiseaseStatus::Healthy;

    if record.body_temp > FEVER_TEMP_C {
        tally.add(
            RiskRule::Fever,
            format!("body temperature {:.1} C above {FEVER_TEMP_C}", record.body_temp),
        );
    }

    if record.heart_rate > HEART_RATE_HIGH_BPM || record.heart_rate < HEART_RATE_LOW_BPM {
        tally.add(
            RiskRule::IrregularHeartRate,
            format!(
                "heart rate {:.0} bpm outside {HEART_RATE_LOW_BPM}-{HEART_RATE_HIGH_BPM}",
                record.heart_rate
            ),
        );
    }

    if record.somatic_cell_count > MASTITIS_CELL_COUNT {
        tally.add(
            RiskRule::ElevatedSomaticCells,
            format!(
                "somatic cell count {:.0} cells/mL above {MASTITIS_CELL_COUNT}",
                record.somatic_cell_count
            ),
        );
        category = DiseaseStatus::Mastitis;
    }

    if record.resting_hr < MIN_RESTING_HR || record.walking_km < MIN_WALKING_KM {
        tally.add(
            RiskRule::ReducedActivity,
            format!(
                "resting {:.1} h/day, walking {:.1} km/day",
                record.resting_hr, record.walking_km
            ),
        );
        if category == DiseaseStatus::Healthy {
            category = DiseaseStatus::DigestiveDisorder;
        }
    }

    if record.ambient_temp > HEAT_AMBIENT_C || record.humidity > HEAT_HUMIDITY_PCT {
        tally.add(
            RiskRule::EnvironmentalStress,
            format!(
                "ambient {:.1} C at {:.0}% humidity",
                record.ambient_temp, record.humidity
            ),
        );
        if category == DiseaseStatus::Healthy {
            category = DiseaseStatus::HeatStress;
        }
    }

    let raw_score = tally.score;
    let probability = raw_score.min(PROBABILITY_CAP);

    if probability < ALERT_THRESHOLD {
        return RiskAssessment {
            status: DiseaseStatus::Healthy,
            probability: 1.0 - probability,
            recommendations: HEALTHY_RECOMMENDATION.to_string(),
            raw_score,
            components: tally.components,
        };
    }

    // Fever plus heart rate alone can cross the threshold without naming a category; the
    // status then stays healthy with the raw probability.
    RiskAssessment {
        status: category,
        probability,
        recommendations: category.recommendation().to_string(),
        raw_score,
        components: tally.components,
    }
}
