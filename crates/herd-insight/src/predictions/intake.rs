use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::domain::MeasurementRecord;

/// Validation errors raised before a measurement reaches the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("animalId must not be blank")]
    MissingAnimalId,
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} {value} outside declared range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unrecognized {field} '{value}'")]
    UnknownCategory { field: &'static str, value: String },
}

/// Declared physiological and environmental ranges, inclusive at both ends.
const DECLARED_RANGES: [(&str, f64, f64); 14] = [
    ("age", 1.0, 15.0),
    ("weight", 300.0, 800.0),
    ("parity", 1.0, 10.0),
    ("prevYield", 0.0, 50.0),
    ("feedQty", 10.0, 50.0),
    ("walkingKm", 0.0, 20.0),
    ("ruminationHr", 4.0, 12.0),
    ("restingHr", 6.0, 16.0),
    ("bodyTemp", 37.0, 42.0),
    ("heartRate", 40.0, 120.0),
    ("somaticCellCount", 50_000.0, 1_000_000.0),
    ("ambientTemp", -10.0, 45.0),
    ("humidity", 20.0, 100.0),
    ("activityAlerts", 0.0, 10.0),
];

/// Input-collection guard that rejects records outside the declared ranges.
///
/// The prediction engine is total over any numeric input, so this guard is the only place
/// range constraints are enforced.
#[derive(Debug, Clone)]
pub struct MeasurementGuard {
    ranges: BTreeMap<&'static str, RangeInclusive<f64>>,
}

impl Default for MeasurementGuard {
    fn default() -> Self {
        let ranges = DECLARED_RANGES
            .iter()
            .map(|(field, min, max)| (*field, *min..=*max))
            .collect();
        Self { ranges }
    }
}

impl MeasurementGuard {
    /// Replace the accepted range for a known field. Unknown field names are ignored.
    pub fn with_range(mut self, field: &str, min: f64, max: f64) -> Self {
        if let Some(range) = self.ranges.get_mut(field) {
            *range = min..=max;
        }
        self
    }

    pub fn range(&self, field: &str) -> Option<&RangeInclusive<f64>> {
        self.ranges.get(field)
    }

    pub fn check(&self, record: &MeasurementRecord) -> Result<(), ValidationFailure> {
        if record.animal_id.trim().is_empty() {
            return Err(ValidationFailure::MissingAnimalId);
        }

        for (field, value) in measured_values(record) {
            if !value.is_finite() {
                return Err(ValidationFailure::NotFinite { field });
            }
            if let Some(range) = self.ranges.get(field) {
                if !range.contains(&value) {
                    return Err(ValidationFailure::OutOfRange {
                        field,
                        value,
                        min: *range.start(),
                        max: *range.end(),
                    });
                }
            }
        }

        let categories = [
            ("breed", record.breed.is_recognized(), record.breed.label()),
            (
                "lactationStage",
                record.lactation_stage.is_recognized(),
                record.lactation_stage.label(),
            ),
            (
                "feedType",
                record.feed_type.is_recognized(),
                record.feed_type.label(),
            ),
            (
                "housingCondition",
                record.housing_condition.is_recognized(),
                record.housing_condition.label(),
            ),
        ];
        for (field, recognized, value) in categories {
            if !recognized {
                return Err(ValidationFailure::UnknownCategory {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}

fn measured_values(record: &MeasurementRecord) -> [(&'static str, f64); 14] {
    [
        ("age", record.age),
        ("weight", record.weight),
        ("parity", f64::from(record.parity)),
        ("prevYield", record.prev_yield),
        ("feedQty", record.feed_qty),
        ("walkingKm", record.walking_km),
        ("ruminationHr", record.rumination_hr),
        ("restingHr", record.resting_hr),
        ("bodyTemp", record.body_temp),
        ("heartRate", record.heart_rate),
        ("somaticCellCount", record.somatic_cell_count),
        ("ambientTemp", record.ambient_temp),
        ("humidity", record.humidity),
        ("activityAlerts", f64::from(record.activity_alerts)),
    ]
}
