use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored predictions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionId(pub String);

/// Authenticated user that owns stored predictions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Declares a categorical measurement field backed by a closed set of labels plus an
/// `Other` escape that keeps the raw text of anything unrecognized.
///
/// Labels match exactly: `"PEAK"` or `" peak"` land in `Other` and take the default branch
/// wherever the field is scored.
macro_rules! categorical_field {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn parse(raw: &str) -> Self {
                match raw {
                    $($label => Self::$variant,)+
                    _ => Self::Other(raw.to_string()),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw.as_str(),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($label => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.label().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical_field! {
    /// Dairy breed recorded with the measurement.
    Breed {
        Holstein => "holstein",
        Jersey => "jersey",
        Guernsey => "guernsey",
        BrownSwiss => "brown_swiss",
        Ayrshire => "ayrshire",
    }
}

categorical_field! {
    /// Phase of the milk-production cycle.
    LactationStage {
        Early => "early",
        Peak => "peak",
        Mid => "mid",
        Late => "late",
    }
}

categorical_field! {
    FeedType {
        HighQuality => "high_quality",
        MediumQuality => "medium_quality",
        LowQuality => "low_quality",
    }
}

categorical_field! {
    HousingCondition {
        Excellent => "excellent",
        Good => "good",
        Fair => "fair",
        Poor => "poor",
    }
}

/// One observation snapshot for a single animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub animal_id: String,
    pub breed: Breed,
    /// Years.
    pub age: f64,
    /// Kilograms.
    pub weight: f64,
    pub lactation_stage: LactationStage,
    pub parity: u32,
    /// Litres per day.
    pub prev_yield: f64,
    pub feed_type: FeedType,
    /// Kilograms per day.
    pub feed_qty: f64,
    pub walking_km: f64,
    pub rumination_hr: f64,
    pub resting_hr: f64,
    /// Degrees Celsius.
    pub body_temp: f64,
    /// Beats per minute.
    pub heart_rate: f64,
    /// Cells per millilitre.
    pub somatic_cell_count: f64,
    pub ambient_temp: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub housing_condition: HousingCondition,
    pub activity_alerts: u32,
}

/// Closed set of health categories produced by the risk classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseStatus {
    Healthy,
    Mastitis,
    DigestiveDisorder,
    HeatStress,
}

impl DiseaseStatus {
    pub const fn ordered() -> [DiseaseStatus; 4] {
        [
            DiseaseStatus::Healthy,
            DiseaseStatus::Mastitis,
            DiseaseStatus::DigestiveDisorder,
            DiseaseStatus::HeatStress,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            DiseaseStatus::Healthy => "healthy",
            DiseaseStatus::Mastitis => "mastitis",
            DiseaseStatus::DigestiveDisorder => "digestive_disorder",
            DiseaseStatus::HeatStress => "heat_stress",
        }
    }

    /// Upper-case label used by printed reports.
    pub const fn display_label(self) -> &'static str {
        match self {
            DiseaseStatus::Healthy => "HEALTHY",
            DiseaseStatus::Mastitis => "MASTITIS",
            DiseaseStatus::DigestiveDisorder => "DIGESTIVE DISORDER",
            DiseaseStatus::HeatStress => "HEAT STRESS",
        }
    }

    /// Canonical advice attached to a flagged category.
    pub const fn recommendation(self) -> &'static str {
        match self {
            DiseaseStatus::Healthy => "Continue regular monitoring and maintain good hygiene.",
            DiseaseStatus::Mastitis => {
                "High somatic cell count detected. Consult veterinarian for mastitis treatment. \
                 Improve udder hygiene and milking procedures."
            }
            DiseaseStatus::DigestiveDisorder => {
                "Reduced activity detected. Monitor feed intake and consider digestive health \
                 supplements. Consult veterinarian if symptoms persist."
            }
            DiseaseStatus::HeatStress => {
                "Environmental stress detected. Provide adequate shade, ventilation, and fresh \
                 water. Consider cooling systems."
            }
        }
    }
}

/// Engine output for one measurement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_milk_yield: f64,
    pub disease_status: DiseaseStatus,
    pub disease_probability: f64,
    pub recommendations: String,
}

/// Measurement and result pair handed to the repository for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub measurement: MeasurementRecord,
    pub result: PredictionResult,
}

/// Persisted prediction, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrediction {
    pub id: PredictionId,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub measurement: MeasurementRecord,
    #[serde(flatten)]
    pub result: PredictionResult,
}

impl StoredPrediction {
    pub fn is_alert(&self) -> bool {
        self.result.disease_status != DiseaseStatus::Healthy
    }
}
