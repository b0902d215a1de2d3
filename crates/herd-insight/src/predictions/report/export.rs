use serde::Deserialize;

use super::super::domain::StoredPrediction;

/// Column layout for CSV exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Summary,
    Detailed,
}

impl ExportFormat {
    pub const fn file_stem(self) -> &'static str {
        match self {
            ExportFormat::Summary => "cattle-predictions",
            ExportFormat::Detailed => "detailed-cattle-data",
        }
    }

    fn headers(self) -> &'static [&'static str] {
        match self {
            ExportFormat::Summary => &[
                "Date",
                "Animal ID",
                "Breed",
                "Age",
                "Weight",
                "Predicted Milk Yield",
                "Disease Status",
                "Disease Probability",
                "Recommendations",
            ],
            ExportFormat::Detailed => &[
                "Date",
                "Animal ID",
                "Breed",
                "Age",
                "Weight",
                "Lactation Stage",
                "Parity",
                "Previous Yield",
                "Feed Type",
                "Feed Quantity",
                "Walking Distance",
                "Rumination Hours",
                "Resting Hours",
                "Body Temperature",
                "Heart Rate",
                "Somatic Cell Count",
                "Ambient Temperature",
                "Humidity",
                "Housing Condition",
                "Activity Alerts",
                "Predicted Milk Yield",
                "Disease Status",
                "Disease Probability",
                "Recommendations",
            ],
        }
    }

    fn row(self, prediction: &StoredPrediction) -> Vec<String> {
        let m = &prediction.measurement;
        let r = &prediction.result;
        let date = prediction.created_at.format("%Y-%m-%d").to_string();
        let probability = format!("{:.1}%", r.disease_probability * 100.0);

        match self {
            ExportFormat::Summary => vec![
                date,
                m.animal_id.clone(),
                m.breed.to_string(),
                m.age.to_string(),
                m.weight.to_string(),
                r.predicted_milk_yield.to_string(),
                r.disease_status.label().to_string(),
                probability,
                r.recommendations.clone(),
            ],
            ExportFormat::Detailed => vec![
                date,
                m.animal_id.clone(),
                m.breed.to_string(),
                m.age.to_string(),
                m.weight.to_string(),
                m.lactation_stage.to_string(),
                m.parity.to_string(),
                m.prev_yield.to_string(),
                m.feed_type.to_string(),
                m.feed_qty.to_string(),
                m.walking_km.to_string(),
                m.rumination_hr.to_string(),
                m.resting_hr.to_string(),
                m.body_temp.to_string(),
                m.heart_rate.to_string(),
                m.somatic_cell_count.to_string(),
                m.ambient_temp.to_string(),
                m.humidity.to_string(),
                m.housing_condition.to_string(),
                m.activity_alerts.to_string(),
                r.predicted_milk_yield.to_string(),
                r.disease_status.label().to_string(),
                probability,
                r.recommendations.clone(),
            ],
        }
    }
}

/// CSV export failure.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no predictions to export")]
    NoData,
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render the history as CSV text, one row per prediction in history order.
pub fn export_csv(
    history: &[StoredPrediction],
    format: ExportFormat,
) -> Result<String, ExportError> {
    if history.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(format.headers())?;
        for prediction in history {
            writer.write_record(format.row(prediction))?;
        }
        writer.flush()?;
    }

    Ok(String::from_utf8(buffer)?)
}
