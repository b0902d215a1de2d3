use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{DiseaseStatus, StoredPrediction};
use super::export::ExportError;
use super::summary::HerdSummary;

/// Rows shown in the recent predictions table.
pub const RECENT_ROWS: usize = 20;
/// Characters of each recommendation kept in the table.
pub const RECOMMENDATION_PREVIEW_CHARS: usize = 100;

const DEFAULT_FARM_OWNER: &str = "Farm Owner";

/// Printable farm report: headline statistics plus the most recent predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmReport {
    pub farm_owner: String,
    pub generated_on: NaiveDate,
    pub total_animals: usize,
    pub average_yield: f64,
    pub health_percentage: f64,
    pub recent: Vec<FarmReportRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmReportRow {
    pub recorded_on: NaiveDate,
    pub animal_id: String,
    pub breed: String,
    pub predicted_milk_yield: f64,
    pub status: DiseaseStatus,
    pub status_label: &'static str,
    pub recommendation_preview: String,
}

impl FarmReport {
    /// Build the report from a history ordered most recent first.
    pub fn from_history(
        farm_owner: &str,
        history: &[StoredPrediction],
        generated_on: NaiveDate,
    ) -> Result<Self, ExportError> {
        if history.is_empty() {
            return Err(ExportError::NoData);
        }

        let summary = HerdSummary::from_history(history);
        let farm_owner = if farm_owner.trim().is_empty() {
            DEFAULT_FARM_OWNER.to_string()
        } else {
            farm_owner.to_string()
        };

        let recent = history
            .iter()
            .take(RECENT_ROWS)
            .map(|prediction| FarmReportRow {
                recorded_on: prediction.created_at.date_naive(),
                animal_id: prediction.measurement.animal_id.clone(),
                breed: prediction.measurement.breed.label().replacen('_', " ", 1),
                predicted_milk_yield: prediction.result.predicted_milk_yield,
                status: prediction.result.disease_status,
                status_label: prediction.result.disease_status.display_label(),
                recommendation_preview: preview(&prediction.result.recommendations),
            })
            .collect();

        Ok(Self {
            farm_owner,
            generated_on,
            total_animals: summary.distinct_animals,
            average_yield: summary.average_yield,
            health_percentage: summary.health_percentage,
            recent,
        })
    }

    pub fn file_name(&self) -> String {
        format!("cattle-farm-report-{}.html", self.generated_on.format("%Y-%m-%d"))
    }

    /// Standalone HTML document suitable for printing to PDF from a browser.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<title>Cattle Farm Report</title>\n");
        html.push_str(
            "<style>body { font-family: Arial, sans-serif; margin: 40px; } \
             table { width: 100%; border-collapse: collapse; } \
             th, td { border: 1px solid #ddd; padding: 8px; text-align: left; } \
             .healthy { color: #16a34a; } .alert { color: #dc2626; }</style>\n",
        );
        html.push_str("</head>\n<body>\n<h1>Cattle Farm Report</h1>\n");
        html.push_str(&format!(
            "<p>Generated on {}</p>\n<p>Farm Owner: {}</p>\n",
            self.generated_on.format("%Y-%m-%d"),
            escape_html(&self.farm_owner)
        ));

        html.push_str(&format!(
            "<ul class=\"stats\">\n<li>{} Total Animals</li>\n<li>{:.2}L Avg Milk Yield</li>\n\
             <li>{:.1}% Healthy Animals</li>\n</ul>\n",
            self.total_animals, self.average_yield, self.health_percentage
        ));

        html.push_str(
            "<h2>Recent Predictions</h2>\n<table>\n<thead><tr><th>Date</th><th>Animal ID</th>\
             <th>Breed</th><th>Milk Yield (L)</th><th>Health Status</th>\
             <th>Recommendations</th></tr></thead>\n<tbody>\n",
        );
        for row in &self.recent {
            let class = if row.status == DiseaseStatus::Healthy {
                "healthy"
            } else {
                "alert"
            };
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td class=\"{}\">{}</td><td>{}</td></tr>\n",
                row.recorded_on.format("%Y-%m-%d"),
                escape_html(&row.animal_id),
                escape_html(&row.breed),
                row.predicted_milk_yield,
                class,
                row.status_label,
                escape_html(&row.recommendation_preview)
            ));
        }
        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

        html
    }
}

fn preview(recommendation: &str) -> String {
    let mut preview: String = recommendation
        .chars()
        .take(RECOMMENDATION_PREVIEW_CHARS)
        .collect();
    preview.push_str("...");
    preview
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
