use crate::infra::{load_records, InMemoryPredictionRepository};
use chrono::Local;
use clap::{Args, ValueEnum};
use herd_insight::error::AppError;
use herd_insight::predictions::{
    Breed, ExportFormat, FeedType, HerdSummary, HousingCondition, LactationStage,
    MeasurementRecord, OwnerId, PredictionService, PredictionServiceError, StoredPrediction,
    YieldFactors,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_OWNER: &str = "demo-farm";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum CsvLayout {
    #[default]
    Summary,
    Detailed,
}

impl From<CsvLayout> for ExportFormat {
    fn from(value: CsvLayout) -> Self {
        match value {
            CsvLayout::Summary => ExportFormat::Summary,
            CsvLayout::Detailed => ExportFormat::Detailed,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the CSV export after the herd summary.
    #[arg(long)]
    pub(crate) export: bool,
    /// CSV column layout used with --export.
    #[arg(long, value_enum, default_value_t = CsvLayout::Summary)]
    pub(crate) layout: CsvLayout,
    /// Include the scoring trail for each animal.
    #[arg(long)]
    pub(crate) explain: bool,
    /// Write the printable farm report (HTML) into this directory.
    #[arg(long)]
    pub(crate) report_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file holding one measurement record or an array of records.
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Owner identity the predictions are recorded under.
    #[arg(long, default_value = "local-operator")]
    pub(crate) owner: String,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs { input, owner } = args;
    let records = load_records(&input)?;
    let service = PredictionService::new(Arc::new(InMemoryPredictionRepository::default()));
    let owner = OwnerId(owner);

    let stored = records
        .into_iter()
        .map(|record| service.predict(Some(&owner), record))
        .collect::<Result<Vec<_>, PredictionServiceError>>()?;

    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        export,
        layout,
        explain,
        report_dir,
    } = args;

    let service = PredictionService::new(Arc::new(InMemoryPredictionRepository::default()));
    let owner = OwnerId(DEMO_OWNER.to_string());

    println!("Herd insight demo ({DEMO_OWNER})");
    for (scenario, record) in demo_herd() {
        let factors = YieldFactors::for_record(&record);
        let assessment = service.engine().assess(&record);
        let stored = match service.predict(Some(&owner), record) {
            Ok(stored) => stored,
            Err(err) => {
                println!("- {scenario}: rejected ({err})");
                continue;
            }
        };
        render_prediction(scenario, &stored);

        if explain {
            println!(
                "    factors: age {} | weight {} | lactation {} | feed {} | health {}",
                factors.age, factors.weight, factors.lactation, factors.feed, factors.health
            );
            if assessment.components.is_empty() {
                println!("    no risk rules triggered");
            }
            for component in &assessment.components {
                println!(
                    "    - {:?} +{:.1}: {}",
                    component.rule, component.weight, component.notes
                );
            }
        }
    }

    let history = service.history(Some(&owner))?;
    render_summary(&HerdSummary::from_history(&history));

    if export {
        let csv = service.export(Some(&owner), layout.into())?;
        println!("\nCSV export ({:?})", layout);
        print!("{csv}");
    }

    if let Some(dir) = report_dir {
        let report = service.farm_report(Some(&owner), Local::now().date_naive())?;
        let path = dir.join(report.file_name());
        std::fs::write(&path, report.render_html())?;
        println!("\nFarm report written to {}", path.display());
    }

    Ok(())
}

fn render_prediction(scenario: &str, stored: &StoredPrediction) {
    println!(
        "- {scenario}: {} -> {:.2} L/day | {} ({:.0}%)",
        stored.measurement.animal_id,
        stored.result.predicted_milk_yield,
        stored.result.disease_status.display_label(),
        stored.result.disease_probability * 100.0
    );
    println!("    {}", stored.result.recommendations);
}

fn render_summary(summary: &HerdSummary) {
    println!("\nHerd summary");
    println!(
        "- {} predictions across {} animals | average yield {:.2} L/day",
        summary.total_predictions, summary.distinct_animals, summary.average_yield
    );
    println!(
        "- {} healthy / {} alerts ({:.1}% healthy)",
        summary.healthy_count, summary.alert_count, summary.health_percentage
    );
    for entry in summary.status_breakdown.iter().filter(|entry| entry.count > 0) {
        println!("  - {}: {}", entry.status_label, entry.count);
    }
    if !summary.yield_trend.is_empty() {
        let trend = summary
            .yield_trend
            .iter()
            .map(|point| format!("{}={:.2}", point.animal_id, point.predicted_milk_yield))
            .collect::<Vec<_>>()
            .join(", ");
        println!("- Yield trend (oldest first): {trend}");
    }
}

fn baseline_cow(animal_id: &str) -> MeasurementRecord {
    MeasurementRecord {
        animal_id: animal_id.to_string(),
        breed: Breed::Holstein,
        age: 4.0,
        weight: 600.0,
        lactation_stage: LactationStage::Peak,
        parity: 2,
        prev_yield: 22.5,
        feed_type: FeedType::HighQuality,
        feed_qty: 20.0,
        walking_km: 5.0,
        rumination_hr: 8.0,
        resting_hr: 10.0,
        body_temp: 39.0,
        heart_rate: 70.0,
        somatic_cell_count: 150_000.0,
        ambient_temp: 25.0,
        humidity: 50.0,
        housing_condition: HousingCondition::Good,
        activity_alerts: 0,
    }
}

pub(crate) fn demo_herd() -> Vec<(&'static str, MeasurementRecord)> {
    vec![
        ("steady producer", baseline_cow("COW-001")),
        (
            "high somatic cells",
            MeasurementRecord {
                somatic_cell_count: 250_000.0,
                ..baseline_cow("COW-002")
            },
        ),
        (
            "fever without a category",
            MeasurementRecord {
                body_temp: 40.0,
                heart_rate: 90.0,
                somatic_cell_count: 100_000.0,
                ambient_temp: 20.0,
                humidity: 40.0,
                ..baseline_cow("COW-003")
            },
        ),
        (
            "low activity",
            MeasurementRecord {
                resting_hr: 6.0,
                walking_km: 1.0,
                ..baseline_cow("COW-004")
            },
        ),
        (
            "hot barn",
            MeasurementRecord {
                breed: Breed::Jersey,
                weight: 450.0,
                lactation_stage: LactationStage::Late,
                feed_type: FeedType::MediumQuality,
                body_temp: 39.8,
                ambient_temp: 33.0,
                humidity: 85.0,
                housing_condition: HousingCondition::Fair,
                ..baseline_cow("COW-005")
            },
        ),
    ]
}
