pub mod export;
pub mod farm;
pub mod summary;

pub use export::{export_csv, ExportError, ExportFormat};
pub use farm::{FarmReport, FarmReportRow, RECENT_ROWS};
pub use summary::{HerdSummary, StatusCount, YieldPoint, TREND_WINDOW};
