//! Report output port trait.

use crate::domain::error::StocklensError;
use crate::domain::performance::{HoldingPerformance, PerformanceReport};
use crate::domain::recommendation::Action;

/// Port for writing analysis output: per-holding charts, per-holding CSV
/// series, and the JSON summary document.
pub trait ReportPort {
    /// Reset the output directory for a fresh session. Destructive: an
    /// existing directory is deleted and recreated.
    fn prepare(&self) -> Result<(), StocklensError>;

    /// Render the moving-averages chart for one holding.
    fn render_chart(&self, holding: &HoldingPerformance) -> Result<(), StocklensError>;

    /// Write the per-holding CSV files and the `<report_name>.json` summary.
    fn write_report(
        &self,
        report: &PerformanceReport,
        recommendations: &[(String, Action)],
        report_name: &str,
    ) -> Result<(), StocklensError>;
}
