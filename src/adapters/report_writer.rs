//! File-based report output.
//!
//! Owns the output directory for one session: `prepare` wipes and recreates
//! it, then each holding gets a CSV series and a PNG chart, and the session
//! summary lands in `<report_name>.json`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::adapters::chart_png;
use crate::domain::error::StocklensError;
use crate::domain::performance::{
    ColumnAverages, HoldingPerformance, PerformanceReport, PerformanceTotals,
};
use crate::domain::recommendation::Action;
use crate::ports::report_port::ReportPort;

/// The JSON summary document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub portfolio: BTreeMap<String, HoldingSummary>,
    pub totals: PerformanceTotals,
    pub recommendations: BTreeMap<String, Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingSummary {
    pub buy_price: f64,
    pub current_price: f64,
    pub quantity: i64,
    pub profit_loss: f64,
    pub averages: ColumnAverages,
}

pub fn build_document(
    report: &PerformanceReport,
    recommendations: &[(String, Action)],
) -> ReportDocument {
    let portfolio = report
        .holdings
        .iter()
        .map(|holding| {
            (
                holding.ticker.clone(),
                HoldingSummary {
                    buy_price: holding.buy_price,
                    current_price: holding.current_price,
                    quantity: holding.quantity,
                    profit_loss: holding.profit_loss,
                    averages: holding.column_averages(),
                },
            )
        })
        .collect();

    ReportDocument {
        portfolio,
        totals: report.totals,
        recommendations: recommendations.iter().cloned().collect(),
    }
}

pub struct FileReportWriter {
    out_dir: PathBuf,
}

impl FileReportWriter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn out_dir(&self) -> &PathBuf {
        &self.out_dir
    }

    fn write_holding_csv(&self, holding: &HoldingPerformance) -> Result<(), StocklensError> {
        let path = self.out_dir.join(format!("{}.csv", holding.ticker));
        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| io::Error::other(format!("{}: {}", path.display(), e)))?;

        writer
            .write_record(["date", "open", "high", "low", "close", "volume", "sma_10", "sma_50"])
            .map_err(io::Error::other)?;

        let cell = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();

        for (i, bar) in holding.bars.iter().enumerate() {
            writer
                .write_record([
                    bar.date.to_string(),
                    bar.open.to_string(),
                    bar.high.to_string(),
                    bar.low.to_string(),
                    bar.close.to_string(),
                    bar.volume.to_string(),
                    cell(holding.sma_10.get(i).copied().flatten()),
                    cell(holding.sma_50.get(i).copied().flatten()),
                ])
                .map_err(io::Error::other)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl ReportPort for FileReportWriter {
    fn prepare(&self) -> Result<(), StocklensError> {
        if self.out_dir.exists() {
            fs::remove_dir_all(&self.out_dir)
                .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", self.out_dir.display(), e)))?;
        }
        fs::create_dir_all(&self.out_dir)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", self.out_dir.display(), e)))?;
        Ok(())
    }

    fn render_chart(&self, holding: &HoldingPerformance) -> Result<(), StocklensError> {
        let path = self
            .out_dir
            .join(format!("{}_moving_averages_plot.png", holding.ticker));
        let closes: Vec<f64> = holding.bars.iter().map(|bar| bar.close).collect();
        chart_png::render_moving_averages(
            &path,
            &holding.ticker,
            &closes,
            &holding.sma_10,
            &holding.sma_50,
        )
    }

    fn write_report(
        &self,
        report: &PerformanceReport,
        recommendations: &[(String, Action)],
        report_name: &str,
    ) -> Result<(), StocklensError> {
        for holding in &report.holdings {
            self.write_holding_csv(holding)?;
        }

        let document = build_document(report, recommendations);
        let json = serde_json::to_string_pretty(&document).map_err(io::Error::other)?;
        let path = self.out_dir.join(format!("{}.json", report_name));
        fs::write(&path, json)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}
