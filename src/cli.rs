//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console::{Console, DEFAULT_MAX_INVALID_ATTEMPTS};
use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::portfolio_file;
use crate::adapters::report_writer::FileReportWriter;
use crate::domain::error::StocklensError;
use crate::domain::indicator;
use crate::domain::performance::PerformanceReport;
use crate::domain::portfolio::Portfolio;
use crate::domain::recommendation::{self, Action};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stocklens", about = "Equity price analysis and portfolio recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a portfolio file and write the full report
    Analyze {
        #[arg(short, long)]
        portfolio: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        report_name: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compute price ratios for one ticker
    Ratios {
        #[arg(short, long)]
        ticker: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, value_enum, default_value = "all")]
        indicator: RatioKind,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the interactive console
    Interactive {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        report_name: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatioKind {
    All,
    Pe,
    Change,
    Vwap,
    Rsi,
    Atr,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub report_name: String,
    pub max_attempts: u32,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            portfolio,
            data_dir,
            output,
            report_name,
            config,
        } => {
            let settings = match resolve_settings(config.as_ref(), data_dir, output, report_name) {
                Ok(s) => s,
                Err(code) => return code,
            };
            run_analyze(&portfolio, &settings)
        }
        Command::Ratios {
            ticker,
            start,
            end,
            indicator,
            data_dir,
            config,
        } => {
            let settings = match resolve_settings(config.as_ref(), data_dir, None, None) {
                Ok(s) => s,
                Err(code) => return code,
            };
            run_ratios(&ticker, start, end, indicator, &settings)
        }
        Command::Interactive {
            data_dir,
            output,
            report_name,
            config,
        } => {
            let settings = match resolve_settings(config.as_ref(), data_dir, output, report_name) {
                Ok(s) => s,
                Err(code) => return code,
            };
            run_interactive(&settings)
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StocklensError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, StocklensError> {
    let report_name = config
        .get_string("output", "report_name")
        .unwrap_or_else(|| "analysis".to_string());
    if report_name.trim().is_empty() {
        return Err(StocklensError::ConfigInvalid {
            section: "output".into(),
            key: "report_name".into(),
            reason: "report_name must not be empty".into(),
        });
    }

    let max_attempts = config.get_int(
        "console",
        "max_invalid_attempts",
        DEFAULT_MAX_INVALID_ATTEMPTS as i64,
    );
    if max_attempts < 1 {
        return Err(StocklensError::ConfigInvalid {
            section: "console".into(),
            key: "max_invalid_attempts".into(),
            reason: "max_invalid_attempts must be at least 1".into(),
        });
    }

    Ok(Settings {
        data_dir: config
            .get_string("data", "csv_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        out_dir: config
            .get_string("output", "directory")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("portfolio_analysis")),
        report_name,
        max_attempts: max_attempts as u32,
    })
}

fn resolve_settings(
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    report_name: Option<String>,
) -> Result<Settings, ExitCode> {
    let adapter = load_config(config_path)?;
    let mut settings = build_settings(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;

    // Flags override config keys.
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(dir) = output {
        settings.out_dir = dir;
    }
    if let Some(name) = report_name {
        settings.report_name = name;
    }
    Ok(settings)
}

pub fn run_analyze(portfolio_path: &PathBuf, settings: &Settings) -> ExitCode {
    eprintln!("Loading portfolio from {}", portfolio_path.display());
    let entries = match portfolio_file::parse_portfolio_file(portfolio_path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data = CsvDataAdapter::new(settings.data_dir.clone());
    let as_of = chrono::Local::now().date_naive();

    eprintln!("Fetching price history for {} positions...", entries.len());
    let portfolio = match Portfolio::load(&data, &entries, as_of) {
        Ok(portfolio) => portfolio,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let writer = FileReportWriter::new(settings.out_dir.clone());
    if let Err(e) = writer.prepare() {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let report = match portfolio.compute_performance(&writer) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let recommendations = recommendation::generate(&report);

    let stdout = std::io::stdout();
    if let Err(e) = print_analysis(&mut stdout.lock(), &report, &recommendations) {
        eprintln!("error: {e}");
        return ExitCode::from(1);
    }

    if let Err(e) = writer.write_report(&report, &recommendations, &settings.report_name) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("\nReport written to: {}", settings.out_dir.display());
    ExitCode::SUCCESS
}

pub fn run_ratios(
    ticker: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    kind: RatioKind,
    settings: &Settings,
) -> ExitCode {
    let data = CsvDataAdapter::new(settings.data_dir.clone());
    let ticker = ticker.to_uppercase();
    let end = end.unwrap_or_else(|| chrono::Local::now().date_naive());

    eprintln!("Fetching {} from {} to {}", ticker, start, end);
    let bars = match data.fetch_daily(&ticker, start, end) {
        Ok(bars) if bars.is_empty() => {
            let e = StocklensError::DataNotFound { ticker };
            eprintln!("error: {e}");
            return (&e).into();
        }
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = print_ratios(&mut out, &bars, kind);
    if let Err(e) = out.flush().map_err(StocklensError::from).and(result) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    ExitCode::SUCCESS
}

fn print_ratios(
    out: &mut impl Write,
    bars: &[crate::domain::ohlcv::PriceBar],
    kind: RatioKind,
) -> Result<(), StocklensError> {
    let print_series = |out: &mut dyn Write, label: &str, values: &[f64]| -> std::io::Result<()> {
        writeln!(out, "{label}:")?;
        for (bar, value) in bars.iter().zip(values) {
            writeln!(out, "{} {:.4}", bar.date, value)?;
        }
        Ok(())
    };

    match kind {
        RatioKind::Pe => {
            let values = indicator::pe_ratio::pe_ratio_proxy(bars)?;
            print_series(out, "PE Ratio", &values)?;
        }
        RatioKind::Change => {
            let values = indicator::price_change::price_change_percent(bars);
            print_series(out, "Price Change %", &values)?;
        }
        RatioKind::Vwap => {
            let value = indicator::vwap::volume_weighted_average_price(bars)?;
            writeln!(out, "VWAP: {value:.4}")?;
        }
        RatioKind::Rsi => {
            let value = indicator::rsi::rsi_proxy(bars)?;
            writeln!(out, "RSI: {value:.4}")?;
        }
        RatioKind::Atr => {
            let values = indicator::true_range::true_range_series(bars);
            print_series(out, "ATR", &values)?;
        }
        RatioKind::All => {
            let report = indicator::calculate_all(bars);
            match &report.pe_ratio {
                Ok(values) => print_series(out, "PE Ratio", values)?,
                Err(e) => writeln!(out, "PE Ratio unavailable: {e}")?,
            }
            print_series(out, "Price Change %", &report.price_change)?;
            match report.vwap {
                Ok(value) => writeln!(out, "VWAP: {value:.4}")?,
                Err(ref e) => writeln!(out, "VWAP unavailable: {e}")?,
            }
            match report.rsi {
                Ok(value) => writeln!(out, "RSI: {value:.4}")?,
                Err(ref e) => writeln!(out, "RSI unavailable: {e}")?,
            }
            print_series(out, "ATR", &report.true_range)?;
        }
    }
    Ok(())
}

pub fn print_analysis(
    out: &mut impl Write,
    report: &PerformanceReport,
    recommendations: &[(String, Action)],
) -> Result<(), StocklensError> {
    writeln!(out, "\nPortfolio Analysis with Recommendations:")?;
    writeln!(
        out,
        "{:<8} {:>10} {:>14} {:>9} {:>12}  {}",
        "Ticker", "Buy Price", "Current Price", "Quantity", "Profit/Loss", "Action"
    )?;
    for (holding, (_, action)) in report.holdings.iter().zip(recommendations) {
        writeln!(
            out,
            "{:<8} {:>10.2} {:>14.2} {:>9} {:>12.2}  {}",
            holding.ticker,
            holding.buy_price,
            holding.current_price,
            holding.quantity,
            holding.profit_loss,
            action
        )?;
    }
    writeln!(
        out,
        "Total investment: {:.2}  Total value: {:.2}  Total profit/loss: {:.2}",
        report.totals.total_investment, report.totals.total_value, report.totals.total_profit_loss
    )?;
    Ok(())
}

fn run_interactive(settings: &Settings) -> ExitCode {
    let data = CsvDataAdapter::new(settings.data_dir.clone());
    let writer = FileReportWriter::new(settings.out_dir.clone());
    let as_of = chrono::Local::now().date_naive();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(
        stdin.lock(),
        stdout.lock(),
        &data,
        &writer,
        as_of,
        settings.report_name.clone(),
        settings.max_attempts,
    );

    match console.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
