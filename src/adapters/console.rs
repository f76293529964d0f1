//! Interactive console surface.
//!
//! A line-oriented prompt loop over any reader/writer pair. Two modules:
//! the ratio calculator and the portfolio manager. `quit` leaves the current
//! module, `exit` (or end of input) leaves the session, and a bounded budget
//! of invalid answers force-terminates it. The attempt counter is
//! session-wide and never resets.

use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::domain::error::StocklensError;
use crate::domain::indicator;
use crate::domain::portfolio::Portfolio;
use crate::domain::recommendation;
use crate::domain::validation::{FieldKind, FieldSpec, FieldValue, validate_field};
use crate::adapters::portfolio_file;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_MAX_INVALID_ATTEMPTS: u32 = 5;

enum Prompted<T> {
    Value(T),
    Quit,
    Exit,
}

/// Whether to return to the module menu or end the session.
enum Flow {
    Menu,
    Exit,
}

/// Unwraps a prompt result inside a module function, mapping `quit` to the
/// menu and `exit` out of the session.
macro_rules! prompted {
    ($console:expr, text, $text:expr, $name:expr) => {
        match $console.prompt_text($text, $name)? {
            Prompted::Value(value) => value,
            Prompted::Quit => return Ok(Flow::Menu),
            Prompted::Exit => return Ok(Flow::Exit),
        }
    };
    ($console:expr, date, $text:expr, $name:expr) => {
        match $console.prompt_date($text, $name)? {
            Prompted::Value(value) => value,
            Prompted::Quit => return Ok(Flow::Menu),
            Prompted::Exit => return Ok(Flow::Exit),
        }
    };
    ($console:expr, int, $text:expr, $name:expr) => {
        match $console.prompt_int($text, $name)? {
            Prompted::Value(value) => value,
            Prompted::Quit => return Ok(Flow::Menu),
            Prompted::Exit => return Ok(Flow::Exit),
        }
    };
    ($console:expr, float, $text:expr, $name:expr) => {
        match $console.prompt_float($text, $name)? {
            Prompted::Value(value) => value,
            Prompted::Quit => return Ok(Flow::Menu),
            Prompted::Exit => return Ok(Flow::Exit),
        }
    };
}

pub struct Console<'a, R: BufRead, W: Write> {
    input: R,
    output: W,
    data: &'a dyn MarketDataPort,
    reports: &'a dyn ReportPort,
    as_of: NaiveDate,
    report_name: String,
    invalid_attempts: u32,
    max_attempts: u32,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        input: R,
        output: W,
        data: &'a dyn MarketDataPort,
        reports: &'a dyn ReportPort,
        as_of: NaiveDate,
        report_name: String,
        max_attempts: u32,
    ) -> Self {
        Console {
            input,
            output,
            data,
            reports,
            as_of,
            report_name,
            invalid_attempts: 0,
            max_attempts,
        }
    }

    pub fn run(&mut self) -> Result<(), StocklensError> {
        writeln!(self.output, "Welcome to stocklens.")?;
        writeln!(self.output, "Type 'exit' at any prompt to leave.")?;
        writeln!(self.output, "Type 'quit' to leave the current module.\n")?;

        loop {
            write!(
                self.output,
                "What module would you like to use:\n1. Ratio Calculator\n2. Portfolio Manager\nEnter 1 or 2 >> "
            )?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => break,
            };

            let flow = match line.as_str() {
                "quit" | "exit" => break,
                "1" => self.ratio_calculator()?,
                "2" => self.portfolio_manager()?,
                _ => {
                    writeln!(self.output, "Invalid module. Please try again.")?;
                    if self.mark_invalid_attempt()? {
                        return Ok(());
                    }
                    Flow::Menu
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        writeln!(self.output, "\nExiting. See you later.")?;
        Ok(())
    }

    fn ratio_calculator(&mut self) -> Result<Flow, StocklensError> {
        writeln!(self.output, "\nRatio Calculator")?;
        writeln!(self.output, "Enter 'quit' to exit the module.")?;

        let ticker = prompted!(self, text, "Enter the ticker: ", "ticker").to_uppercase();
        let start = prompted!(self, date, "Enter the start date (yyyy-mm-dd): ", "start_date");
        let end = match self.prompt_optional_date("Enter the end date (yyyy-mm-dd, optional): ")? {
            Prompted::Value(value) => value.unwrap_or(self.as_of),
            Prompted::Quit => return Ok(Flow::Menu),
            Prompted::Exit => return Ok(Flow::Exit),
        };

        let bars = match self.data.fetch_daily(&ticker, start, end) {
            Ok(bars) if bars.is_empty() => {
                writeln!(
                    self.output,
                    "Error occurred: {}",
                    StocklensError::DataNotFound { ticker }
                )?;
                return Ok(Flow::Menu);
            }
            Ok(bars) => bars,
            Err(e) => {
                writeln!(self.output, "Error occurred: {}", e)?;
                return Ok(Flow::Menu);
            }
        };

        writeln!(
            self.output,
            "\nWhich ratio would you like:\n1. PE Ratio\n2. Price Change Percentage\n3. VWAP\n4. RSI\n5. ATR\n6. Everything"
        )?;
        let choice = prompted!(self, text, "Enter 1-6 >> ", "ratio");

        match choice.as_str() {
            "1" => match indicator::pe_ratio::pe_ratio_proxy(&bars) {
                Ok(values) => self.print_series("PE Ratio", &bars, &values)?,
                Err(e) => writeln!(self.output, "Error occurred: {}", e)?,
            },
            "2" => {
                let values = indicator::price_change::price_change_percent(&bars);
                self.print_series("Price Change %", &bars, &values)?;
            }
            "3" => match indicator::vwap::volume_weighted_average_price(&bars) {
                Ok(value) => writeln!(self.output, "VWAP: {:.4}", value)?,
                Err(e) => writeln!(self.output, "Error occurred: {}", e)?,
            },
            "4" => match indicator::rsi::rsi_proxy(&bars) {
                Ok(value) => writeln!(self.output, "RSI: {:.4}", value)?,
                Err(e) => writeln!(self.output, "Error occurred: {}", e)?,
            },
            "5" => {
                let values = indicator::true_range::true_range_series(&bars);
                self.print_series("ATR", &bars, &values)?;
            }
            "6" => self.print_everything(&bars)?,
            _ => {
                writeln!(self.output, "Invalid ratio. Please try again.")?;
                if self.mark_invalid_attempt()? {
                    return Ok(Flow::Exit);
                }
            }
        }

        Ok(Flow::Menu)
    }

    fn portfolio_manager(&mut self) -> Result<Flow, StocklensError> {
        writeln!(self.output, "\nPortfolio Manager")?;
        writeln!(
            self.output,
            "You can either load a portfolio from a file or enter stocks manually."
        )?;
        writeln!(self.output, "Enter 'quit' to exit the module.")?;
        writeln!(
            self.output,
            "\nWARNING: the output directory is deleted and recreated each session.\n"
        )?;

        let save_report = prompted!(
            self,
            text,
            "Would you also like to save the portfolio analysis report? (yes/no): ",
            "save_report"
        );

        let path = match self.prompt_optional_text("Enter the path to the portfolio JSON file (optional): ")? {
            Prompted::Value(value) => value,
            Prompted::Quit => return Ok(Flow::Menu),
            Prompted::Exit => return Ok(Flow::Exit),
        };

        if let Err(e) = self.reports.prepare() {
            writeln!(self.output, "Error occurred: {}", e)?;
            return Ok(Flow::Menu);
        }

        let portfolio = match path {
            Some(path) => {
                let loaded = portfolio_file::parse_portfolio_file(std::path::Path::new(&path))
                    .and_then(|entries| Portfolio::load(self.data, &entries, self.as_of));
                match loaded {
                    Ok(portfolio) => {
                        writeln!(self.output, "Portfolio loaded successfully.")?;
                        portfolio
                    }
                    Err(e) => {
                        writeln!(self.output, "Error occurred: {}", e)?;
                        return Ok(Flow::Menu);
                    }
                }
            }
            None => {
                let count = prompted!(
                    self,
                    int,
                    "Enter the number of stocks in your portfolio: ",
                    "stock_count"
                );
                let mut portfolio = Portfolio::new();
                for i in 0..count {
                    let ticker = prompted!(
                        self,
                        text,
                        &format!("Enter ticker symbol for stock {}: ", i + 1),
                        "ticker"
                    );
                    let buy_date = prompted!(
                        self,
                        date,
                        &format!("Enter buy date for {} (YYYY-MM-DD): ", ticker),
                        "buy_date"
                    );
                    let buy_price = prompted!(
                        self,
                        float,
                        &format!("Enter buy price for {}: ", ticker),
                        "buy_price"
                    );
                    let quantity = prompted!(
                        self,
                        int,
                        &format!("Enter quantity bought for {}: ", ticker),
                        "quantity"
                    );

                    if let Err(e) = portfolio.add_position(
                        self.data, &ticker, buy_date, buy_price, quantity, self.as_of,
                    ) {
                        writeln!(self.output, "Error occurred: {}", e)?;
                        return Ok(Flow::Menu);
                    }
                }
                portfolio
            }
        };

        let report = match portfolio.compute_performance(self.reports) {
            Ok(report) => report,
            Err(e) => {
                writeln!(self.output, "Error occurred: {}", e)?;
                return Ok(Flow::Menu);
            }
        };
        let recommendations = recommendation::generate(&report);

        writeln!(self.output, "\nPortfolio Analysis with Recommendations:")?;
        writeln!(
            self.output,
            "{:<8} {:>10} {:>14} {:>9} {:>12}  {}",
            "Ticker", "Buy Price", "Current Price", "Quantity", "Profit/Loss", "Action"
        )?;
        for (holding, (_, action)) in report.holdings.iter().zip(&recommendations) {
            writeln!(
                self.output,
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
            self.output,
            "Total investment: {:.2}  Total value: {:.2}  Total profit/loss: {:.2}",
            report.totals.total_investment,
            report.totals.total_value,
            report.totals.total_profit_loss
        )?;

        if save_report.eq_ignore_ascii_case("yes") {
            match self
                .reports
                .write_report(&report, &recommendations, &self.report_name)
            {
                Ok(()) => writeln!(self.output, "Reports saved.")?,
                Err(e) => writeln!(self.output, "Error occurred: {}", e)?,
            }
        }

        Ok(Flow::Menu)
    }

    fn print_series(
        &mut self,
        label: &str,
        bars: &[crate::domain::ohlcv::PriceBar],
        values: &[f64],
    ) -> Result<(), StocklensError> {
        writeln!(self.output, "{}:", label)?;
        for (bar, value) in bars.iter().zip(values) {
            writeln!(self.output, "{} {:.4}", bar.date, value)?;
        }
        Ok(())
    }

    fn print_everything(
        &mut self,
        bars: &[crate::domain::ohlcv::PriceBar],
    ) -> Result<(), StocklensError> {
        let report = indicator::calculate_all(bars);

        match &report.pe_ratio {
            Ok(values) => self.print_series("PE Ratio", bars, values)?,
            Err(e) => writeln!(self.output, "PE Ratio unavailable: {}", e)?,
        }
        self.print_series("Price Change %", bars, &report.price_change)?;
        match report.vwap {
            Ok(value) => writeln!(self.output, "VWAP: {:.4}", value)?,
            Err(ref e) => writeln!(self.output, "VWAP unavailable: {}", e)?,
        }
        match report.rsi {
            Ok(value) => writeln!(self.output, "RSI: {:.4}", value)?,
            Err(ref e) => writeln!(self.output, "RSI unavailable: {}", e)?,
        }
        self.print_series("ATR", bars, &report.true_range)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, StocklensError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prints the remaining budget; true when the budget is exhausted.
    fn mark_invalid_attempt(&mut self) -> Result<bool, StocklensError> {
        self.invalid_attempts += 1;
        if self.invalid_attempts >= self.max_attempts {
            writeln!(self.output, "Too many invalid attempts. Exiting.")?;
            return Ok(true);
        }
        writeln!(
            self.output,
            "Number of attempts left: {}\n",
            self.max_attempts - self.invalid_attempts
        )?;
        Ok(false)
    }

    fn prompt(
        &mut self,
        text: &str,
        spec: &FieldSpec,
    ) -> Result<Prompted<FieldValue>, StocklensError> {
        loop {
            if self.invalid_attempts >= self.max_attempts {
                writeln!(self.output, "Too many invalid attempts. Exiting.")?;
                return Ok(Prompted::Exit);
            }

            write!(self.output, "{}", text)?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(Prompted::Exit),
            };

            if line == "quit" {
                return Ok(Prompted::Quit);
            }
            if line == "exit" {
                return Ok(Prompted::Exit);
            }

            match validate_field(spec, &line) {
                Ok(value) => return Ok(Prompted::Value(value)),
                Err(e) => {
                    writeln!(self.output, "{}", e)?;
                    if self.mark_invalid_attempt()? {
                        return Ok(Prompted::Exit);
                    }
                }
            }
        }
    }

    fn prompt_text(&mut self, text: &str, name: &'static str) -> Result<Prompted<String>, StocklensError> {
        match self.prompt(text, &FieldSpec::required(name, FieldKind::Text))? {
            Prompted::Value(FieldValue::Text(value)) => Ok(Prompted::Value(value)),
            Prompted::Quit => Ok(Prompted::Quit),
            _ => Ok(Prompted::Exit),
        }
    }

    fn prompt_optional_text(&mut self, text: &str) -> Result<Prompted<Option<String>>, StocklensError> {
        match self.prompt(text, &FieldSpec::optional("path", FieldKind::Text))? {
            Prompted::Value(FieldValue::Text(value)) => Ok(Prompted::Value(Some(value))),
            Prompted::Value(_) => Ok(Prompted::Value(None)),
            Prompted::Quit => Ok(Prompted::Quit),
            Prompted::Exit => Ok(Prompted::Exit),
        }
    }

    fn prompt_date(&mut self, text: &str, name: &'static str) -> Result<Prompted<NaiveDate>, StocklensError> {
        match self.prompt(text, &FieldSpec::required(name, FieldKind::Date))? {
            Prompted::Value(FieldValue::Date(value)) => Ok(Prompted::Value(value)),
            Prompted::Quit => Ok(Prompted::Quit),
            _ => Ok(Prompted::Exit),
        }
    }

    fn prompt_optional_date(&mut self, text: &str) -> Result<Prompted<Option<NaiveDate>>, StocklensError> {
        match self.prompt(text, &FieldSpec::optional("end_date", FieldKind::Date))? {
            Prompted::Value(FieldValue::Date(value)) => Ok(Prompted::Value(Some(value))),
            Prompted::Value(_) => Ok(Prompted::Value(None)),
            Prompted::Quit => Ok(Prompted::Quit),
            Prompted::Exit => Ok(Prompted::Exit),
        }
    }

    fn prompt_int(&mut self, text: &str, name: &'static str) -> Result<Prompted<i64>, StocklensError> {
        match self.prompt(text, &FieldSpec::required(name, FieldKind::Int))? {
            Prompted::Value(FieldValue::Int(value)) => Ok(Prompted::Value(value)),
            Prompted::Quit => Ok(Prompted::Quit),
            _ => Ok(Prompted::Exit),
        }
    }

    fn prompt_float(&mut self, text: &str, name: &'static str) -> Result<Prompted<f64>, StocklensError> {
        match self.prompt(text, &FieldSpec::required(name, FieldKind::Float))? {
            Prompted::Value(FieldValue::Float(value)) => Ok(Prompted::Value(value)),
            Prompted::Quit => Ok(Prompted::Quit),
            _ => Ok(Prompted::Exit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceBar;
    use crate::domain::performance::{HoldingPerformance, PerformanceReport};
    use crate::domain::recommendation::Action;
    use std::collections::HashMap;
    use std::io::Cursor;

    struct MapDataPort {
        data: HashMap<String, Vec<PriceBar>>,
    }

    impl MapDataPort {
        fn new() -> Self {
            MapDataPort {
                data: HashMap::new(),
            }
        }

        fn with_closes(mut self, ticker: &str, closes: &[f64]) -> Self {
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 2.0,
                    close,
                    volume: 1000,
                })
                .collect();
            self.data.insert(ticker.to_string(), bars);
            self
        }
    }

    impl MarketDataPort for MapDataPort {
        fn fetch_daily(
            &self,
            ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PriceBar>, StocklensError> {
            self.data
                .get(ticker)
                .cloned()
                .ok_or_else(|| StocklensError::DataNotFound {
                    ticker: ticker.to_string(),
                })
        }
    }

    struct NullReport;

    impl ReportPort for NullReport {
        fn prepare(&self) -> Result<(), StocklensError> {
            Ok(())
        }

        fn render_chart(&self, _holding: &HoldingPerformance) -> Result<(), StocklensError> {
            Ok(())
        }

        fn write_report(
            &self,
            _report: &PerformanceReport,
            _recommendations: &[(String, Action)],
            _report_name: &str,
        ) -> Result<(), StocklensError> {
            Ok(())
        }
    }

    fn run_script(script: &str, data: &MapDataPort) -> String {
        let reports = NullReport;
        let mut output = Vec::new();
        let mut console = Console::new(
            Cursor::new(script.to_string()),
            &mut output,
            data,
            &reports,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "analysis".to_string(),
            DEFAULT_MAX_INVALID_ATTEMPTS,
        );
        console.run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn exit_at_menu_terminates() {
        let data = MapDataPort::new();
        let output = run_script("exit\n", &data);
        assert!(output.contains("Welcome to stocklens."));
        assert!(output.contains("Exiting. See you later."));
    }

    #[test]
    fn eof_terminates() {
        let data = MapDataPort::new();
        let output = run_script("", &data);
        assert!(output.contains("Exiting. See you later."));
    }

    #[test]
    fn exhausting_attempt_budget_terminates() {
        let data = MapDataPort::new();
        let output = run_script("9\n9\n9\n9\n9\n", &data);
        assert!(output.contains("Too many invalid attempts."));
    }

    #[test]
    fn attempt_budget_spans_modules() {
        // Four bad menu picks plus one bad date inside the ratio module.
        let data = MapDataPort::new().with_closes("AAPL", &[100.0]);
        let output = run_script("9\n9\n9\n9\n1\nAAPL\nnot-a-date\n", &data);
        assert!(output.contains("Too many invalid attempts."));
    }

    #[test]
    fn quit_in_module_returns_to_menu() {
        let data = MapDataPort::new();
        let output = run_script("1\nquit\nexit\n", &data);
        // Menu is printed twice: before and after the aborted module.
        assert_eq!(output.matches("Enter 1 or 2 >>").count(), 2);
    }

    #[test]
    fn ratio_module_computes_vwap() {
        let data = MapDataPort::new().with_closes("AAPL", &[100.0, 110.0, 120.0]);
        let output = run_script("1\nAAPL\n2024-01-01\n\n3\nexit\n", &data);
        assert!(output.contains("VWAP:"), "output: {output}");
    }

    #[test]
    fn ratio_module_unknown_ticker_reports_and_continues() {
        let data = MapDataPort::new();
        let output = run_script("1\nXYZ\n2024-01-01\n\nexit\n", &data);
        assert!(output.contains("no price data found for XYZ"));
        assert!(output.contains("Exiting. See you later."));
    }

    #[test]
    fn ratio_module_surfaces_degenerate_rsi() {
        // Every bar closes above its open, so the down bucket is empty.
        let data = MapDataPort::new().with_closes("UP", &[100.0, 110.0]);
        let output = run_script("1\nUP\n2024-01-01\n\n4\nexit\n", &data);
        assert!(output.contains("RSI is undefined"), "output: {output}");
    }

    #[test]
    fn portfolio_module_manual_entry_prints_analysis() {
        let data = MapDataPort::new().with_closes("AAPL", &[100.0, 110.0, 120.0]);
        let output = run_script(
            "2\nno\n\n1\nAAPL\n2024-01-01\n100\n5\nexit\n",
            &data,
        );
        assert!(output.contains("Portfolio Analysis with Recommendations:"));
        assert!(output.contains("AAPL"));
        assert!(output.contains("Hold"));
        assert!(output.contains("Total investment: 500.00"));
    }

    #[test]
    fn portfolio_module_invalid_price_reprompts() {
        let data = MapDataPort::new().with_closes("AAPL", &[100.0, 110.0]);
        let output = run_script(
            "2\nno\n\n1\nAAPL\n2024-01-01\ncheap\n100\n5\nexit\n",
            &data,
        );
        assert!(output.contains("invalid buy_price"));
        assert!(output.contains("Portfolio Analysis with Recommendations:"));
    }

    #[test]
    fn portfolio_module_fetch_failure_aborts_module() {
        let data = MapDataPort::new();
        let output = run_script("2\nno\n\n1\nGONE\n2024-01-01\n100\n5\nexit\n", &data);
        assert!(output.contains("no price data found for GONE"));
        assert!(!output.contains("Portfolio Analysis with Recommendations:"));
    }
}
