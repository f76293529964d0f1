//! Concrete adapter implementations for ports.

pub mod chart_png;
pub mod console;
pub mod csv_data_adapter;
pub mod file_config_adapter;
pub mod portfolio_file;
pub mod report_writer;
