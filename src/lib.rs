pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{local::LocalStorage, toml_config::TomlConfig};
pub use crate::core::dates::{add_date_range, date_range, reformat_dates};
pub use crate::core::fees::{fees_report, fees_report_file, FeesCalculator};
pub use crate::core::{etl::ReportEngine, pipeline::FeesPipeline};
pub use domain::model::{
    CheckoutRecord, FeeReportRow, LateFee, LateFeeLedger, OutputFormat, ReportOrder,
};
pub use utils::error::{FeesError, Result};
