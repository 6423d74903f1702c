pub mod local;
pub mod toml_config;

#[cfg(feature = "cli")]
mod cli {
    use crate::core::ConfigProvider;
    use crate::domain::model::{OutputFormat, ReportOrder};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_file_extension, validate_path, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "late-fees")]
    #[command(about = "Compute per-patron late fees from library checkout records")]
    pub struct CliConfig {
        #[arg(long, default_value = "data/book_returns_short.csv")]
        pub input: String,

        #[arg(long, default_value = "book_fees.csv")]
        pub output: String,

        #[arg(long, default_value = ".", help = "Directory input and output paths are relative to")]
        pub base_path: String,

        #[arg(long, default_value = "csv", value_parser = clap::value_parser!(OutputFormat))]
        pub format: OutputFormat,

        #[arg(long, help = "Sort report rows by patron id")]
        pub sort: bool,

        #[arg(long, help = "Print the written report to stdout")]
        pub print: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }

        fn report_order(&self) -> ReportOrder {
            if self.sort {
                ReportOrder::PatronId
            } else {
                ReportOrder::FirstSeen
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input", &self.input)?;
            validate_path("output", &self.output)?;
            validate_path("base_path", &self.base_path)?;
            validate_file_extension("output", &self.output, &[self.format.extension()])
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["late-fees"]);
            assert_eq!(config.input, "data/book_returns_short.csv");
            assert_eq!(config.output, "book_fees.csv");
            assert_eq!(config.output_format(), OutputFormat::Csv);
            assert_eq!(config.report_order(), ReportOrder::FirstSeen);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_json_needs_json_extension() {
            let config = CliConfig::parse_from(["late-fees", "--format", "json"]);
            assert!(config.validate().is_err());

            let config =
                CliConfig::parse_from(["late-fees", "--format", "json", "--output", "fees.json", "--sort"]);
            assert!(config.validate().is_ok());
            assert_eq!(config.report_order(), ReportOrder::PatronId);
        }

        #[test]
        fn test_unknown_format_rejected() {
            assert!(CliConfig::try_parse_from(["late-fees", "--format", "xml"]).is_err());
        }
    }
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;
