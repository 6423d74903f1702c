use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, ReportOrder};
use crate::utils::error::{FeesError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: Option<ReportSection>,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub format: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub base_path: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// Loads the config from a TOML file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FeesError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FeesError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn name(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.name.as_deref())
            .unwrap_or("late-fees")
    }

    pub fn base_path(&self) -> &str {
        self.storage
            .as_ref()
            .and_then(|s| s.base_path.as_deref())
            .unwrap_or(".")
    }

    pub fn format(&self) -> Result<OutputFormat> {
        match self.output.format.as_deref() {
            None => Ok(OutputFormat::default()),
            Some(value) => value.parse().map_err(|reason| FeesError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: value.to_string(),
                reason,
            }),
        }
    }

    pub fn order(&self) -> Result<ReportOrder> {
        match self.output.order.as_deref() {
            None => Ok(ReportOrder::default()),
            Some(value) => value.parse().map_err(|reason| FeesError::InvalidConfigValueError {
                field: "output.order".to_string(),
                value: value.to_string(),
                reason,
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("input.path", &self.input.path)?;
        validate_path("output.path", &self.output.path)?;
        validate_path("storage.base_path", self.base_path())?;

        if let Some(name) = self.report.as_ref().and_then(|r| r.name.as_deref()) {
            validate_non_empty_string("report.name", name)?;
        }

        let format = self.format()?;
        self.order()?;
        validate_file_extension("output.path", &self.output.path, &[format.extension()])
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    // Both are checked by `validate`; an invalid value falls back to the default here.
    fn output_format(&self) -> OutputFormat {
        self.format().unwrap_or_default()
    }

    fn report_order(&self) -> ReportOrder {
        self.order().unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[report]
name = "monthly"

[input]
path = "book_returns.csv"

[output]
path = "book_fees.json"
format = "json"
order = "patron_id"

[storage]
base_path = "/var/library"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.name(), "monthly");
        assert_eq!(config.input_path(), "book_returns.csv");
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.report_order(), ReportOrder::PatronId);
        assert_eq!(config.base_path(), "/var/library");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let toml_content = r#"
[input]
path = "in.csv"

[output]
path = "out.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.name(), "late-fees");
        assert_eq!(config.base_path(), ".");
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert_eq!(config.report_order(), ReportOrder::FirstSeen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LATE_FEES_TEST_INPUT", "returns_2024.csv");

        let toml_content = r#"
[input]
path = "${LATE_FEES_TEST_INPUT}"

[output]
path = "${LATE_FEES_TEST_UNSET_OUTPUT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.path, "returns_2024.csv");
        assert_eq!(config.output.path, "${LATE_FEES_TEST_UNSET_OUTPUT}");

        std::env::remove_var("LATE_FEES_TEST_INPUT");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = r#"
[input]
path = "in.csv"

[output]
path = "out.csv"
format = "xlsx"
"#;
        let config = TomlConfig::from_toml_str(bad_format).unwrap();
        assert!(matches!(
            config.validate(),
            Err(FeesError::InvalidConfigValueError { .. })
        ));

        let mismatched_extension = r#"
[input]
path = "in.csv"

[output]
path = "out.csv"
format = "json"
"#;
        let config = TomlConfig::from_toml_str(mismatched_extension).unwrap();
        assert!(config.validate().is_err());

        let empty_input = r#"
[input]
path = ""

[output]
path = "out.csv"
"#;
        let config = TomlConfig::from_toml_str(empty_input).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let err = TomlConfig::from_toml_str("[input]\npath = \"in.csv\"\n").unwrap_err();
        assert!(matches!(err, FeesError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[report]
name = "file-test"

[input]
path = "in.csv"

[output]
path = "out.csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.name(), "file-test");
    }
}
