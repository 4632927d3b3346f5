use crate::core::ConfigProvider;
use crate::utils::error::{Result, VatError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub store: StoreConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document after expanding `${VAR}` references from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VatError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as-is so validation reports them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VatError::ConfigParse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn query_parameters(&self) -> BTreeMap<String, String> {
        self.source.parameters.clone()
    }

    fn store_path(&self) -> &str {
        &self.store.path
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_path("store.path", &self.store.path)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        for (key, value) in &self.source.parameters {
            if value.contains("${") {
                return Err(VatError::InvalidConfigValue {
                    field: format!("source.parameters.{}", key),
                    value: value.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        Ok(())
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
[source]
endpoint = "https://rates.example.com/api/rate_list"
timeout_seconds = 10

[source.parameters]
format = "1"

[store]
path = "./vat_rates.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_endpoint(), "https://rates.example.com/api/rate_list");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.query_parameters().get("format").map(String::as_str),
            Some("1")
        );
        assert!(!config.logging().json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VAT_RATES_TEST_STORE", "/tmp/vat-test.json");

        let toml_content = r#"
[source]
endpoint = "https://rates.example.com"

[store]
path = "${VAT_RATES_TEST_STORE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.store_path(), "/tmp/vat-test.json");
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));

        std::env::remove_var("VAT_RATES_TEST_STORE");
    }

    #[test]
    fn test_unset_variable_fails_validation() {
        let toml_content = r#"
[source]
endpoint = "https://rates.example.com"

[source.parameters]
region = "${VAT_RATES_SURELY_UNSET_VARIABLE}"

[store]
path = "./vat_rates.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(VatError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
endpoint = "invalid-url"

[store]
path = "./vat_rates.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = TomlConfig::from_toml_str("[source\nendpoint = 1").unwrap_err();
        assert!(matches!(err, VatError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[source]
endpoint = "https://rates.example.com"

[store]
path = "./rates.json"

[logging]
verbose = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store_path(), "./rates.json");
        assert!(config.logging().verbose);
    }
}
