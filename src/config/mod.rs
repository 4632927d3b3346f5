pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::collections::BTreeMap;
    use std::time::Duration;

    pub const DEFAULT_ENDPOINT: &str = "http://apilayer.net/api/rate_list";

    #[derive(Debug, Clone, Parser)]
    #[command(name = "get-vat-rates")]
    #[command(about = "Fetch VAT rate tables and store one record per country")]
    pub struct CliConfig {
        #[arg(long, env = "VAT_RATES_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        pub api_endpoint: String,

        /// Extra query parameter sent to the rate source, as KEY=VALUE. Repeatable.
        #[arg(long = "query", value_parser = parse_key_value)]
        pub query: Vec<(String, String)>,

        #[arg(long, env = "VAT_RATES_STORE", default_value = "./vat_rates.json")]
        pub store_path: String,

        #[arg(long, default_value = "30")]
        pub timeout_seconds: u64,

        /// Read the payload from a saved JSON response instead of the rate source
        #[arg(long)]
        pub from_file: Option<String>,

        /// Load settings from a TOML file instead of the flags above
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
        match raw.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
        }
    }

    impl ConfigProvider for CliConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn query_parameters(&self) -> BTreeMap<String, String> {
            self.query.iter().cloned().collect()
        }

        fn store_path(&self) -> &str {
            &self.store_path
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_seconds)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("api_endpoint", &self.api_endpoint)?;
            validation::validate_path("store_path", &self.store_path)?;
            validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)
        }
    }

}
