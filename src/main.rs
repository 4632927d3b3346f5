use clap::Parser;
use vat_rates::config::toml_config::TomlConfig;
use vat_rates::utils::error::Result;
use vat_rates::utils::{logger, validation::Validate};
use vat_rates::{
    CliConfig, ConfigProvider, HttpRateSource, IngestReport, JsonFileRepository, RateSync,
    StaticRateSource, VatError,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let toml_config = cli.config.as_deref().map(TomlConfig::from_file);
    let logging = match &toml_config {
        Some(Ok(config)) => config.logging(),
        _ => Default::default(),
    };

    let verbose = cli.verbose || logging.verbose;
    if cli.json_logs || logging.json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting get-vat-rates");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match toml_config {
        Some(Ok(config)) => run(&config, cli.from_file.as_deref()).await,
        Some(Err(e)) => Err(e),
        None => run(&cli, cli.from_file.as_deref()).await,
    };

    match result {
        Ok(report) => {
            tracing::info!("✅ VAT rates stored");
            println!(
                "✅ Stored VAT rates for {} countries ({} new, {} updated)",
                report.total(),
                report.created.len(),
                report.updated.len()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ VAT rate sync failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            for violation in e.violations() {
                tracing::error!("  {}", violation);
            }
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code().max(1));
        }
    }
}

async fn run<C>(config: &C, from_file: Option<&str>) -> Result<IngestReport>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    let repository = JsonFileRepository::new(config.store_path());

    match from_file {
        Some(path) => {
            tracing::info!("📁 Reading rates from {}", path);
            let content = std::fs::read_to_string(path)?;
            let payload = serde_json::from_str(&content).map_err(VatError::from)?;
            RateSync::new(StaticRateSource::new(payload), repository)
                .run()
                .await
        }
        None => {
            tracing::info!("🌐 Fetching rates from {}", config.api_endpoint());
            let source = HttpRateSource::from_config(config)?;
            RateSync::new(source, repository).run().await
        }
    }
}
