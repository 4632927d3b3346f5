pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    http::{HttpRateSource, StaticRateSource},
    storage::{InMemoryRepository, JsonFileRepository},
};
pub use self::core::{
    ingest::{ingest, sync_from_source, IngestReport},
    resolver::{rate_from_data, rates_for_country, resolve},
    sync::RateSync,
    tax::{flat_tax, tax_for_country, TaxedAmount},
    validator::{check, validate},
};
pub use domain::model::{CountryCode, CountryRates, CountryRecord, UpsertOutcome};
pub use domain::ports::{ConfigProvider, RateRepository, RateSource};
pub use utils::error::{Result, VatError, Violation, ViolationKind};
