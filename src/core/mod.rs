pub mod ingest;
pub mod resolver;
pub mod sync;
pub mod tax;
pub mod validator;

pub use crate::domain::model::{CountryCode, CountryRates, CountryRecord, RateData, RatesPayload};
pub use crate::domain::ports::{ConfigProvider, RateRepository, RateSource};
pub use crate::utils::error::Result;
