use crate::domain::model::{CountryCode, CountryRecord, RateData, RatesPayload, UpsertOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// Persistence for one record per country code.
pub trait RateRepository: Send + Sync {
    fn get(&self, code: &CountryCode) -> Result<Option<CountryRecord>>;

    fn upsert(&self, code: &CountryCode, data: RateData) -> Result<UpsertOutcome>;

    /// Writes a whole payload's worth of records.
    ///
    /// The default implementation upserts one record at a time, so a failing write can leave
    /// earlier records applied. Adapters that can swap the batch in atomically override it.
    fn upsert_batch(&self, records: Vec<(CountryCode, RateData)>) -> Result<Vec<UpsertOutcome>> {
        records
            .into_iter()
            .map(|(code, data)| self.upsert(&code, data))
            .collect()
    }

    fn count(&self) -> Result<usize>;

    fn country_codes(&self) -> Result<Vec<CountryCode>>;
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> Result<RatesPayload>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn query_parameters(&self) -> BTreeMap<String, String>;
    fn store_path(&self) -> &str;
    fn timeout(&self) -> Duration;
}
