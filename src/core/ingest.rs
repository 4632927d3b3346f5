use crate::core::validator;
use crate::domain::model::{CountryCode, RatesPayload, UpsertOutcome};
use crate::domain::ports::{RateRepository, RateSource};
use crate::utils::error::Result;

/// Country codes touched by one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub created: Vec<CountryCode>,
    pub updated: Vec<CountryCode>,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len()
    }
}

/// Validates `payload` and upserts one record per country.
///
/// Nothing reaches the repository unless the whole payload passes validation. The records
/// are then written with a single `upsert_batch` call, so the atomicity of the write is
/// whatever the repository's batch upsert guarantees.
pub fn ingest<R>(repository: &R, payload: &RatesPayload) -> Result<IngestReport>
where
    R: RateRepository + ?Sized,
{
    let entries = validator::validated_entries(payload)?;
    let codes: Vec<CountryCode> = entries.iter().map(|(code, _)| code.clone()).collect();

    tracing::debug!("Upserting {} country records", codes.len());
    let outcomes = repository.upsert_batch(entries)?;

    let mut report = IngestReport::default();
    for (code, outcome) in codes.into_iter().zip(outcomes) {
        match outcome {
            UpsertOutcome::Created => report.created.push(code),
            UpsertOutcome::Updated => report.updated.push(code),
        }
    }

    tracing::info!(
        "Ingested VAT rates: {} created, {} updated",
        report.created.len(),
        report.updated.len()
    );
    Ok(report)
}

/// Fetches from the injected source and ingests the result.
pub async fn sync_from_source<S, R>(source: &S, repository: &R) -> Result<IngestReport>
where
    S: RateSource + ?Sized,
    R: RateRepository + ?Sized,
{
    let payload = source.fetch().await?;
    ingest(repository, &payload)
}
