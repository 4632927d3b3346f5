use crate::core::ingest::{self, IngestReport};
use crate::domain::ports::{RateRepository, RateSource};
use crate::utils::error::Result;
use std::time::Instant;

/// Fetch-then-ingest run over an injected source and repository.
pub struct RateSync<S: RateSource, R: RateRepository> {
    source: S,
    repository: R,
}

impl<S: RateSource, R: RateRepository> RateSync<S, R> {
    pub fn new(source: S, repository: R) -> Self {
        Self { source, repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn run(&self) -> Result<IngestReport> {
        let started = Instant::now();
        tracing::info!("Starting VAT rate sync");

        let before = self.repository.count()?;
        tracing::info!("Fetching, validating and storing rates...");
        let report = ingest::sync_from_source(&self.source, &self.repository).await?;
        let after = self.repository.count()?;

        tracing::info!(
            "Sync finished in {:?}: {} countries stored ({} before)",
            started.elapsed(),
            after,
            before
        );
        Ok(report)
    }
}
