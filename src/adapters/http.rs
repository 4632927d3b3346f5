use crate::domain::model::RatesPayload;
use crate::domain::ports::{ConfigProvider, RateSource};
use crate::utils::error::{Result, VatError};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;

/// Fetches the rate list over HTTP. A single GET, no retries.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    endpoint: String,
    query: BTreeMap<String, String>,
}

impl HttpRateSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            query: BTreeMap::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(client, config.api_endpoint()).with_query(config.query_parameters()))
    }

    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<RatesPayload> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query)
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(VatError::Http {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Hands out a fixed payload, for offline runs and tests.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    payload: RatesPayload,
}

impl StaticRateSource {
    pub fn new(payload: RatesPayload) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn fetch(&self) -> Result<RatesPayload> {
        Ok(self.payload.clone())
    }
}
