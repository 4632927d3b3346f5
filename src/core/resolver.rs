use crate::domain::model::{CountryCode, CountryRates, RateData};
use crate::domain::ports::RateRepository;
use crate::utils::error::Result;
use rust_decimal::Decimal;

/// Rate named `rate_name` in a stored `data` mapping, falling back to the standard rate.
///
/// Returns `None` only when the mapping has no usable standard rate. An unknown rate name
/// is not an error: it resolves to the standard rate.
pub fn rate_from_data(data: &RateData, rate_name: Option<&str>) -> Option<Decimal> {
    CountryRates::from_data(data).map(|rates| rates.rate(rate_name))
}

/// Effective rate for `country_code`, or `None` for countries without a usable record.
///
/// Errors only come from the repository itself.
pub fn resolve<R>(repository: &R, country_code: &str, rate_name: Option<&str>) -> Result<Option<Decimal>>
where
    R: RateRepository + ?Sized,
{
    let Some(code) = CountryCode::parse(country_code) else {
        tracing::debug!("Not a country code: {:?}", country_code);
        return Ok(None);
    };

    let rate = repository
        .get(&code)?
        .and_then(|record| rate_from_data(&record.data, rate_name));

    if rate.is_none() {
        tracing::debug!("No VAT rate stored for {}", code);
    }
    Ok(rate)
}

/// Every stored rate for `country_code`.
pub fn rates_for_country<R>(repository: &R, country_code: &str) -> Result<Option<CountryRates>>
where
    R: RateRepository + ?Sized,
{
    let Some(code) = CountryCode::parse(country_code) else {
        return Ok(None);
    };
    Ok(repository.get(&code)?.and_then(|record| record.rates()))
}
