use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const STANDARD_RATE: &str = "standard_rate";
pub const REDUCED_RATES: &str = "reduced_rates";

/// Raw payload as handed over by a rate source, before validation.
pub type RatesPayload = Value;

/// Per-country mapping stored verbatim in a record.
pub type RateData = Map<String, Value>;

/// ISO 3166 alpha-2 code, trimmed and upper-cased.
///
/// Deserialization goes through [`CountryCode::parse`], so a stored record cannot carry a
/// malformed code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(code.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("invalid country code {:?}", raw))
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coerces a JSON value to an exact decimal.
///
/// JSON numbers keep their source digits (serde_json's `arbitrary_precision`), so
/// `20.00000000000000001` is parsed as written rather than through an `f64`. Exponent form is
/// accepted. Numeric strings are accepted as well; everything else is rejected.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal(&n.to_string())
            }
        }
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Typed view over a record's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRates {
    pub standard_rate: Decimal,
    #[serde(default)]
    pub reduced_rates: BTreeMap<String, Decimal>,
}

impl CountryRates {
    /// `None` when there is no usable standard rate, e.g. a placeholder record with `{}`.
    /// Reduced rates that cannot be coerced are left out.
    pub fn from_data(data: &RateData) -> Option<Self> {
        let standard_rate = data.get(STANDARD_RATE).and_then(decimal_from_value)?;

        let reduced_rates = data
            .get(REDUCED_RATES)
            .and_then(Value::as_object)
            .map(|rates| {
                rates
                    .iter()
                    .filter_map(|(name, v)| decimal_from_value(v).map(|d| (name.clone(), d)))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            standard_rate,
            reduced_rates,
        })
    }

    /// The named reduced rate, or the standard rate when the name is absent or unknown.
    pub fn rate(&self, rate_name: Option<&str>) -> Decimal {
        rate_name
            .and_then(|name| self.reduced_rates.get(name))
            .copied()
            .unwrap_or(self.standard_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub country_code: CountryCode,
    pub data: RateData,
    pub updated_at: DateTime<Utc>,
}

impl CountryRecord {
    pub fn new(country_code: CountryCode, data: RateData) -> Self {
        Self {
            country_code,
            data,
            updated_at: Utc::now(),
        }
    }

    pub fn rates(&self) -> Option<CountryRates> {
        CountryRates::from_data(&self.data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
