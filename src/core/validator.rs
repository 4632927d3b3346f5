//! Shape check for payloads coming from a rate source.
//!
//! The expected shape is described by [`PAYLOAD_SCHEMA`] and [`COUNTRY_SCHEMA`]; a single pass
//! walks the payload and collects every violated field instead of stopping at the first one.

use crate::domain::model::{
    decimal_from_value, CountryCode, RateData, RatesPayload, REDUCED_RATES, STANDARD_RATE,
};
use crate::utils::error::{Result, VatError, Violation, ViolationKind};
use serde_json::Value;
use std::collections::HashSet;

pub const RATES: &str = "rates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A number or numeric string.
    Decimal,
    /// An object whose values are all decimals. May be empty.
    DecimalMap,
    /// An object with at least one entry.
    NonEmptyObject,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: ValueKind,
}

pub const PAYLOAD_SCHEMA: &[FieldSpec] = &[FieldSpec {
    name: RATES,
    required: true,
    kind: ValueKind::NonEmptyObject,
}];

pub const COUNTRY_SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: STANDARD_RATE,
        required: true,
        kind: ValueKind::Decimal,
    },
    FieldSpec {
        name: REDUCED_RATES,
        required: false,
        kind: ValueKind::DecimalMap,
    },
];

/// Returns every violation found in `payload`; empty means the payload is trustworthy.
pub fn check(payload: &RatesPayload) -> Vec<Violation> {
    inspect(payload).1
}

/// Fails with `VatError::Configuration` unless the payload has the expected shape.
pub fn validate(payload: &RatesPayload) -> Result<()> {
    validated_entries(payload).map(|_| ())
}

/// Validates and hands back the per-country entries with normalised codes.
pub(crate) fn validated_entries(payload: &RatesPayload) -> Result<Vec<(CountryCode, RateData)>> {
    let (entries, violations) = inspect(payload);
    if violations.is_empty() {
        Ok(entries)
    } else {
        tracing::debug!("Payload rejected with {} violation(s)", violations.len());
        Err(VatError::configuration(violations))
    }
}

fn inspect(payload: &RatesPayload) -> (Vec<(CountryCode, RateData)>, Vec<Violation>) {
    let mut violations = Vec::new();
    let mut entries = Vec::new();

    let Some(root) = payload.as_object() else {
        violations.push(Violation::new("payload", ViolationKind::NotAnObject));
        return (entries, violations);
    };

    // Error envelope: {"success": false, "error": {"info": "..."}}
    if root.get("success") == Some(&Value::Bool(false)) {
        let info = root
            .get("error")
            .and_then(|e| e.get("info"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        violations.push(Violation::new(
            "source",
            ViolationKind::SourceError(info.to_string()),
        ));
        return (entries, violations);
    }

    check_fields(root, PAYLOAD_SCHEMA, "", &mut violations);

    let Some(rates) = root.get(RATES).and_then(Value::as_object) else {
        return (entries, violations);
    };

    let mut seen = HashSet::new();
    for (raw_code, value) in rates {
        let path = format!("{}.{}", RATES, raw_code);

        let Some(code) = CountryCode::parse(raw_code) else {
            violations.push(Violation::new(path, ViolationKind::InvalidCountryCode));
            continue;
        };
        if !seen.insert(code.clone()) {
            violations.push(Violation::new(path, ViolationKind::DuplicateCountryCode));
            continue;
        }

        match value.as_object() {
            Some(country) => {
                check_fields(country, COUNTRY_SCHEMA, &path, &mut violations);
                entries.push((code, country.clone()));
            }
            None => violations.push(Violation::new(path, ViolationKind::NotAnObject)),
        }
    }

    (entries, violations)
}

fn check_fields(
    object: &serde_json::Map<String, Value>,
    schema: &[FieldSpec],
    prefix: &str,
    violations: &mut Vec<Violation>,
) {
    for spec in schema {
        let path = if prefix.is_empty() {
            spec.name.to_string()
        } else {
            format!("{}.{}", prefix, spec.name)
        };

        match object.get(spec.name) {
            None => {
                if spec.required {
                    violations.push(Violation::new(path, ViolationKind::Missing));
                }
            }
            Some(Value::Null) if !spec.required => {}
            Some(value) => check_kind(value, spec.kind, path, violations),
        }
    }
}

fn check_kind(value: &Value, kind: ValueKind, path: String, violations: &mut Vec<Violation>) {
    match kind {
        ValueKind::Decimal => check_rate(value, path, violations),
        ValueKind::DecimalMap => match value.as_object() {
            Some(map) => {
                for (name, rate) in map {
                    check_rate(rate, format!("{}.{}", path, name), violations);
                }
            }
            None => violations.push(Violation::new(path, ViolationKind::NotAnObject)),
        },
        ValueKind::NonEmptyObject => match value.as_object() {
            Some(map) if map.is_empty() => {
                violations.push(Violation::new(path, ViolationKind::Empty))
            }
            Some(_) => {}
            None => violations.push(Violation::new(path, ViolationKind::NotAnObject)),
        },
    }
}

// Rates are percentages; zero is a valid rate, below zero is not.
fn check_rate(value: &Value, path: String, violations: &mut Vec<Violation>) {
    match decimal_from_value(value) {
        None => violations.push(Violation::new(path, ViolationKind::NotANumber)),
        Some(rate) if rate.is_sign_negative() && !rate.is_zero() => {
            violations.push(Violation::new(path, ViolationKind::NegativeRate))
        }
        Some(_) => {}
    }
}
