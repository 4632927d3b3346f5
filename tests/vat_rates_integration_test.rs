use httpmock::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::BTreeSet;
use std::str::FromStr;
use tempfile::TempDir;
use vat_rates::{
    check, ingest, resolve, validate, CountryCode, HttpRateSource, InMemoryRepository,
    JsonFileRepository, RateRepository, RateSync, StaticRateSource, VatError,
};

fn json_success() -> serde_json::Value {
    json!({
        "success": true,
        "rates": {
            "AT": {
                "country_name": "Austria",
                "standard_rate": 20,
                "reduced_rates": {"foodstuffs": 10, "books": 10, "medicine": 20}
            }
        }
    })
}

fn json_error() -> serde_json::Value {
    json!({
        "success": false,
        "error": {
            "code": 101,
            "type": "missing_access_key",
            "info": "You have not supplied an API Access Key."
        }
    })
}

#[test]
fn test_validate_payloads() {
    assert!(validate(&json_success()).is_ok());
    assert!(matches!(
        validate(&json_error()),
        Err(VatError::Configuration { .. })
    ));
    assert!(check(&json!({"rates": {}})).len() == 1);
}

#[test]
fn test_ingest_counts() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("rates.json"));
    let before = repo.count().unwrap();

    assert!(matches!(
        ingest(&repo, &json_error()),
        Err(VatError::Configuration { .. })
    ));
    assert_eq!(repo.count().unwrap(), before);

    ingest(&repo, &json_success()).unwrap();
    assert_eq!(repo.count().unwrap(), before + 1);
}

#[test]
fn test_ingest_union_of_countries() {
    let repo = InMemoryRepository::new();
    ingest(
        &repo,
        &json!({"rates": {"AT": {"standard_rate": 20}, "DE": {"standard_rate": 19}}}),
    )
    .unwrap();

    let report = ingest(
        &repo,
        &json!({"rates": {"DE": {"standard_rate": 19}, "FR": {"standard_rate": 20}}}),
    )
    .unwrap();

    assert_eq!(report.created, vec![CountryCode::parse("FR").unwrap()]);
    assert_eq!(report.updated, vec![CountryCode::parse("DE").unwrap()]);

    let codes: BTreeSet<String> = repo
        .country_codes()
        .unwrap()
        .into_iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(
        codes,
        ["AT", "DE", "FR"]
            .iter()
            .map(|c| c.to_string())
            .collect::<BTreeSet<String>>()
    );
}

#[test]
fn test_resolve_scenarios() {
    let repo = InMemoryRepository::new();
    ingest(
        &repo,
        &json!({"rates": {"AT": {
            "standard_rate": 20,
            "reduced_rates": {"books": 10, "medicine": 20}
        }}}),
    )
    .unwrap();
    repo.upsert(&CountryCode::parse("AU").unwrap(), serde_json::Map::new())
        .unwrap();

    assert_eq!(resolve(&repo, "AT", Some("books")).unwrap(), Some(dec!(10)));
    assert_eq!(resolve(&repo, "AT", Some("medicine")).unwrap(), Some(dec!(20)));
    assert_eq!(resolve(&repo, "AT", None).unwrap(), Some(dec!(20)));
    assert_eq!(
        resolve(&repo, "AT", Some("nonexistent-rate")).unwrap(),
        Some(dec!(20))
    );
    assert_eq!(resolve(&repo, "AU", None).unwrap(), None);
    assert_eq!(resolve(&repo, "XX", Some("anything")).unwrap(), None);
}

#[test]
fn test_round_trip_keeps_exact_decimals() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("rates.json"));
    let payload = json!({"rates": {
        "AT": {"standard_rate": 20},
        "HU": {"standard_rate": 27},
        "LU": {"standard_rate": 17.0},
        "CH": {"standard_rate": 8.1},
        "JE": {"standard_rate": "5.5"}
    }});

    ingest(&repo, &payload).unwrap();

    assert_eq!(resolve(&repo, "AT", None).unwrap(), Some(dec!(20)));
    assert_eq!(resolve(&repo, "HU", None).unwrap(), Some(dec!(27)));
    assert_eq!(resolve(&repo, "LU", None).unwrap(), Some(dec!(17)));
    assert_eq!(resolve(&repo, "CH", None).unwrap(), Some(dec!(8.1)));
    assert_eq!(resolve(&repo, "JE", None).unwrap(), Some(dec!(5.5)));
}

#[test]
fn test_round_trip_from_raw_json_text() {
    let dir = TempDir::new().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("rates.json"));
    let payload: serde_json::Value = serde_json::from_str(
        r#"{"rates": {"AT": {"standard_rate": 20.00000000000000001, "reduced_rates": {"books": 9.999999999999999999}}}}"#,
    )
    .unwrap();

    ingest(&repo, &payload).unwrap();

    // Read back through a fresh handle so the value survives the JSON file as well.
    let reopened = JsonFileRepository::new(dir.path().join("rates.json"));
    assert_eq!(
        resolve(&reopened, "AT", None).unwrap(),
        Some(Decimal::from_str("20.00000000000000001").unwrap())
    );
    assert_eq!(
        resolve(&reopened, "AT", Some("books")).unwrap(),
        Some(Decimal::from_str("9.999999999999999999").unwrap())
    );
}

#[tokio::test]
async fn test_sync_over_http() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/rate_list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json_success());
    });

    let source = HttpRateSource::new(reqwest::Client::new(), server.url("/api/rate_list"));
    let repository = JsonFileRepository::new(dir.path().join("rates.json"));
    let sync = RateSync::new(source, repository);

    let report = sync.run().await.unwrap();
    api_mock.assert();
    assert_eq!(report.total(), 1);
    assert_eq!(
        resolve(sync.repository(), "at", Some("books")).unwrap(),
        Some(dec!(10))
    );
}

#[tokio::test]
async fn test_sync_with_error_envelope_is_fatal() {
    let sync = RateSync::new(StaticRateSource::new(json_error()), InMemoryRepository::new());

    let err = sync.run().await.unwrap_err();
    assert!(err.user_friendly_message().contains("API Access Key"));
    assert!(err.exit_code() > 0);
    assert_eq!(sync.repository().count().unwrap(), 0);
}
