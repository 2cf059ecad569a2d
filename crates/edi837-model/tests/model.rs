use std::fs;
use std::str::FromStr;

use edi837_model::{ClaimRecord, ConfigError, EngineConfig, RolloverPolicy};
use rust_decimal::Decimal;

#[test]
fn record_deserializes_upstream_shape() {
    let json = r#"{
        "_id": "65f0c0ffee",
        "claim_number": "WC-100",
        "first_name": "JANE",
        "last_name": "DOE",
        "ssno": "123456782",
        "doctor_no": "1999999984",
        "doctor_name": "SMITH, JOHN",
        "quantity": 30,
        "days_supply": 30,
        "plan_paid": "45.10",
        "member_paid": 0
    }"#;
    let record: ClaimRecord = serde_json::from_str(json).expect("deserialize record");
    assert_eq!(record.record_id, "65f0c0ffee");
    assert_eq!(record.ssn, "123456782");
    assert_eq!(record.prescriber_npi, "1999999984");
    assert_eq!(record.prescriber_name, "SMITH, JOHN");
    assert_eq!(record.quantity, Some(Decimal::from(30)));
    assert_eq!(record.days_supply, Some(30));
    assert_eq!(record.plan_paid, Some(Decimal::from_str("45.10").unwrap()));
    assert_eq!(record.member_paid, Some(Decimal::ZERO));
    assert_eq!(record.fee_schedule, None);
    assert!(record.pharmacy_npi.is_empty());
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engine.toml");
    fs::write(
        &path,
        r#"
        [billing_provider]
        name = "CORNER PHARMACY"
        npi = "1111111112"

        [control]
        rollover = "wrap"
        backups = 0
        "#,
    )
    .expect("write config");

    let config = EngineConfig::load(&path).expect("load config");
    assert_eq!(config.billing_provider.name, "CORNER PHARMACY");
    assert_eq!(config.billing_provider.taxonomy, "3336C0003X");
    assert_eq!(config.control.rollover, RolloverPolicy::Wrap);
    assert_eq!(config.control.backups, 0);
}

#[test]
fn missing_config_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = EngineConfig::load(&path).expect_err("missing file");
    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}
