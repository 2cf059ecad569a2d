//! Shared fixtures for generator tests.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Once;

use chrono::NaiveDate;
use edi837_core::FixedClock;
use edi837_model::ClaimRecord;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`. Silent by default.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2025, 1, 9)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap(),
    )
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// A fully populated prescription record.
pub fn prescription(record_id: &str, claim_number: &str) -> ClaimRecord {
    ClaimRecord {
        record_id: record_id.to_string(),
        claim_number: claim_number.to_string(),
        first_name: "JANE".to_string(),
        last_name: "DOE".to_string(),
        dob: "1980-04-12".to_string(),
        date_of_injury: "2024-02-01".to_string(),
        gender: "F".to_string(),
        patient_address: "12 ELM ST, LOUISVILLE, KY".to_string(),
        client_name: "ACME INSURANCE".to_string(),
        client_id: "ACME01".to_string(),
        client_address: "PO BOX 1, FRANKFORT, KY".to_string(),
        pharmacy_npi: "1447286811".to_string(),
        pharmacy_name: "CORNER PHARMACY".to_string(),
        pharmacy_address: "9 OAK AVE, LEXINGTON, KY".to_string(),
        prescriber_npi: "1922081687".to_string(),
        prescriber_name: "SMITH, JOHN".to_string(),
        trans_date: "2024-05-01".to_string(),
        rx_date: "2024-04-28".to_string(),
        rx_no: "RX778899".to_string(),
        drug_name: "AMOXICILLIN 500MG".to_string(),
        ndc: "00093-3109-01".to_string(),
        quantity: Some(dec("30")),
        days_supply: Some(10),
        daw: "0".to_string(),
        brand_gen: "G".to_string(),
        fee_schedule: Some(dec("42.5")),
        member_paid: Some(dec("5")),
        u_and_c: Some(dec("60")),
        ..ClaimRecord::default()
    }
}
