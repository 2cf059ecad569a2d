//! Record-level normalization into element-ready values.

use chrono::NaiveDate;
use edi837_model::{
    AddressDefault, ClaimRecord, DatePolicy, Diagnostics, EngineConfig, FormatError,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::fallback::{first_amount, first_text};
use crate::normalization::{
    Clamp, DateFormat, PostalAddress, derive_gender, format_date, parse_address, parse_date,
    split_name,
};

/// Hard ceiling for the claim reference (`REF*D9`), whatever the configured
/// reference limit.
pub const CLAIM_REFERENCE_MAX: usize = 50;

/// A record that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record '{record_id}': {source}")]
pub struct TransformError {
    pub record_id: String,
    #[source]
    pub source: FormatError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientFields {
    pub last_name: String,
    pub first_name: String,
    /// `CCYYMMDD` or empty.
    pub birth_date: String,
    /// `CCYYMMDD` or empty.
    pub injury_date: String,
    pub gender: String,
    pub address: PostalAddress,
}

impl PatientFields {
    /// Whether two records describe the same person.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.last_name == other.last_name
            && self.first_name == other.first_name
            && self.birth_date == other.birth_date
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayerFields {
    pub name: String,
    pub id: String,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityFields {
    pub name: String,
    pub npi: String,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriberFields {
    pub last_name: String,
    pub first_name: String,
    pub npi: String,
    pub address: Option<PostalAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFields {
    /// `CCYYMMDD`.
    pub service_date: String,
    pub rx_number: String,
    pub description: String,
    pub ndc: String,
    pub quantity: Decimal,
    pub days_supply: Option<u32>,
    pub written_date: Option<NaiveDate>,
    pub daw: Option<u8>,
    pub brand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingFields {
    pub charge: Decimal,
    pub due: Decimal,
    pub usual_and_customary: Decimal,
}

/// Everything the assembler needs from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    pub record_id: String,
    /// Untruncated grouping key, `None` when every candidate is blank.
    pub grouping_key: Option<String>,
    /// Grouping key clamped for CLM01.
    pub claim_id: String,
    pub patient: PatientFields,
    pub payer: PayerFields,
    pub facility: FacilityFields,
    pub prescriber: Option<PrescriberFields>,
    pub service: ServiceFields,
    pub pricing: PricingFields,
    /// Service date, facility NPI and record id, clamped for REF02.
    pub claim_reference: String,
}

struct DateResolver<'a> {
    policy: DatePolicy,
    record_id: &'a str,
}

impl DateResolver<'_> {
    /// Blank input yields `None`. Unparsable input follows the policy.
    fn resolve(
        &self,
        label: &str,
        value: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<NaiveDate>, FormatError> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        match parse_date(value) {
            Ok(date) => Ok(Some(date)),
            Err(err) => match self.policy {
                DatePolicy::Strict => Err(err),
                DatePolicy::SubstituteEmpty => {
                    tracing::warn!(
                        record_id = self.record_id,
                        field = label,
                        "substituted empty date"
                    );
                    diagnostics.warn(
                        "DATE_SUBSTITUTED",
                        format!("{label} could not be parsed and was left empty"),
                        Some(self.record_id),
                    );
                    Ok(None)
                }
            },
        }
    }
}

fn ccyymmdd(date: Option<NaiveDate>) -> String {
    date.map(|d| format_date(d, DateFormat::Ccyymmdd))
        .unwrap_or_default()
}

fn postal(
    clamp: &mut Clamp<'_>,
    config: &EngineConfig,
    raw: &str,
    defaults: &AddressDefault,
) -> PostalAddress {
    let limits = &config.limits;
    let address = PostalAddress::from_parsed(parse_address(raw), defaults);
    PostalAddress {
        street: clamp.apply("N301", &address.street, limits.street),
        city: clamp.apply("N401", &address.city, limits.city),
        state: clamp.apply("N402", &address.state, limits.state),
        zip: clamp.apply("N403", &address.zip, limits.zip),
    }
}

/// The claim grouping key of `record`, trimmed.
///
/// Cheap enough to run before [`normalize_record`], so keyless records can be
/// set aside without their dates ever being parsed.
pub fn grouping_key<'a>(record: &'a ClaimRecord, config: &EngineConfig) -> Option<&'a str> {
    first_text(record, &config.chains.grouping_key)
}

/// Normalize one record.
///
/// Truncations and substituted dates are recorded in `diagnostics`. A missing
/// grouping key is not an error here; the assembler decides what to do with it.
///
/// # Errors
///
/// Returns a [`TransformError`] when a date cannot be parsed under
/// [`DatePolicy::Strict`] or the record has no service date.
pub fn normalize_record(
    record: &ClaimRecord,
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> Result<NormalizedFields, TransformError> {
    normalize_inner(record, config, diagnostics).map_err(|source| TransformError {
        record_id: record.record_id.clone(),
        source,
    })
}

fn normalize_inner(
    record: &ClaimRecord,
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> Result<NormalizedFields, FormatError> {
    let record_id = record.record_id.as_str();
    let limits = config.limits;
    let chains = &config.chains;
    let dates = DateResolver {
        policy: config.dates,
        record_id,
    };

    let birth_date = match first_text(record, &chains.birth_date) {
        Some(value) => dates.resolve("birth date", value, diagnostics)?,
        None => None,
    };
    let injury_date = dates.resolve("injury date", &record.date_of_injury, diagnostics)?;
    let written_date = dates.resolve("written date", &record.rx_date, diagnostics)?;
    let service_raw = first_text(record, &chains.service_date).unwrap_or_default();
    let service_date = dates
        .resolve("service date", service_raw, diagnostics)?
        .ok_or_else(|| FormatError::invalid_date(service_raw))?;

    let grouping_key = grouping_key(record, config).map(str::to_string);
    let gender = derive_gender(&record.gender, &record.ssn)
        .map_or_else(|| config.claim.default_gender.clone(), |g| g.code().to_string());

    let mut clamp = Clamp::new(Some(record_id), diagnostics);

    let claim_id = clamp.apply(
        "CLM01",
        grouping_key.as_deref().unwrap_or_default(),
        limits.claim_id,
    );

    let patient = PatientFields {
        last_name: clamp.apply("NM103", &record.last_name, limits.last_name),
        first_name: clamp.apply("NM104", &record.first_name, limits.first_name),
        birth_date: ccyymmdd(birth_date),
        injury_date: ccyymmdd(injury_date),
        gender,
        address: postal(
            &mut clamp,
            config,
            &record.patient_address,
            &config.addresses.patient,
        ),
    };

    let payer = PayerFields {
        name: clamp.apply("NM103", &record.client_name, limits.organization_name),
        id: clamp.apply("NM109", &record.client_id, limits.identifier),
        address: postal(
            &mut clamp,
            config,
            &record.client_address,
            &config.addresses.payer,
        ),
    };

    let facility_name = if record.pharmacy_name.trim().is_empty() {
        config.claim.facility_name_placeholder.as_str()
    } else {
        record.pharmacy_name.as_str()
    };
    let facility = FacilityFields {
        name: clamp.apply("NM103", facility_name, limits.organization_name),
        npi: clamp.apply("NM109", &record.pharmacy_npi, limits.identifier),
        address: postal(
            &mut clamp,
            config,
            &record.pharmacy_address,
            &config.addresses.facility,
        ),
    };

    let prescriber = if record.prescriber_npi.trim().is_empty()
        && record.prescriber_name.trim().is_empty()
    {
        None
    } else {
        let name = split_name(&record.prescriber_name);
        let address = if parse_address(&record.prescriber_address).is_empty() {
            None
        } else {
            Some(postal(
                &mut clamp,
                config,
                &record.prescriber_address,
                &config.addresses.prescriber,
            ))
        };
        Some(PrescriberFields {
            last_name: clamp.apply("NM103", &name.last, limits.last_name),
            first_name: clamp.apply("NM104", &name.first, limits.first_name),
            npi: clamp.apply("NM109", &record.prescriber_npi, limits.identifier),
            address,
        })
    };

    let description = first_text(record, &chains.drug_description).unwrap_or_default();
    let ndc: String = record
        .ndc
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let service = ServiceFields {
        service_date: format_date(service_date, DateFormat::Ccyymmdd),
        rx_number: clamp.apply("REF02", &record.rx_no, limits.reference),
        description: clamp.apply("SV101", description, limits.description),
        ndc: clamp.apply("LIN03", &ndc, limits.product_id),
        quantity: record.quantity.unwrap_or(Decimal::ZERO),
        days_supply: record.days_supply,
        written_date,
        daw: record
            .daw
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| u8::try_from(d).ok()),
        brand: record.brand_gen.trim().to_ascii_uppercase().starts_with('B'),
    };

    let pricing = PricingFields {
        charge: first_amount(record, &config.pricing.charge).unwrap_or(Decimal::ZERO),
        due: first_amount(record, &config.pricing.due).unwrap_or(Decimal::ZERO),
        usual_and_customary: first_amount(record, &config.pricing.usual_and_customary)
            .unwrap_or(Decimal::ZERO),
    };

    let reference = format!(
        "{}{}{}",
        service.service_date,
        record.pharmacy_npi.trim(),
        record_id.trim()
    );
    let claim_reference = clamp.apply(
        "REF02",
        &reference,
        limits.reference.min(CLAIM_REFERENCE_MAX),
    );

    Ok(NormalizedFields {
        record_id: record_id.to_string(),
        grouping_key,
        claim_id,
        patient,
        payer,
        facility,
        prescriber,
        service,
        pricing,
        claim_reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ClaimRecord {
        ClaimRecord {
            record_id: "abc123".to_string(),
            claim_number: "WC-1".to_string(),
            first_name: "JANE".to_string(),
            last_name: "DOE".to_string(),
            dob: "1980-02-29".to_string(),
            ssn: "123456782".to_string(),
            pharmacy_npi: "1234567893".to_string(),
            trans_date: "2024-05-01T00:00:00Z".to_string(),
            rx_date: "2024-04-30".to_string(),
            prescriber_name: "SMITH, JOHN".to_string(),
            prescriber_npi: "1999999984".to_string(),
            plan_paid: Some(Decimal::new(4510, 2)),
            member_paid: Some(Decimal::new(500, 2)),
            ..ClaimRecord::default()
        }
    }

    #[test]
    fn normalizes_core_fields() {
        let mut diagnostics = Diagnostics::new();
        let fields = normalize_record(&record(), &EngineConfig::default(), &mut diagnostics)
            .expect("normalize");
        assert_eq!(fields.grouping_key.as_deref(), Some("WC-1"));
        assert_eq!(fields.patient.birth_date, "19800229");
        assert_eq!(fields.patient.gender, "F");
        assert_eq!(fields.patient.address.zip, "00000");
        assert_eq!(fields.payer.address.state, "KY");
        assert_eq!(fields.service.service_date, "20240501");
        assert_eq!(
            fields.service.written_date,
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
        assert_eq!(fields.pricing.charge, Decimal::new(4510, 2));
        assert_eq!(fields.pricing.due, Decimal::new(500, 2));
        assert_eq!(fields.claim_reference, "202405011234567893abc123");
        let prescriber = fields.prescriber.expect("prescriber");
        assert_eq!(prescriber.last_name, "SMITH");
        assert!(prescriber.address.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn strict_policy_rejects_bad_date_with_record_id() {
        let mut bad = record();
        bad.date_of_injury = "not a date".to_string();
        let err = normalize_record(&bad, &EngineConfig::default(), &mut Diagnostics::new())
            .unwrap_err();
        assert_eq!(err.record_id, "abc123");
        assert_eq!(err.source, FormatError::invalid_date("not a date"));
    }

    #[test]
    fn substitute_policy_empties_bad_date() {
        let mut bad = record();
        bad.date_of_injury = "not a date".to_string();
        let config = EngineConfig::default().with_date_policy(DatePolicy::SubstituteEmpty);
        let mut diagnostics = Diagnostics::new();
        let fields = normalize_record(&bad, &config, &mut diagnostics).expect("normalize");
        assert!(fields.patient.injury_date.is_empty());
        assert_eq!(diagnostics.issues[0].code, "DATE_SUBSTITUTED");
    }

    #[test]
    fn missing_service_date_is_an_error() {
        let mut bad = record();
        bad.trans_date.clear();
        bad.rx_date.clear();
        let config = EngineConfig::default().with_date_policy(DatePolicy::SubstituteEmpty);
        assert!(normalize_record(&bad, &config, &mut Diagnostics::new()).is_err());
    }

    #[test]
    fn long_reference_is_truncated() {
        let mut long = record();
        long.record_id = "X".repeat(60);
        let mut diagnostics = Diagnostics::new();
        let fields =
            normalize_record(&long, &EngineConfig::default(), &mut diagnostics).expect("normalize");
        assert_eq!(fields.claim_reference.chars().count(), 50);
        assert!(
            diagnostics
                .truncations
                .iter()
                .any(|warning| warning.element == "REF02")
        );
    }

    #[test]
    fn raised_reference_limit_still_caps_claim_reference() {
        let mut long = record();
        long.record_id = "X".repeat(60);
        let mut config = EngineConfig::default();
        config.limits.reference = 80;
        let mut diagnostics = Diagnostics::new();
        let fields = normalize_record(&long, &config, &mut diagnostics).expect("normalize");
        assert_eq!(fields.claim_reference.chars().count(), CLAIM_REFERENCE_MAX);
        let warning = diagnostics
            .truncations
            .iter()
            .find(|warning| warning.element == "REF02")
            .expect("truncation reported");
        assert_eq!(warning.max_len, CLAIM_REFERENCE_MAX);
        assert_eq!(warning.original_len, 8 + 10 + 60);
    }

    #[test]
    fn grouping_key_prefers_claim_number() {
        let config = EngineConfig::default();
        let mut keyed = record();
        keyed.subscriber_num = "SUB-1".to_string();
        assert_eq!(grouping_key(&keyed, &config), Some("WC-1"));
        keyed.claim_number = "  ".to_string();
        assert_eq!(grouping_key(&keyed, &config), Some("SUB-1"));
        keyed.subscriber_num.clear();
        assert_eq!(grouping_key(&keyed, &config), None);
    }
}
