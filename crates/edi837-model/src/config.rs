//! Engine configuration.
//!
//! Everything that the generator stamps into a document but does not read from
//! the claim records lives here: trading-partner identifiers, provider details,
//! per-role address defaults, fallback chains and control-number policy.
//! All sections implement [`Default`] so a TOML file only needs to name the
//! values it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::{AmountField, TextField};

/// Top-level configuration for a document generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub interchange: InterchangeConfig,
    pub submitter: SubmitterConfig,
    pub receiver: ReceiverConfig,
    pub billing_provider: BillingProviderConfig,
    pub claim: ClaimDefaults,
    pub pricing: PricingConfig,
    pub addresses: AddressDefaults,
    pub chains: FieldChains,
    pub limits: ElementLimits,
    pub dates: DatePolicy,
    pub control: ControlConfig,
    pub render: RenderConfig,
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_interchange(mut self, interchange: InterchangeConfig) -> Self {
        self.interchange = interchange;
        self
    }

    pub fn with_billing_provider(mut self, provider: BillingProviderConfig) -> Self {
        self.billing_provider = provider;
        self
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.dates = policy;
        self
    }

    pub fn with_rollover(mut self, rollover: RolloverPolicy) -> Self {
        self.control.rollover = rollover;
        self
    }

    pub fn with_newlines(mut self, enabled: bool) -> Self {
        self.render.newline_after_segment = enabled;
        self
    }
}

/// ISA/GS envelope identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterchangeConfig {
    pub sender_qualifier: String,
    pub sender_id: String,
    pub receiver_qualifier: String,
    pub receiver_id: String,
    /// `P` for production, `T` for test.
    pub usage_indicator: String,
    pub acknowledgment_requested: bool,
    /// GS08 / ST03 implementation convention reference.
    pub version: String,
}

impl Default for InterchangeConfig {
    fn default() -> Self {
        Self {
            sender_qualifier: "ZZ".to_string(),
            sender_id: "SENDER".to_string(),
            receiver_qualifier: "ZZ".to_string(),
            receiver_id: "RECEIVER".to_string(),
            usage_indicator: "P".to_string(),
            acknowledgment_requested: false,
            version: "005010X222A1".to_string(),
        }
    }
}

/// Loop 1000A.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    pub name: String,
    pub id: String,
    pub contact_name: String,
    pub contact_email: String,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            name: "SUBMITTER".to_string(),
            id: "SENDER".to_string(),
            contact_name: "EDI CONTACT".to_string(),
            contact_email: "edi@example.com".to_string(),
        }
    }
}

/// Loop 1000B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub name: String,
    pub id: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            name: "RECEIVER".to_string(),
            id: "RECEIVER".to_string(),
        }
    }
}

/// Loop 2000A/2010AA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingProviderConfig {
    pub name: String,
    pub npi: String,
    pub tax_id: String,
    pub taxonomy: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub contact_name: String,
    pub phone: String,
}

impl Default for BillingProviderConfig {
    fn default() -> Self {
        Self {
            name: "BILLING PROVIDER".to_string(),
            npi: "1234567893".to_string(),
            tax_id: "000000000".to_string(),
            taxonomy: "3336C0003X".to_string(),
            address: "1 MAIN ST".to_string(),
            city: "ANYTOWN".to_string(),
            state: "KY".to_string(),
            zip: "40202".to_string(),
            contact_name: "BILLING".to_string(),
            phone: "5555550100".to_string(),
        }
    }
}

/// Constants stamped into every claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimDefaults {
    /// SBR09 claim filing indicator.
    pub filing_indicator: String,
    /// CLM05 facility code, frequency is always `1` and the qualifier `B`.
    pub facility_code: String,
    /// HI01 composite.
    pub diagnosis: String,
    /// SV101-1:SV101-2 procedure composite prefix.
    pub procedure: String,
    pub unit: String,
    /// SV105 place of service.
    pub place_of_service: String,
    /// Claim-level K3 literal.
    pub claim_k3: String,
    /// Prefix for the BHT03 reference identifier.
    pub reference_prefix: String,
    /// REF*SY value emitted in place of the patient's identifier.
    pub ssn_placeholder: String,
    /// DMG03 when no gender can be derived.
    pub default_gender: String,
    /// NM1*77 name when the record has no pharmacy name.
    pub facility_name_placeholder: String,
}

impl Default for ClaimDefaults {
    fn default() -> Self {
        Self {
            filing_indicator: "WC".to_string(),
            facility_code: "01".to_string(),
            diagnosis: "ABK:R52".to_string(),
            procedure: "HC:99070".to_string(),
            unit: "UN".to_string(),
            place_of_service: "11".to_string(),
            claim_k3: "RX".to_string(),
            reference_prefix: "EDI".to_string(),
            ssn_placeholder: "999999999".to_string(),
            default_gender: "U".to_string(),
            facility_name_placeholder: "UNKNOWN".to_string(),
        }
    }
}

/// Which record amounts feed which X12 element, and whether HCP is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// SV102 line charge. The first non-zero candidate wins.
    pub charge: Vec<AmountField>,
    /// HCP02 amount due.
    pub due: Vec<AmountField>,
    /// HCP03 usual and customary.
    pub usual_and_customary: Vec<AmountField>,
    pub claim_level_hcp: bool,
    pub line_level_hcp: bool,
    /// HCP01 pricing methodology.
    pub methodology: String,
    /// HCP04 repricing organization identifier.
    pub repricer_id: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            charge: vec![AmountField::FeeSchedule, AmountField::PlanPaid],
            due: vec![AmountField::DueAmount, AmountField::MemberPaid],
            usual_and_customary: vec![AmountField::UsualAndCustomary],
            claim_level_hcp: true,
            line_level_hcp: true,
            methodology: "10".to_string(),
            repricer_id: "REPRICER".to_string(),
        }
    }
}

/// Values substituted for blank address parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDefault {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressDefault {
    pub fn placeholder(zip: &str) -> Self {
        Self {
            street: "Address Not Available".to_string(),
            city: "Unknown".to_string(),
            state: "XX".to_string(),
            zip: zip.to_string(),
        }
    }
}

impl Default for AddressDefault {
    fn default() -> Self {
        Self::placeholder("00000")
    }
}

/// Per-role address defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDefaults {
    pub patient: AddressDefault,
    pub payer: AddressDefault,
    pub facility: AddressDefault,
    pub prescriber: AddressDefault,
}

impl Default for AddressDefaults {
    fn default() -> Self {
        Self {
            patient: AddressDefault::placeholder("00000"),
            payer: AddressDefault {
                street: "PO BOX 436909".to_string(),
                city: "LOUISVILLE".to_string(),
                state: "KY".to_string(),
                zip: "40253".to_string(),
            },
            facility: AddressDefault::placeholder("00000"),
            prescriber: AddressDefault::placeholder("00000"),
        }
    }
}

/// Ordered fallback chains over text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldChains {
    pub grouping_key: Vec<TextField>,
    pub drug_description: Vec<TextField>,
    pub birth_date: Vec<TextField>,
    pub service_date: Vec<TextField>,
}

impl Default for FieldChains {
    fn default() -> Self {
        Self {
            grouping_key: vec![TextField::ClaimNumber, TextField::SubscriberNum],
            drug_description: vec![TextField::DrugName, TextField::Drug],
            birth_date: vec![TextField::Dob, TextField::DateOfInjury],
            service_date: vec![TextField::TransDate, TextField::RxDate],
        }
    }
}

/// Maximum lengths for free-text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementLimits {
    pub organization_name: usize,
    pub last_name: usize,
    pub first_name: usize,
    pub identifier: usize,
    pub street: usize,
    pub city: usize,
    pub state: usize,
    pub zip: usize,
    pub reference: usize,
    pub claim_id: usize,
    pub description: usize,
    pub product_id: usize,
    pub contact_name: usize,
}

impl Default for ElementLimits {
    fn default() -> Self {
        Self {
            organization_name: 60,
            last_name: 60,
            first_name: 35,
            identifier: 80,
            street: 55,
            city: 30,
            state: 2,
            zip: 15,
            reference: 50,
            claim_id: 38,
            description: 80,
            product_id: 48,
            contact_name: 60,
        }
    }
}

/// What to do with a date that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Abort the document with [`FormatError::InvalidDate`](crate::FormatError::InvalidDate).
    #[default]
    Strict,
    /// Emit an empty value and record a warning.
    SubstituteEmpty,
}

/// Behavior when a counter passes its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverPolicy {
    /// Refuse to issue a number.
    #[default]
    Fail,
    /// Restart at 1.
    Wrap,
}

/// Control-number persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub rollover: RolloverPolicy,
    pub state_path: PathBuf,
    /// How long to wait for another writer to release the state file.
    pub lock_timeout_ms: u64,
    /// Number of rotated backups kept next to the state file.
    pub backups: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rollover: RolloverPolicy::Fail,
            state_path: PathBuf::from("control_numbers.json"),
            lock_timeout_ms: 10_000,
            backups: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Put a newline after every segment terminator.
    pub newline_after_segment: bool,
}
