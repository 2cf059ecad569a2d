//! The flat claim record consumed by the engine.
//!
//! One record is one dispensed prescription. Upstream joins have already
//! resolved patient, payer, pharmacy and prescriber data onto it; the engine
//! only reads it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One prescription line with everything needed to bill it.
///
/// Every field is optional on the wire. Missing strings deserialize as empty,
/// missing amounts as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimRecord {
    /// Opaque identifier of the source row. Only used for references and logs.
    #[serde(alias = "_id")]
    pub record_id: String,

    // Claim grouping
    pub claim_number: String,
    pub subscriber_num: String,

    // Patient
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub date_of_injury: String,
    pub gender: String,
    #[serde(alias = "ssno")]
    pub ssn: String,
    pub patient_address: String,

    // Payer / employer client
    pub client_name: String,
    pub client_id: String,
    pub client_address: String,

    // Dispensing pharmacy (service facility)
    pub pharmacy_npi: String,
    pub pharmacy_name: String,
    pub pharmacy_address: String,

    // Prescriber
    #[serde(alias = "doctor_no")]
    pub prescriber_npi: String,
    #[serde(alias = "doctor_name")]
    pub prescriber_name: String,
    pub prescriber_address: String,

    // Prescription
    pub trans_date: String,
    pub rx_date: String,
    pub rx_no: String,
    pub drug_name: String,
    pub drug: String,
    pub ndc: String,
    pub quantity: Option<Decimal>,
    pub days_supply: Option<u32>,
    pub daw: String,
    pub brand_gen: String,

    // Pricing
    #[serde(alias = "uc")]
    pub u_and_c: Option<Decimal>,
    pub plan_paid: Option<Decimal>,
    pub member_paid: Option<Decimal>,
    pub fee_schedule: Option<Decimal>,
    pub due_amount: Option<Decimal>,
}

/// Amount fields that may appear in a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    FeeSchedule,
    PlanPaid,
    DueAmount,
    MemberPaid,
    UsualAndCustomary,
}

/// Text fields that may appear in a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    ClaimNumber,
    SubscriberNum,
    RecordId,
    DrugName,
    Drug,
    Dob,
    DateOfInjury,
    TransDate,
    RxDate,
}

impl ClaimRecord {
    pub fn amount(&self, field: AmountField) -> Option<Decimal> {
        match field {
            AmountField::FeeSchedule => self.fee_schedule,
            AmountField::PlanPaid => self.plan_paid,
            AmountField::DueAmount => self.due_amount,
            AmountField::MemberPaid => self.member_paid,
            AmountField::UsualAndCustomary => self.u_and_c,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::ClaimNumber => &self.claim_number,
            TextField::SubscriberNum => &self.subscriber_num,
            TextField::RecordId => &self.record_id,
            TextField::DrugName => &self.drug_name,
            TextField::Drug => &self.drug,
            TextField::Dob => &self.dob,
            TextField::DateOfInjury => &self.date_of_injury,
            TextField::TransDate => &self.trans_date,
            TextField::RxDate => &self.rx_date,
        }
    }
}
