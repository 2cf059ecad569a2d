//! Partitioning normalized records into claims.

use std::collections::HashMap;

use edi837_model::{Diagnostics, MissingIdentityError};
use edi837_transform::NormalizedFields;
use rust_decimal::Decimal;

/// Records that share a grouping key. One claim, one service line per member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimGroup {
    pub key: String,
    /// Input order is preserved. Never empty.
    pub members: Vec<NormalizedFields>,
}

impl ClaimGroup {
    /// The first record seen for this key. Claim-level values come from it.
    pub fn primary(&self) -> &NormalizedFields {
        &self.members[0]
    }

    pub fn total_charge(&self) -> Decimal {
        self.members.iter().map(|m| m.pricing.charge).sum()
    }

    pub fn total_due(&self) -> Decimal {
        self.members.iter().map(|m| m.pricing.due).sum()
    }

    pub fn total_usual_and_customary(&self) -> Decimal {
        self.members
            .iter()
            .map(|m| m.pricing.usual_and_customary)
            .sum()
    }
}

/// Result of partitioning a batch.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub groups: Vec<ClaimGroup>,
    pub rejected: Vec<MissingIdentityError>,
}

/// Group records by key in first-seen order.
///
/// `records` pairs each normalized record with its index in the input batch.
/// Records without a key are rejected. A member whose patient differs from
/// the group's first record is kept but reported.
pub fn group_claims(
    records: impl IntoIterator<Item = (usize, NormalizedFields)>,
    diagnostics: &mut Diagnostics,
) -> Grouping {
    let mut grouping = Grouping::default();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for (index, fields) in records {
        let Some(key) = fields.grouping_key.clone() else {
            tracing::warn!(record_id = %fields.record_id, index, "record has no grouping key");
            grouping.rejected.push(MissingIdentityError {
                record_id: fields.record_id,
                index,
            });
            continue;
        };

        match slots.get(&key) {
            Some(&slot) => {
                let group = &mut grouping.groups[slot];
                if !group.primary().patient.same_identity(&fields.patient) {
                    tracing::warn!(record_id = %fields.record_id, "patient differs within claim");
                    diagnostics.warn(
                        "GROUP_IDENTITY",
                        format!(
                            "patient differs from record '{}' in the same claim",
                            group.primary().record_id
                        ),
                        Some(fields.record_id.as_str()),
                    );
                }
                group.members.push(fields);
            }
            None => {
                slots.insert(key.clone(), grouping.groups.len());
                grouping.groups.push(ClaimGroup {
                    key,
                    members: vec![fields],
                });
            }
        }
    }

    tracing::debug!(
        claims = grouping.groups.len(),
        rejected = grouping.rejected.len(),
        "grouped records"
    );
    grouping
}
