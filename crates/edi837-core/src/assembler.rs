//! Transaction body assembly: everything between ST and SE.

use chrono::NaiveDateTime;
use edi837_model::{Diagnostics, EngineConfig};
use edi837_x12::{ExpectedCounts, Segment};

use crate::grouping::ClaimGroup;
use crate::hierarchy::HierarchyAllocator;
use crate::loops::{
    billing_provider_loop, claim_loop, patient_loop, service_line, subscriber_loop,
    transaction_header,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledBody {
    pub segments: Vec<Segment>,
    pub claim_count: usize,
    pub line_count: usize,
}

impl AssembledBody {
    /// Totals the rendered document must match.
    pub fn expected_counts(&self) -> ExpectedCounts {
        ExpectedCounts {
            claims: self.claim_count,
            lines: self.line_count,
        }
    }
}

/// Build the body for `groups` in loop order.
///
/// One billing provider HL is shared by every claim. Each group gets a
/// subscriber HL, a patient HL, one claim and one service line per member.
pub fn assemble_body(
    groups: &[ClaimGroup],
    config: &EngineConfig,
    timestamp: NaiveDateTime,
    diagnostics: &mut Diagnostics,
) -> AssembledBody {
    let mut segments = transaction_header(config, timestamp, diagnostics);
    let mut hierarchy = HierarchyAllocator::new();
    let provider = hierarchy.billing_provider(!groups.is_empty());
    segments.extend(billing_provider_loop(config, &provider, diagnostics));

    let mut line_count = 0;
    for group in groups {
        let subscriber = hierarchy.subscriber(&provider);
        segments.extend(subscriber_loop(config, &subscriber, group));
        let patient = hierarchy.patient(&subscriber);
        segments.extend(patient_loop(config, &patient, group));
        segments.extend(claim_loop(config, group));
        for (index, member) in group.members.iter().enumerate() {
            segments.extend(service_line(config, index + 1, member, diagnostics));
        }
        line_count += group.members.len();
    }

    tracing::debug!(
        segments = segments.len(),
        hl = hierarchy.allocated(),
        "assembled transaction body"
    );
    AssembledBody {
        segments,
        claim_count: groups.len(),
        line_count,
    }
}
