//! Subscriber and payer (2000B).

use edi837_model::{EngineConfig, HierarchyNode};
use edi837_x12::Segment;

use super::{address, organization};
use crate::grouping::ClaimGroup;
use crate::hierarchy::hl_segment;

/// The client is both the subscriber and the payer. A record without a
/// client id falls back to the configured receiver id.
pub fn subscriber_loop(
    config: &EngineConfig,
    node: &HierarchyNode,
    group: &ClaimGroup,
) -> Vec<Segment> {
    let payer = &group.primary().payer;
    let payer_id = if payer.id.is_empty() {
        config.receiver.id.as_str()
    } else {
        payer.id.as_str()
    };

    let mut segments = vec![
        hl_segment(node),
        Segment::new("SBR")
            .text("P")
            .skip(7)
            .text(&config.claim.filing_indicator),
        Segment::new("NM1").text("IL").text("2").text(&payer.name),
        organization("PR", &payer.name, "PI", payer_id),
    ];
    segments.extend(address(&payer.address));
    segments
}
