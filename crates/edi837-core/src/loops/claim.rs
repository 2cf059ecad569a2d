//! Patient (2000C) and claim (2300) blocks.

use edi837_model::{EngineConfig, HierarchyNode};
use edi837_transform::format_amount;
use edi837_x12::{COMPONENT_SEPARATOR, Segment};

use super::{address, organization, pricing};
use crate::grouping::ClaimGroup;
use crate::hierarchy::hl_segment;

pub fn patient_loop(config: &EngineConfig, node: &HierarchyNode, group: &ClaimGroup) -> Vec<Segment> {
    let primary = group.primary();
    let patient = &primary.patient;

    let mut segments = vec![
        hl_segment(node),
        Segment::new("PAT").text("20"),
        Segment::new("NM1")
            .text("QC")
            .text("1")
            .text(&patient.last_name)
            .text(&patient.first_name),
    ];
    segments.extend(address(&patient.address));
    if !patient.birth_date.is_empty() {
        segments.push(
            Segment::new("DMG")
                .text("D8")
                .text(&patient.birth_date)
                .text(&patient.gender),
        );
    }
    segments.push(Segment::new("REF").text("Y4").text(&primary.claim_id));
    segments.push(
        Segment::new("REF")
            .text("SY")
            .text(&config.claim.ssn_placeholder),
    );
    segments
}

/// `CLM` through the service facility. The claim total and claim-level
/// pricing are sums over every service line.
pub fn claim_loop(config: &EngineConfig, group: &ClaimGroup) -> Vec<Segment> {
    let primary = group.primary();
    let claim = &config.claim;

    let mut segments = vec![
        Segment::new("CLM")
            .text(&primary.claim_id)
            .text(format_amount(group.total_charge()))
            .skip(2)
            .composite(&[claim.facility_code.as_str(), "B", "1"])
            .text("Y")
            .text("A")
            .text("Y")
            .text("Y")
            .skip(1)
            .text("EM"),
    ];
    if !primary.patient.injury_date.is_empty() {
        segments.push(
            Segment::new("DTP")
                .text("439")
                .text("D8")
                .text(&primary.patient.injury_date),
        );
    }
    segments.push(Segment::new("REF").text("D9").text(&primary.claim_reference));
    segments.push(Segment::new("K3").text(&claim.claim_k3));

    let diagnosis: Vec<&str> = claim.diagnosis.split(COMPONENT_SEPARATOR).collect();
    segments.push(Segment::new("HI").composite(&diagnosis));

    if config.pricing.claim_level_hcp {
        segments.push(pricing(
            &config.pricing,
            group.total_due(),
            group.total_usual_and_customary(),
            group.total_charge(),
        ));
    }

    let facility = &primary.facility;
    segments.push(organization("77", &facility.name, "XX", &facility.npi));
    segments.extend(address(&facility.address));
    segments
}
