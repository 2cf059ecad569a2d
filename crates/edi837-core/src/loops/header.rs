//! BHT, submitter/receiver names (1000A/1000B) and the billing provider (2000A).

use chrono::NaiveDateTime;
use edi837_model::{Diagnostics, EngineConfig, HierarchyNode};
use edi837_transform::{Clamp, PostalAddress, format_phone};
use edi837_x12::Segment;

use super::{address, organization};
use crate::hierarchy::hl_segment;

pub fn transaction_header(
    config: &EngineConfig,
    timestamp: NaiveDateTime,
    diagnostics: &mut Diagnostics,
) -> Vec<Segment> {
    let limits = config.limits;
    let submitter = &config.submitter;
    let receiver = &config.receiver;
    let date = timestamp.format("%Y%m%d").to_string();
    let mut clamp = Clamp::new(None, diagnostics);

    let reference = format!("{}_{date}", config.claim.reference_prefix);
    vec![
        Segment::new("BHT")
            .text("0019")
            .text("00")
            .text(clamp.apply("BHT03", &reference, limits.reference))
            .text(&date)
            .text(timestamp.format("%H%M").to_string())
            .text("CH"),
        organization(
            "41",
            &clamp.apply("NM103", &submitter.name, limits.organization_name),
            "46",
            &clamp.apply("NM109", &submitter.id, limits.identifier),
        ),
        Segment::new("PER")
            .text("IC")
            .text(clamp.apply("PER02", &submitter.contact_name, limits.contact_name))
            .text("EM")
            .text(clamp.apply("PER04", &submitter.contact_email, limits.identifier)),
        organization(
            "40",
            &clamp.apply("NM103", &receiver.name, limits.organization_name),
            "46",
            &clamp.apply("NM109", &receiver.id, limits.identifier),
        ),
    ]
}

pub fn billing_provider_loop(
    config: &EngineConfig,
    node: &HierarchyNode,
    diagnostics: &mut Diagnostics,
) -> Vec<Segment> {
    let limits = config.limits;
    let provider = &config.billing_provider;
    let mut clamp = Clamp::new(None, diagnostics);

    let location = PostalAddress {
        street: clamp.apply("N301", &provider.address, limits.street),
        city: clamp.apply("N401", &provider.city, limits.city),
        state: clamp.apply("N402", &provider.state, limits.state),
        zip: provider.zip.clone(),
    };

    let mut segments = vec![
        hl_segment(node),
        Segment::new("PRV")
            .text("BI")
            .text("PXC")
            .text(&provider.taxonomy),
        organization(
            "85",
            &clamp.apply("NM103", &provider.name, limits.organization_name),
            "XX",
            &provider.npi,
        ),
    ];
    segments.extend(address(&location));
    segments.push(Segment::new("REF").text("EI").text(&provider.tax_id));

    let contact = Segment::new("PER")
        .text("IC")
        .text(clamp.apply("PER02", &provider.contact_name, limits.contact_name));
    let phone = format_phone(&provider.phone);
    segments.push(if phone.is_empty() {
        contact
    } else {
        contact.text("TE").text(phone)
    });
    segments
}
