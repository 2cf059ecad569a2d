//! Service lines (2400) and the referring prescriber.

use edi837_model::{Diagnostics, EngineConfig};
use edi837_transform::{
    NormalizedFields, ParsedAddress, PostalAddress, format_amount, format_quantity,
};
use edi837_x12::{COMPONENT_SEPARATOR, K3Fields, Segment, encode_k3_checked};
use rust_decimal::Decimal;

use super::{address, pricing};

/// SV101 components before the description.
const PROCEDURE_COMPONENTS: usize = 6;

/// One `LX` block. `line_number` is 1-based within the claim.
pub fn service_line(
    config: &EngineConfig,
    line_number: usize,
    fields: &NormalizedFields,
    diagnostics: &mut Diagnostics,
) -> Vec<Segment> {
    let claim = &config.claim;
    let service = &fields.service;
    let record_id = fields.record_id.as_str();

    let mut procedure: Vec<&str> = claim.procedure.split(COMPONENT_SEPARATOR).collect();
    procedure.resize(PROCEDURE_COMPONENTS, "");
    procedure.push(&service.description);

    let mut segments = vec![
        Segment::new("LX").text(line_number.to_string()),
        Segment::new("SV1")
            .composite(&procedure)
            .text(format_amount(fields.pricing.charge))
            .text(&claim.unit)
            .text(format_quantity(service.quantity))
            .text(&claim.place_of_service)
            .skip(1)
            .text("1"),
        Segment::new("DTP")
            .text("472")
            .text("D8")
            .text(&service.service_date),
    ];
    if !service.rx_number.is_empty() {
        segments.push(Segment::new("REF").text("6R").text(&service.rx_number));
    }

    let ncpdp = encode_k3_checked(&K3Fields {
        daw: service.daw,
        written_date: service.written_date,
        days_supply: service.days_supply,
        brand: service.brand,
    });
    for overflow in &ncpdp.overflows {
        tracing::warn!(record_id, field = overflow.field, "NCPDP field overflow");
        diagnostics.warn(
            "K3_OVERFLOW",
            format!(
                "{} '{}' does not fit in {} characters",
                overflow.field, overflow.value, overflow.width
            ),
            Some(record_id),
        );
    }
    segments.push(ncpdp.segment());

    if config.pricing.line_level_hcp {
        let pricing_fields = fields.pricing;
        segments.push(pricing(
            &config.pricing,
            pricing_fields.due,
            pricing_fields.usual_and_customary,
            pricing_fields.charge,
        ));
    }

    if service.ndc.is_empty() {
        diagnostics.warn("NDC_MISSING", "service line has no NDC, LIN omitted", Some(record_id));
    } else {
        segments.push(Segment::new("LIN").skip(1).text("N4").text(&service.ndc));
    }

    let days_supply = Decimal::from(service.days_supply.unwrap_or(0));
    segments.push(
        Segment::new("CTP")
            .skip(3)
            .text(format_quantity(days_supply))
            .text("ME"),
    );

    if let Some(prescriber) = &fields.prescriber {
        let mut name = Segment::new("NM1")
            .text("DK")
            .text("1")
            .text(&prescriber.last_name)
            .text(&prescriber.first_name);
        // NM108 and NM109 travel together.
        if !prescriber.npi.trim().is_empty() {
            name = name.skip(3).text("XX").text(&prescriber.npi);
        }
        segments.push(name);

        let location = match &prescriber.address {
            Some(location) => location.clone(),
            None => {
                diagnostics.info(
                    "PRESCRIBER_ADDRESS_DEFAULTED",
                    "prescriber address taken from configured defaults",
                    Some(record_id),
                );
                PostalAddress::from_parsed(ParsedAddress::default(), &config.addresses.prescriber)
            }
        };
        segments.extend(address(&location));
    }
    segments
}
