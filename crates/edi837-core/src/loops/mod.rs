//! Segment builders for each 837P loop.
//!
//! Builders take already-normalized values and never fail. Anything that
//! has to be cut or substituted is recorded in [`Diagnostics`](edi837_model::Diagnostics)
//! by the caller-provided clamp.

mod claim;
mod header;
mod service;
mod subscriber;

pub use claim::{claim_loop, patient_loop};
pub use header::{billing_provider_loop, transaction_header};
pub use service::service_line;
pub use subscriber::subscriber_loop;

use edi837_model::PricingConfig;
use edi837_transform::{PostalAddress, format_amount, format_zip};
use edi837_x12::Segment;
use rust_decimal::Decimal;

/// `NM1*qualifier*2*name*****id_qualifier*id`.
fn organization(qualifier: &str, name: &str, id_qualifier: &str, id: &str) -> Segment {
    Segment::new("NM1")
        .text(qualifier)
        .text("2")
        .text(name)
        .skip(4)
        .text(id_qualifier)
        .text(id)
}

/// `N3` and `N4`.
fn address(address: &PostalAddress) -> [Segment; 2] {
    [
        Segment::new("N3").text(&address.street),
        Segment::new("N4")
            .text(&address.city)
            .text(&address.state)
            .text(format_zip(&address.zip)),
    ]
}

/// `HCP*methodology*due*usual*repricer*charge`.
fn pricing(config: &PricingConfig, due: Decimal, usual: Decimal, charge: Decimal) -> Segment {
    Segment::new("HCP")
        .text(&config.methodology)
        .text(format_amount(due))
        .text(format_amount(usual))
        .text(&config.repricer_id)
        .text(format_amount(charge))
}
