//! Validation of hand-assembled interchanges.

use chrono::{NaiveDate, NaiveDateTime};
use edi837_control::ControlNumbers;
use edi837_model::{FormatError, InterchangeConfig};
use edi837_x12::{
    EdiDocument, ExpectedCounts, K3Fields, RenderOptions, Segment, encode_k3, validate,
    validate_all, wrap_transaction,
};

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 9)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .unwrap()
}

fn body() -> Vec<Segment> {
    vec![
        Segment::new("BHT")
            .text("0019")
            .text("00")
            .text("EDI_20250109")
            .text("20250109")
            .text("0830")
            .text("CH"),
        Segment::new("NM1").text("41").text("2").text("SUBMITTER").skip(4).text("46").text("S1"),
        Segment::new("PER").text("IC").text("EDI").text("EM").text("edi@example.com"),
        Segment::new("NM1").text("40").text("2").text("RECEIVER").skip(4).text("46").text("R1"),
        Segment::new("HL").text("1").skip(1).text("20").text("1"),
        Segment::new("NM1").text("85").text("2").text("PROVIDER").skip(4).text("XX").text("1234567893"),
        Segment::new("HL").text("2").text("1").text("22").text("1"),
        Segment::new("SBR").text("P").skip(7).text("WC"),
        Segment::new("NM1").text("IL").text("2").text("EMPLOYER"),
        Segment::new("NM1").text("PR").text("2").text("EMPLOYER").skip(4).text("PI").text("P1"),
        Segment::new("HL").text("3").text("2").text("23").text("0"),
        Segment::new("PAT").text("20"),
        Segment::new("NM1").text("QC").text("1").text("DOE").text("JANE"),
        Segment::new("CLM")
            .text("C1")
            .text("10.00")
            .skip(2)
            .composite(&["01", "B", "1"])
            .text("Y"),
        Segment::new("K3").text("RX"),
        Segment::new("HI").composite(&["ABK", "R52"]),
        Segment::new("LX").text("1"),
        Segment::new("SV1")
            .composite(&["HC", "99070", "", "", "", "", "DRUG"])
            .text("10.00")
            .text("UN")
            .text("30.000"),
        Segment::new("DTP").text("472").text("D8").text("20240501"),
        Segment::new("K3").raw(encode_k3(&K3Fields::default())),
    ]
}

fn render(body: Vec<Segment>, newlines: bool) -> String {
    let numbers = ControlNumbers {
        interchange: 12,
        group: 12,
        transaction: 12,
    };
    let segments = wrap_transaction(body, &InterchangeConfig::default(), &numbers, timestamp());
    EdiDocument::new(segments).render(RenderOptions::default().with_newlines(newlines))
}

const ONE_CLAIM: Option<ExpectedCounts> = Some(ExpectedCounts {
    claims: 1,
    lines: 1,
});

#[test]
fn well_formed_interchange_passes() {
    assert_eq!(validate(&render(body(), false), ONE_CLAIM), Ok(()));
    assert_eq!(validate(&render(body(), true), ONE_CLAIM), Ok(()));
}

#[test]
fn shortened_isa_names_segment_and_length() {
    let text = render(body(), false).replacen("SENDER         ", "SENDER        ", 1);
    let err = validate(&text, ONE_CLAIM).unwrap_err();
    assert_eq!(err.segment(), Some("ISA"));
    let message = err.to_string();
    assert!(message.contains("ISA"), "{message}");
    assert!(message.contains("106"), "{message}");
}

#[test]
fn short_ncpdp_record_is_rejected() {
    let mut segments = body();
    let last = segments.len() - 1;
    segments[last] = Segment::new("K3").raw("00 0");
    let err = validate(&render(segments, false), ONE_CLAIM).unwrap_err();
    assert_eq!(
        err,
        FormatError::SegmentLength {
            segment: "K3".to_string(),
            position: 22,
            expected: 80,
            actual: 4,
        }
    );
}

#[test]
fn tampered_trailer_count_is_rejected() {
    let text = render(body(), false).replace("SE*22*0012", "SE*21*0012");
    let errors = validate_all(&text, ONE_CLAIM);
    assert!(errors.iter().any(|e| matches!(
        e,
        FormatError::ElementValue { segment, element: 1, expected, actual, .. }
            if segment == "SE" && expected == "22" && actual == "21"
    )));
}

#[test]
fn mismatched_control_numbers_are_rejected() {
    let text = render(body(), false).replace("IEA*1*000000012", "IEA*1*000000013");
    let err = validate(&text, ONE_CLAIM).unwrap_err();
    assert!(matches!(
        err,
        FormatError::ElementValue { ref segment, element: 2, .. } if segment == "IEA"
    ));
}

#[test]
fn claim_without_service_line_is_rejected() {
    let segments: Vec<Segment> = body()
        .into_iter()
        .filter(|s| !matches!(s.id(), "LX" | "SV1" | "DTP"))
        .filter(|s| s.element(1) == Some("RX") || s.id() != "K3")
        .collect();
    let errors = validate_all(&render(segments, false), None);
    assert!(errors.iter().any(|e| matches!(
        e,
        FormatError::MissingSegment { loop_id, segment, .. } if loop_id == "2300" && segment == "LX"
    )));
}

#[test]
fn totals_are_checked_against_expectations() {
    let errors = validate_all(
        &render(body(), false),
        Some(ExpectedCounts {
            claims: 1,
            lines: 2,
        }),
    );
    assert!(errors.contains(&FormatError::SegmentCount {
        segment: "LX".to_string(),
        expected: 2,
        actual: 1,
    }));
}
