//! Structural validation of a rendered 837P interchange.
//!
//! Validation works on the final text, so it checks exactly what would be
//! transmitted. Checks, in the order errors are reported:
//!
//! 1. fixed-width segments (ISA, line-level K3)
//! 2. envelope order and singleton segments
//! 3. element counts per segment identifier
//! 4. control numbers and counts in trailers
//! 5. HL ids, parents and child flags
//! 6. mandatory segments per loop
//! 7. segment totals against the number of claims and lines, when known

use std::collections::{HashMap, HashSet};

use edi837_model::{FormatError, HierarchyLevel, Result};

use crate::envelope::ISA_LEN;
use crate::k3::NCPDP_RECORD_LEN;
use crate::segment::{ELEMENT_SEPARATOR, SEGMENT_TERMINATOR};

/// One segment as found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment<'a> {
    pub position: usize,
    pub id: &'a str,
    /// Segment text without the terminator.
    pub text: &'a str,
    elements: Vec<&'a str>,
}

impl<'a> RawSegment<'a> {
    /// Element by 1-based position, empty when absent.
    pub fn element(&self, position: usize) -> &'a str {
        position
            .checked_sub(1)
            .and_then(|index| self.elements.get(index))
            .copied()
            .unwrap_or_default()
    }

    pub fn element_count(&self) -> usize {
        self.elements
            .iter()
            .rposition(|element| !element.is_empty())
            .map_or(0, |index| index + 1)
    }

    fn is(&self, id: &str, qualifier: Option<&str>) -> bool {
        self.id == id && qualifier.is_none_or(|q| self.element(1) == q)
    }
}

/// Split interchange text into segments, tolerating newlines after terminators.
pub fn split_segments(text: &str) -> Vec<RawSegment<'_>> {
    text.split(SEGMENT_TERMINATOR)
        .map(|segment| segment.trim_start_matches(['\r', '\n']))
        .filter(|segment| !segment.trim().is_empty())
        .enumerate()
        .map(|(position, text)| {
            let mut parts = text.split(ELEMENT_SEPARATOR);
            let id = parts.next().unwrap_or_default();
            RawSegment {
                position,
                id,
                text,
                elements: parts.collect(),
            }
        })
        .collect()
}

/// Number of claims and service lines the document is supposed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedCounts {
    pub claims: usize,
    pub lines: usize,
}

/// Inclusive element count bounds per segment identifier.
const ELEMENT_BOUNDS: &[(&str, usize, usize)] = &[
    ("ISA", 16, 16),
    ("GS", 8, 8),
    ("ST", 2, 3),
    ("BHT", 4, 6),
    ("NM1", 2, 12),
    ("PER", 2, 9),
    ("HL", 3, 4),
    ("PRV", 2, 6),
    ("N3", 1, 2),
    ("N4", 1, 7),
    ("REF", 2, 4),
    ("SBR", 1, 9),
    ("PAT", 1, 9),
    ("DMG", 2, 11),
    ("CLM", 5, 20),
    ("DTP", 3, 3),
    ("K3", 1, 3),
    ("HI", 1, 12),
    ("HCP", 1, 15),
    ("LX", 1, 1),
    ("SV1", 3, 21),
    ("LIN", 3, 31),
    ("CTP", 3, 11),
    ("SE", 2, 2),
    ("GE", 2, 2),
    ("IEA", 2, 2),
];

const HEAD: [&str; 4] = ["ISA", "GS", "ST", "BHT"];
const TAIL: [&str; 3] = ["SE", "GE", "IEA"];
const SINGLETONS: [&str; 7] = ["ISA", "GS", "ST", "BHT", "SE", "GE", "IEA"];

/// Validate and return the first problem found.
pub fn validate(text: &str, expected: Option<ExpectedCounts>) -> Result<()> {
    match validate_all(text, expected).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Validate and return every problem found.
pub fn validate_all(text: &str, expected: Option<ExpectedCounts>) -> Vec<FormatError> {
    let segments = split_segments(text);
    let mut errors = Vec::new();
    check_fixed_lengths(&segments, &mut errors);
    check_envelope(&segments, &mut errors);
    check_element_counts(&segments, &mut errors);
    check_control_numbers(&segments, &mut errors);
    check_hierarchy(&segments, &mut errors);
    check_loops(&segments, &mut errors);
    if let Some(expected) = expected {
        check_totals(&segments, expected, &mut errors);
    }
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "interchange failed validation");
    }
    errors
}

fn check_fixed_lengths(segments: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    let mut in_service_line = false;
    for segment in segments {
        match segment.id {
            "ISA" => {
                let actual = segment.text.chars().count() + 1;
                if actual != ISA_LEN {
                    errors.push(FormatError::SegmentLength {
                        segment: "ISA".to_string(),
                        position: segment.position,
                        expected: ISA_LEN,
                        actual,
                    });
                }
            }
            "LX" => in_service_line = true,
            "CLM" | "HL" | "SE" => in_service_line = false,
            "K3" if in_service_line => {
                let actual = segment.element(1).chars().count();
                if actual != NCPDP_RECORD_LEN {
                    errors.push(FormatError::SegmentLength {
                        segment: "K3".to_string(),
                        position: segment.position,
                        expected: NCPDP_RECORD_LEN,
                        actual,
                    });
                }
            }
            _ => {}
        }
    }
}

fn check_envelope(segments: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    for id in SINGLETONS {
        let actual = segments.iter().filter(|s| s.id == id).count();
        if actual != 1 {
            errors.push(FormatError::SegmentCount {
                segment: id.to_string(),
                expected: 1,
                actual,
            });
        }
    }

    for (position, expected) in HEAD.into_iter().enumerate() {
        match segments.get(position) {
            Some(segment) if segment.id == expected => {}
            Some(segment) => errors.push(FormatError::SegmentOrder {
                segment: segment.id.to_string(),
                position,
                expected: expected.to_string(),
            }),
            None => errors.push(FormatError::MissingSegment {
                loop_id: "envelope".to_string(),
                segment: expected.to_string(),
                position,
            }),
        }
    }

    let tail_start = segments.len().saturating_sub(TAIL.len());
    for (offset, expected) in TAIL.into_iter().enumerate() {
        let position = tail_start + offset;
        match segments.get(position) {
            Some(segment) if segment.id == expected => {}
            Some(segment) => errors.push(FormatError::SegmentOrder {
                segment: segment.id.to_string(),
                position,
                expected: expected.to_string(),
            }),
            None => errors.push(FormatError::MissingSegment {
                loop_id: "envelope".to_string(),
                segment: expected.to_string(),
                position,
            }),
        }
    }
}

fn check_element_counts(segments: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    let bounds: HashMap<&str, (usize, usize)> = ELEMENT_BOUNDS
        .iter()
        .map(|&(id, min, max)| (id, (min, max)))
        .collect();
    for segment in segments {
        let Some(&(min, max)) = bounds.get(segment.id) else {
            errors.push(FormatError::UnknownSegment {
                segment: segment.id.to_string(),
                position: segment.position,
            });
            continue;
        };
        let actual = segment.element_count();
        if actual < min || actual > max {
            errors.push(FormatError::ElementCount {
                segment: segment.id.to_string(),
                position: segment.position,
                min,
                max,
                actual,
            });
        }
    }
}

fn first<'s, 'a>(segments: &'s [RawSegment<'a>], id: &str) -> Option<&'s RawSegment<'a>> {
    segments.iter().find(|s| s.id == id)
}

fn expect_value(
    errors: &mut Vec<FormatError>,
    segment: &RawSegment<'_>,
    element: usize,
    expected: &str,
) {
    let actual = segment.element(element);
    if actual != expected {
        errors.push(FormatError::ElementValue {
            segment: segment.id.to_string(),
            position: segment.position,
            element,
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
}

fn check_control_numbers(segments: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    if let (Some(isa), Some(iea)) = (first(segments, "ISA"), first(segments, "IEA")) {
        expect_value(errors, iea, 1, "1");
        expect_value(errors, iea, 2, isa.element(13));
    }
    if let (Some(gs), Some(ge)) = (first(segments, "GS"), first(segments, "GE")) {
        expect_value(errors, ge, 1, "1");
        expect_value(errors, ge, 2, gs.element(6));
    }
    if let (Some(st), Some(se)) = (first(segments, "ST"), first(segments, "SE")) {
        expect_value(errors, se, 2, st.element(2));
        if se.position >= st.position {
            let count = se.position - st.position + 1;
            expect_value(errors, se, 1, &count.to_string());
        }
    }
}

fn check_hierarchy(segments: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    let mut levels: HashMap<u32, HierarchyLevel> = HashMap::new();
    let mut referenced: HashSet<u32> = HashSet::new();
    let mut seen: Vec<(&RawSegment<'_>, u32)> = Vec::new();

    for (index, hl) in segments.iter().filter(|s| s.id == "HL").enumerate() {
        let hierarchy = |message: String| FormatError::Hierarchy {
            position: hl.position,
            message,
        };
        let expected_id = index + 1;
        let id = match hl.element(1).parse::<u32>() {
            Ok(id) if id as usize == expected_id => id,
            _ => {
                errors.push(hierarchy(format!(
                    "HL01 is '{}', expected {expected_id}",
                    hl.element(1)
                )));
                continue;
            }
        };
        let Some(level) = HierarchyLevel::from_code(hl.element(3)) else {
            errors.push(hierarchy(format!(
                "HL03 level code '{}' is not 20, 22 or 23",
                hl.element(3)
            )));
            continue;
        };
        let parent = hl.element(2);
        match level.parent_level() {
            None if parent.is_empty() => {}
            None => errors.push(hierarchy(format!(
                "HL{id} is a top level but names parent '{parent}'"
            ))),
            Some(parent_level) => match parent.parse::<u32>() {
                Ok(parent_id) if levels.get(&parent_id) == Some(&parent_level) => {
                    referenced.insert(parent_id);
                }
                _ => errors.push(hierarchy(format!(
                    "HL{id} parent '{parent}' is not an earlier level {}",
                    parent_level.code()
                ))),
            },
        }
        levels.insert(id, level);
        seen.push((hl, id));
    }

    for (hl, id) in seen {
        let expected = if referenced.contains(&id) { "1" } else { "0" };
        expect_value(errors, hl, 4, expected);
    }
}

fn has(slice: &[RawSegment<'_>], id: &str, qualifier: Option<&str>) -> bool {
    slice.iter().any(|s| s.is(id, qualifier))
}

fn require(
    errors: &mut Vec<FormatError>,
    slice: &[RawSegment<'_>],
    loop_id: &str,
    id: &str,
    qualifier: Option<&str>,
) {
    if !has(slice, id, qualifier) {
        let segment = match qualifier {
            Some(q) => format!("{id}{ELEMENT_SEPARATOR}{q}"),
            None => id.to_string(),
        };
        errors.push(FormatError::MissingSegment {
            loop_id: loop_id.to_string(),
            segment,
            position: slice.first().map_or(0, |s| s.position),
        });
    }
}

/// Split `slice` into runs that each start with a segment matching `starts`.
fn runs<'s, 'a>(
    slice: &'s [RawSegment<'a>],
    starts: impl Fn(&RawSegment<'a>) -> bool,
) -> Vec<&'s [RawSegment<'a>]> {
    let bounds: Vec<usize> = slice
        .iter()
        .enumerate()
        .filter(|(_, s)| starts(*s))
        .map(|(i, _)| i)
        .collect();
    bounds
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = bounds.get(n + 1).copied().unwrap_or(slice.len());
            &slice[start..end]
        })
        .collect()
}

fn check_loops(segments: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    let body_start = segments
        .iter()
        .position(|s| s.id == "ST")
        .map_or(0, |p| p + 1);
    let body_end = segments
        .iter()
        .position(|s| s.id == "SE")
        .unwrap_or(segments.len())
        .max(body_start);
    let body = &segments[body_start..body_end];

    let header_end = body.iter().position(|s| s.id == "HL").unwrap_or(body.len());
    let header = &body[..header_end];
    require(errors, header, "1000A", "NM1", Some("41"));
    require(errors, header, "1000B", "NM1", Some("40"));

    for level in runs(body, |s| s.id == "HL") {
        match level[0].element(3) {
            "20" => require(errors, level, "2000A", "NM1", Some("85")),
            "22" => {
                require(errors, level, "2000B", "SBR", None);
                require(errors, level, "2000B", "NM1", Some("IL"));
                require(errors, level, "2000B", "NM1", Some("PR"));
            }
            "23" => {
                require(errors, level, "2000C", "PAT", None);
                require(errors, level, "2000C", "NM1", Some("QC"));
                require(errors, level, "2000C", "CLM", None);
                for claim in runs(level, |s| s.id == "CLM") {
                    check_claim(claim, errors);
                }
            }
            _ => {}
        }
    }
}

fn check_claim(claim: &[RawSegment<'_>], errors: &mut Vec<FormatError>) {
    require(errors, claim, "2300", "HI", None);
    require(errors, claim, "2300", "LX", None);
    for line in runs(claim, |s| s.id == "LX") {
        require(errors, line, "2400", "SV1", None);
        match line.iter().find(|s| s.is("DTP", Some("472"))) {
            Some(dtp) => {
                let date = dtp.element(3);
                if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
                    errors.push(FormatError::ElementValue {
                        segment: "DTP".to_string(),
                        position: dtp.position,
                        element: 3,
                        expected: "CCYYMMDD".to_string(),
                        actual: date.to_string(),
                    });
                }
            }
            None => require(errors, line, "2400", "DTP", Some("472")),
        }
    }
}

fn check_totals(
    segments: &[RawSegment<'_>],
    expected: ExpectedCounts,
    errors: &mut Vec<FormatError>,
) {
    let wanted = [
        ("HL", 1 + 2 * expected.claims),
        ("CLM", expected.claims),
        ("HI", expected.claims),
        ("LX", expected.lines),
        ("SV1", expected.lines),
        ("K3", expected.claims + expected.lines),
    ];
    for (id, count) in wanted {
        let actual = segments.iter().filter(|s| s.id == id).count();
        if actual != count {
            errors.push(FormatError::SegmentCount {
                segment: id.to_string(),
                expected: count,
                actual,
            });
        }
    }
}
