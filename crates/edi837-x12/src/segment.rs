//! Segment model and delimiter handling.

use std::fmt;

/// Separates elements within a segment.
pub const ELEMENT_SEPARATOR: char = '*';
/// Ends a segment.
pub const SEGMENT_TERMINATOR: char = '~';
/// Separates components within a composite element.
pub const COMPONENT_SEPARATOR: char = ':';
/// Separates repeated elements.
pub const REPETITION_SEPARATOR: char = '^';

const DELIMITERS: [char; 4] = [
    ELEMENT_SEPARATOR,
    SEGMENT_TERMINATOR,
    COMPONENT_SEPARATOR,
    REPETITION_SEPARATOR,
];

/// Replace delimiter and control characters in data with spaces and trim.
///
/// # Examples
///
/// ```
/// use edi837_x12::sanitize;
///
/// assert_eq!(sanitize(" ACME*CORP~ "), "ACME CORP");
/// ```
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if DELIMITERS.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// One X12 segment: an identifier and its ordered elements.
///
/// Builder methods append elements. Data values go through [`sanitize`];
/// [`Segment::raw`] skips it for values that are already fixed-width or
/// contain intentional delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    id: String,
    elements: Vec<String>,
}

impl Segment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
        }
    }

    /// Append a data element.
    pub fn text(mut self, value: impl AsRef<str>) -> Self {
        self.elements.push(sanitize(value.as_ref()));
        self
    }

    /// Append a composite element; trailing empty components are dropped.
    pub fn composite(mut self, parts: &[&str]) -> Self {
        let mut parts: Vec<String> = parts.iter().map(|part| sanitize(part)).collect();
        while parts.last().is_some_and(String::is_empty) {
            parts.pop();
        }
        let separator = COMPONENT_SEPARATOR.to_string();
        self.elements.push(parts.join(separator.as_str()));
        self
    }

    /// Append an element verbatim.
    pub fn raw(mut self, value: impl Into<String>) -> Self {
        self.elements.push(value.into());
        self
    }

    /// Append `count` empty elements.
    pub fn skip(mut self, count: usize) -> Self {
        self.elements
            .extend(std::iter::repeat_n(String::new(), count));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Element by its 1-based X12 position.
    pub fn element(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.elements.get(index))
            .map(String::as_str)
    }

    /// Number of elements once trailing empties are dropped.
    pub fn element_count(&self) -> usize {
        self.elements
            .iter()
            .rposition(|element| !element.is_empty())
            .map_or(0, |index| index + 1)
    }
}

impl fmt::Display for Segment {
    /// Renders without the terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)?;
        for element in &self.elements[..self.element_count()] {
            write!(f, "{ELEMENT_SEPARATOR}{element}")?;
        }
        Ok(())
    }
}
