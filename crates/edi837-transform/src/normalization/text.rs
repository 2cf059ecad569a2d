//! Length clamping for free-text elements.

use edi837_model::Diagnostics;

/// Truncate `value` to at most `max` characters.
///
/// Returns the clamped value and, when truncation happened, the original
/// character count.
pub fn truncate(value: &str, max: usize) -> (String, Option<usize>) {
    let len = value.chars().count();
    if len <= max {
        return (value.to_string(), None);
    }
    (value.chars().take(max).collect(), Some(len))
}

/// Clamps values and records a [`TruncationWarning`](edi837_model::TruncationWarning)
/// for each one that was too long.
#[derive(Debug)]
pub struct Clamp<'a> {
    record_id: Option<&'a str>,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Clamp<'a> {
    pub fn new(record_id: Option<&'a str>, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            record_id,
            diagnostics,
        }
    }

    pub fn apply(&mut self, element: &str, value: &str, max: usize) -> String {
        let trimmed = value.trim();
        let (clamped, original) = truncate(trimmed, max);
        if let Some(original_len) = original {
            tracing::debug!(
                record_id = self.record_id.unwrap_or_default(),
                element,
                max,
                original_len,
                "truncated element"
            );
            self.diagnostics
                .truncated(self.record_id, element, max, original_len);
        }
        clamped
    }
}
