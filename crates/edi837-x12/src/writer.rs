//! Rendering segments to interchange text.

use std::io::{self, Write};

use crate::segment::{SEGMENT_TERMINATOR, Segment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit `\n` after every terminator.
    pub newline_after_segment: bool,
}

impl RenderOptions {
    pub fn with_newlines(mut self, enabled: bool) -> Self {
        self.newline_after_segment = enabled;
        self
    }
}

/// A complete interchange as an ordered segment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdiDocument {
    segments: Vec<Segment>,
}

impl EdiDocument {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn count(&self, id: &str) -> usize {
        self.segments.iter().filter(|s| s.id() == id).count()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, options: RenderOptions) -> io::Result<()> {
        for segment in &self.segments {
            write!(writer, "{segment}{SEGMENT_TERMINATOR}")?;
            if options.newline_after_segment {
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    pub fn render(&self, options: RenderOptions) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.to_string());
            out.push(SEGMENT_TERMINATOR);
            if options.newline_after_segment {
                out.push('\n');
            }
        }
        out
    }
}
