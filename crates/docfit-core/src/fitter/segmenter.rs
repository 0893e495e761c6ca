//! Document segmentation for the sectioned split.
//!
//! Splits a document into contiguous runs of whole lines, each at most
//! `section_chars` long. Concatenating the sections in order reproduces the
//! document exactly.

use crate::fitter::text::{char_len, chunk_chars};

/// A contiguous run of lines from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Position in document order
    pub index: usize,
    pub text: &'a str,
    /// Length of `text` in chars
    pub chars: usize,
}

/// Partitions documents into sections by linear scan.
///
/// # Algorithm
///
/// 1. Walk the document line by line (line endings kept)
/// 2. Close the current section when the next line would push it past `section_chars`
/// 3. Hard-split any single line longer than `section_chars` on char boundaries
#[derive(Debug, Clone, Copy)]
pub struct DocumentSegmenter {
    section_chars: usize,
}

impl DocumentSegmenter {
    pub fn new(section_chars: usize) -> Self {
        Self {
            section_chars: section_chars.max(1),
        }
    }

    /// Segment `document`; returns sections in document order.
    pub fn segment<'a>(&self, document: &'a str) -> Vec<Section<'a>> {
        let mut builder = SectionBuilder::new(document);

        for line in document.split_inclusive('\n') {
            let line_chars = char_len(line);
            let pieces = if line_chars > self.section_chars {
                chunk_chars(line, self.section_chars)
            } else {
                vec![line]
            };

            for piece in pieces {
                let piece_chars = char_len(piece);
                if builder.current_chars + piece_chars > self.section_chars {
                    builder.close();
                }
                builder.current_chars += piece_chars;
                builder.end += piece.len();
            }
        }

        builder.close();
        builder.sections
    }
}

impl Default for DocumentSegmenter {
    fn default() -> Self {
        Self::new(40_000)
    }
}

/// Tracks the open section as byte offsets into the document.
struct SectionBuilder<'a> {
    document: &'a str,
    sections: Vec<Section<'a>>,
    start: usize,
    end: usize,
    current_chars: usize,
}

impl<'a> SectionBuilder<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            document,
            sections: Vec::new(),
            start: 0,
            end: 0,
            current_chars: 0,
        }
    }

    fn close(&mut self) {
        if self.end > self.start {
            self.sections.push(Section {
                index: self.sections.len(),
                text: &self.document[self.start..self.end],
                chars: self.current_chars,
            });
        }
        self.start = self.end;
        self.current_chars = 0;
    }
}
