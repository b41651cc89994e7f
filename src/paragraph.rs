//! # Paragraph blocks.
//!
//! A paragraph block is a maximal run of non-blank lines at one quote
//! level. Blocks are found on the current document content every time,
//! nothing is cached between commands.

use std::ops::Range;

use crate::document::{Document, Line};

/// One paragraph block and the blank lines following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// First line of the paragraph.
    pub start: usize,
    /// Line after the last paragraph line.
    pub end: usize,
    /// Line after the blank run following the paragraph.
    pub blank_end: usize,
    /// Quote level of the paragraph.
    pub level: usize,
    /// Lesser of `level` and the level of the next non-blank line,
    /// 0 if the document ends first.
    pub minimum: usize,
}

impl Block {
    /// Lines holding the paragraph text.
    pub fn content(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Paragraph lines plus the trailing blank run.
    pub fn replace_range(&self) -> Range<usize> {
        self.start..self.blank_end
    }
}

/// Result of [`ParagraphLocator::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    /// The line is blank. `next` is the next non-blank line, `None` at the end of the document.
    Blank { next: Option<usize> },

    /// The line belongs to a paragraph.
    Block(Block),
}

/// Finds paragraph blocks in a document.
#[derive(Debug)]
pub struct ParagraphLocator<'a, D: ?Sized> {
    doc: &'a D,
    /// Document end, blocks never extend beyond it.
    boundary: usize,
}

impl<'a, D: Document + ?Sized> ParagraphLocator<'a, D> {
    pub fn new(doc: &'a D) -> Self {
        Self {
            doc,
            boundary: doc.line_count(),
        }
    }

    fn content_line(&self, index: usize) -> Option<Line> {
        if index >= self.boundary {
            return None;
        }
        self.doc.line(index).filter(|line| !line.is_blank())
    }

    fn level_at(&self, index: usize) -> Option<usize> {
        self.content_line(index).map(|line| line.level)
    }

    /// Locates the paragraph block containing line `index`.
    pub fn locate(&self, index: usize) -> Located {
        let Some(level) = self.level_at(index) else {
            let next = (index.saturating_add(1)..self.boundary)
                .find(|&i| self.content_line(i).is_some());
            return Located::Blank { next };
        };

        let mut start = index;
        while start > 0 && self.level_at(start - 1) == Some(level) {
            start -= 1;
        }

        let mut end = start + 1;
        while self.level_at(end) == Some(level) {
            end += 1;
        }

        let mut blank_end = end;
        while blank_end < self.boundary && self.content_line(blank_end).is_none() {
            blank_end += 1;
        }

        let minimum = self
            .level_at(blank_end)
            .map_or(0, |next_level| next_level.min(level));

        Located::Block(Block {
            start,
            end,
            blank_end,
            level,
            minimum,
        })
    }
}
