//! # Editable plain-text documents.
//!
//! The wrap and indentation commands never touch a host editor directly,
//! they work on a line-indexed view of it through the [`Document`] trait.
//! [`TextDocument`] is an in-memory implementation.

use std::fmt;
use std::ops::Range;

use anyhow::{ensure, Context as _, Result};
use format_flowed::quote_prefix;

/// One line of a document: its text without quote markers and its quote level.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: usize,
    pub text: String,
}

impl Line {
    pub fn new(level: usize, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Splits the leading quote markers off a line.
    ///
    /// Each `>` optionally followed by a single space adds one level.
    pub fn parse(line: &str) -> Self {
        let (level, len) = quote_prefix(line);
        let text = line.get(len..).unwrap_or_default();
        Self::new(level, text)
    }

    /// Returns true if the line has no content besides whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of characters in the text, the unit of [`Position::column`].
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", ">".repeat(self.level))
        } else {
            write!(f, "{}{}", "> ".repeat(self.level), self.text)
        }
    }
}

/// A place in a document. `column` counts characters of [`Line::text`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Selected range of a document, `start` never comes after `end`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    /// Creates a selection between two positions in any order.
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// An empty selection, i.e. a cursor.
    pub fn cursor(line: usize, column: usize) -> Self {
        let position = Position::new(line, column);
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Index of the last line the selection touches.
    ///
    /// A selection that ends at column 0 of a later line does not touch that line.
    pub fn last_line(&self) -> usize {
        if self.end.column == 0 && self.end.line > self.start.line {
            self.end.line - 1
        } else {
            self.end.line
        }
    }
}

/// Editable, line-indexed view of a host document.
pub trait Document {
    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Returns the line at `index`, `None` if out of range.
    fn line(&self, index: usize) -> Option<Line>;

    /// Current selection.
    fn selection(&self) -> Selection;

    /// Moves the cursor or changes the selection.
    fn set_selection(&mut self, selection: Selection) -> Result<()>;

    /// Replaces the lines in `range` with `lines`.
    fn replace_lines(&mut self, range: Range<usize>, lines: Vec<Line>) -> Result<()>;

    /// Returns false for rich-text content which must not be edited line-wise.
    fn is_plain_text(&self) -> bool;

    /// Starts a group of edits that are undone together.
    fn begin_undo_group(&mut self) -> Result<()>;

    /// Closes the group opened by the matching [`Document::begin_undo_group`].
    fn end_undo_group(&mut self) -> Result<()>;
}

/// Runs `f` inside one undo group.
///
/// The group is closed even if `f` fails, the error of `f` takes precedence.
pub(crate) fn in_undo_group<D, T>(doc: &mut D, f: impl FnOnce(&mut D) -> Result<T>) -> Result<T>
where
    D: Document + ?Sized,
{
    doc.begin_undo_group()
        .context("failed to begin undo group")?;
    let res = f(doc);
    let end = doc.end_undo_group().context("failed to end undo group");
    let value = res?;
    end?;
    Ok(value)
}

#[derive(Debug, Clone)]
struct Snapshot {
    lines: Vec<Line>,
    selection: Selection,
}

/// In-memory plain-text [`Document`] with a snapshot undo stack.
#[derive(Debug, Clone)]
pub struct TextDocument {
    lines: Vec<Line>,
    selection: Selection,
    plain_text: bool,
    undo_stack: Vec<Snapshot>,
    group_depth: usize,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new(vec![Line::default()])
    }
}

impl TextDocument {
    /// Creates a document with the cursor at its start.
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            selection: Selection::default(),
            plain_text: true,
            undo_stack: Vec::new(),
            group_depth: 0,
        }
    }

    /// Parses newline-separated text, quote markers become line levels.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\n').map(Line::parse).collect())
    }

    /// Marks the document as rich text, the line-wise commands leave it alone.
    pub fn into_rich_text(mut self) -> Self {
        self.plain_text = false;
        self
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Renders the document with quote markers, lines joined by `\n`.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reverts the last undo group or ungrouped edit.
    ///
    /// Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.group_depth > 0 {
            return false;
        }
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.lines = snapshot.lines;
                self.selection = snapshot.selection;
                true
            }
            None => false,
        }
    }

    fn snapshot(&mut self) {
        self.undo_stack.push(Snapshot {
            lines: self.lines.clone(),
            selection: self.selection,
        });
    }

    fn check_position(&self, position: Position) -> Result<()> {
        if self.lines.is_empty() {
            ensure!(
                position == Position::default(),
                "position {position:?} in empty document"
            );
            return Ok(());
        }
        let line = self
            .lines
            .get(position.line)
            .with_context(|| format!("line {} out of range", position.line))?;
        ensure!(
            position.column <= line.char_count(),
            "column {} out of range for line {}",
            position.column,
            position.line
        );
        Ok(())
    }

    fn clamp(&self, position: Position) -> Position {
        let Some(last) = self.lines.len().checked_sub(1) else {
            return Position::default();
        };
        let line = position.line.min(last);
        let column = self
            .lines
            .get(line)
            .map_or(0, |l| position.column.min(l.char_count()));
        Position::new(line, column)
    }
}

impl Document for TextDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<Line> {
        self.lines.get(index).cloned()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) -> Result<()> {
        self.check_position(selection.start)?;
        self.check_position(selection.end)?;
        self.selection = Selection::new(selection.start, selection.end);
        Ok(())
    }

    fn replace_lines(&mut self, range: Range<usize>, lines: Vec<Line>) -> Result<()> {
        ensure!(
            range.start <= range.end && range.end <= self.lines.len(),
            "cannot replace lines {range:?} of {}",
            self.lines.len()
        );
        if self.group_depth == 0 {
            self.snapshot();
        }
        self.lines.splice(range, lines);
        self.selection = Selection::new(
            self.clamp(self.selection.start),
            self.clamp(self.selection.end),
        );
        Ok(())
    }

    fn is_plain_text(&self) -> bool {
        self.plain_text
    }

    fn begin_undo_group(&mut self) -> Result<()> {
        if self.group_depth == 0 {
            self.snapshot();
        }
        self.group_depth += 1;
        Ok(())
    }

    fn end_undo_group(&mut self) -> Result<()> {
        ensure!(self.group_depth > 0, "no undo group to end");
        self.group_depth -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(Line::parse("plain"), Line::new(0, "plain"));
        assert_eq!(Line::parse("> > c"), Line::new(2, "c"));
        assert_eq!(Line::parse(">>c"), Line::new(2, "c"));
        assert_eq!(Line::parse(">  indented"), Line::new(1, " indented"));
        assert_eq!(Line::parse(">"), Line::new(1, ""));
        assert_eq!(Line::parse(""), Line::new(0, ""));
    }

    #[test]
    fn test_render_line() {
        assert_eq!(Line::new(2, "c").to_string(), "> > c");
        assert_eq!(Line::new(2, "").to_string(), ">>");
        assert_eq!(Line::new(0, "  x").to_string(), "  x");
    }

    #[test]
    fn test_blank() {
        assert!(Line::new(0, "").is_blank());
        assert!(Line::new(3, " \t").is_blank());
        assert!(!Line::new(0, "-").is_blank());
    }

    #[test]
    fn test_selection_order_and_last_line() {
        let selection = Selection::new(Position::new(3, 0), Position::new(1, 4));
        assert_eq!(selection.start, Position::new(1, 4));
        assert_eq!(selection.last_line(), 2);

        assert_eq!(Selection::cursor(2, 0).last_line(), 2);
        let selection = Selection::new(Position::new(1, 0), Position::new(3, 1));
        assert_eq!(selection.last_line(), 3);
    }

    #[test]
    fn test_text_round_trip() {
        let text = "Hi,\n\n> > nested\n>\n> quoted\n-- \nMe";
        assert_eq!(TextDocument::from_text(text).to_text(), text);
    }

    #[test]
    fn test_set_selection_checks_bounds() {
        let mut doc = TextDocument::from_text("ab\ncd");
        assert!(doc.set_selection(Selection::cursor(1, 2)).is_ok());
        assert!(doc.set_selection(Selection::cursor(1, 3)).is_err());
        assert!(doc.set_selection(Selection::cursor(2, 0)).is_err());
    }

    #[test]
    fn test_replace_clamps_selection() -> Result<()> {
        let mut doc = TextDocument::from_text("one\ntwo\nthree");
        doc.set_selection(Selection::cursor(2, 5))?;
        doc.replace_lines(1..3, vec![Line::new(0, "x")])?;
        assert_eq!(doc.selection(), Selection::cursor(1, 1));
        assert!(doc.replace_lines(1..3, Vec::new()).is_err());
        Ok(())
    }

    #[test]
    fn test_undo_group() -> Result<()> {
        let mut doc = TextDocument::from_text("a\nb");
        in_undo_group(&mut doc, |doc| {
            doc.replace_lines(0..1, vec![Line::new(0, "A")])?;
            doc.replace_lines(1..2, vec![Line::new(0, "B")])
        })?;
        assert_eq!(doc.to_text(), "A\nB");

        doc.replace_lines(0..2, Vec::new())?;
        assert!(doc.undo());
        assert_eq!(doc.to_text(), "A\nB");
        assert!(doc.undo());
        assert_eq!(doc.to_text(), "a\nb");
        assert!(!doc.undo());
        Ok(())
    }

    #[test]
    fn test_undo_group_closed_on_error() {
        let mut doc = TextDocument::from_text("a");
        let res: Result<()> = in_undo_group(&mut doc, |doc| {
            doc.replace_lines(0..1, vec![Line::new(0, "b")])?;
            doc.replace_lines(5..6, Vec::new())
        });
        assert!(res.is_err());
        assert_eq!(doc.to_text(), "b");
        assert!(doc.end_undo_group().is_err());
        assert!(doc.undo());
        assert_eq!(doc.to_text(), "a");
    }
}
