//! # Hard wrapping of paragraphs in a document.

use anyhow::{Context as _, Result};
use format_flowed::{expand_tabs, SIGNATURE_DELIMITER};

use crate::config::Config;
use crate::context::Context;
use crate::document::{in_undo_group, Document, Line, Position, Selection};
use crate::events::EventType;
use crate::paragraph::{Block, Located, ParagraphLocator};
use crate::reflow::reflow_paragraph;

/// Outcome of [`wrap_paragraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapped {
    /// The paragraph at the cursor was refilled.
    Reflowed,
    /// Nothing was refilled, the cursor moved to the next paragraph.
    Skipped,
    /// Nothing was refilled, the cursor moved to the end of the document.
    ReachedEnd,
}

fn end_of_document<D: Document + ?Sized>(doc: &D) -> Position {
    match doc.line_count().checked_sub(1) {
        Some(last) => Position::new(last, doc.line(last).map_or(0, |line| line.char_count())),
        None => Position::default(),
    }
}

fn move_to<D: Document + ?Sized>(doc: &mut D, position: Position) -> Result<()> {
    doc.set_selection(Selection::cursor(position.line, position.column))
        .with_context(|| format!("failed to move cursor to {position:?}"))
}

/// Moves the cursor past `block` without changing it.
fn skip_block<D: Document + ?Sized>(doc: &mut D, block: &Block) -> Result<Wrapped> {
    if block.blank_end < doc.line_count() {
        move_to(doc, Position::new(block.blank_end, 0))?;
        Ok(Wrapped::Skipped)
    } else {
        move_to(doc, end_of_document(doc))?;
        Ok(Wrapped::ReachedEnd)
    }
}

/// Refills the paragraph at the cursor and moves the cursor to the next one.
///
/// The paragraph and the blank lines after it are replaced by the refilled
/// lines and a single blank line. The blank line gets the lesser quote level
/// of this paragraph and the next one.
///
/// On a blank line the cursor only moves to the start of the next paragraph,
/// or to the end of the document if there is none. A paragraph holding the
/// signature delimiter is left alone.
pub fn wrap_paragraph<D: Document + ?Sized>(context: &Context, doc: &mut D) -> Result<Wrapped> {
    let cursor = doc.selection().start.line;
    let located = ParagraphLocator::new(&*doc).locate(cursor);
    let block = match located {
        Located::Blank { next: Some(next) } => {
            move_to(doc, Position::new(next, 0))?;
            return Ok(Wrapped::Skipped);
        }
        Located::Blank { next: None } => {
            move_to(doc, end_of_document(doc))?;
            return Ok(Wrapped::ReachedEnd);
        }
        Located::Block(block) => block,
    };

    let content: Vec<Line> = block.content().filter_map(|i| doc.line(i)).collect();
    if content.iter().any(|line| line.text == SIGNATURE_DELIMITER) {
        info!(context, "Not wrapping signature block at line {}.", block.start);
        return skip_block(doc, &block);
    }

    let text = content
        .iter()
        .map(|line| expand_tabs(&line.text))
        .collect::<Vec<_>>()
        .join("\n");
    let width = context.wrap_width()?;
    let bullets = context.get_config_bool(Config::BulletLists)?;
    let reflowed = reflow_paragraph(&text, block.level, width, bullets);

    let mut lines: Vec<Line> = reflowed
        .split('\n')
        .map(|text| Line::new(block.level, text))
        .collect();
    let count = lines.len();
    lines.push(Line::new(block.minimum, ""));

    doc.replace_lines(block.replace_range(), lines)
        .with_context(|| format!("failed to replace lines {:?}", block.replace_range()))?;
    context.emit_event(EventType::ParagraphWrapped {
        start: block.start,
        lines: count,
        level: block.level,
    });

    let next = block.start + count + 1;
    if next < doc.line_count() {
        move_to(doc, Position::new(next, 0))?;
    } else {
        move_to(doc, Position::new(block.start + count, 0))?;
    }
    Ok(Wrapped::Reflowed)
}

/// Refills the paragraph at the cursor, or every paragraph the selection touches.
///
/// All edits form one undo group. Returns the number of refilled paragraphs.
/// Rich-text documents are left alone.
pub fn wrap_once<D: Document + ?Sized>(context: &Context, doc: &mut D) -> Result<usize> {
    if !doc.is_plain_text() {
        return Ok(0);
    }
    let count = in_undo_group(doc, |doc| wrap_selection(context, doc))?;
    info!(context, "Wrapped {} paragraph(s).", count);
    Ok(count)
}

fn wrap_selection<D: Document + ?Sized>(context: &Context, doc: &mut D) -> Result<usize> {
    let selection = doc.selection();
    if selection.is_collapsed() {
        let wrapped = wrap_paragraph(context, doc)?;
        return Ok(usize::from(wrapped == Wrapped::Reflowed));
    }

    // Lines after the selection, the count stays valid while paragraphs above change size.
    let tail = doc
        .line_count()
        .saturating_sub(selection.last_line().saturating_add(1));
    move_to(doc, Position::new(selection.start.line, 0))?;

    let mut count = 0;
    while doc.selection().start.line + tail < doc.line_count() {
        match wrap_paragraph(context, doc)? {
            Wrapped::Reflowed => count += 1,
            Wrapped::Skipped => {}
            Wrapped::ReachedEnd => break,
        }
    }
    Ok(count)
}
