//! # Block indentation commands.

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::document::{in_undo_group, Document, Line, Position, Selection};

const NO_BREAK_SPACE: char = '\u{a0}';

/// Indents the cursor line, or every non-empty selected line, by `indent_width` spaces.
///
/// Returns false without touching rich-text documents.
pub fn increase_indentation<D: Document + ?Sized>(context: &Context, doc: &mut D) -> Result<bool> {
    if !doc.is_plain_text() {
        return Ok(false);
    }
    let width = context.indent_width()?;
    let collapsed = doc.selection().is_collapsed();
    let changed = in_undo_group(doc, |doc| {
        reindent(doc, |text| {
            (collapsed || !text.is_empty()).then(|| format!("{}{text}", " ".repeat(width)))
        })
    })?;
    info!(context, "Indented {} line(s) by {}.", changed, width);
    Ok(true)
}

/// Removes `indent_width` leading spaces from the cursor line, or from every selected line.
///
/// Lines that are not indented that far stay as they are, no-break spaces
/// count as spaces. Returns false without touching rich-text documents.
pub fn decrease_indentation<D: Document + ?Sized>(context: &Context, doc: &mut D) -> Result<bool> {
    if !doc.is_plain_text() {
        return Ok(false);
    }
    let width = context.indent_width()?;
    let changed = in_undo_group(doc, |doc| {
        reindent(doc, |text| {
            let mut chars = text.chars();
            let indented = chars
                .by_ref()
                .take(width)
                .filter(|&c| c == ' ' || c == NO_BREAK_SPACE)
                .count()
                == width;
            indented.then(|| chars.collect())
        })
    })?;
    info!(context, "Outdented {} line(s) by {}.", changed, width);
    Ok(true)
}

/// Rewrites the text of every selected line with `edit`, `None` leaves a line alone.
///
/// The selection stays on the same text. Returns the number of changed lines.
fn reindent<D, F>(doc: &mut D, edit: F) -> Result<usize>
where
    D: Document + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    let selection = doc.selection();
    let (mut start, mut end) = (selection.start, selection.end);
    let mut changed = 0;

    for index in selection.start.line..=selection.last_line() {
        let Some(line) = doc.line(index) else {
            break;
        };
        let Some(text) = edit(&line.text) else {
            continue;
        };
        let shift = |position: &mut Position| {
            if position.line == index {
                let column = position.column as isize + text.chars().count() as isize
                    - line.char_count() as isize;
                position.column = column.max(0) as usize;
            }
        };
        shift(&mut start);
        if !selection.is_collapsed() {
            shift(&mut end);
        }
        doc.replace_lines(index..index + 1, vec![Line::new(line.level, text)])
            .with_context(|| format!("failed to reindent line {index}"))?;
        changed += 1;
    }

    if selection.is_collapsed() {
        end = start;
    }
    doc.set_selection(Selection::new(start, end))?;
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;
    use crate::test_utils::{rendered_lines, text_document, TestContext};

    #[test]
    fn test_increase_at_cursor() -> Result<()> {
        let t = TestContext::new();
        let mut doc = text_document(&["first", "second"]);
        doc.set_selection(Selection::cursor(1, 3))?;
        assert!(increase_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["first", "  second"]);
        assert_eq!(doc.selection(), Selection::cursor(1, 5));

        let mut doc = text_document(&[""]);
        assert!(increase_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["  "]);
        assert_eq!(doc.selection(), Selection::cursor(0, 2));
        Ok(())
    }

    #[test]
    fn test_increase_selection_skips_empty_lines() -> Result<()> {
        let t = TestContext::with_config(&[(Config::IndentWidth, "4")]);
        let mut doc = text_document(&["a", "", "> b", "c", "d"]);
        doc.set_selection(Selection::new(Position::new(0, 1), Position::new(3, 0)))?;
        assert!(increase_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["    a", "", ">     b", "c", "d"]);
        assert_eq!(
            doc.selection(),
            Selection::new(Position::new(0, 5), Position::new(3, 0))
        );

        assert!(doc.undo());
        assert_eq!(rendered_lines(&doc), ["a", "", "> b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn test_decrease_at_cursor() -> Result<()> {
        let t = TestContext::new();
        let mut doc = text_document(&["\u{a0} item", " one"]);
        doc.set_selection(Selection::cursor(0, 1))?;
        assert!(decrease_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["item", " one"]);
        assert_eq!(doc.selection(), Selection::cursor(0, 0));

        doc.set_selection(Selection::cursor(1, 2))?;
        assert!(decrease_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["item", " one"]);
        assert_eq!(doc.selection(), Selection::cursor(1, 2));
        Ok(())
    }

    #[test]
    fn test_decrease_selection() -> Result<()> {
        let t = TestContext::new();
        let mut doc = text_document(&["    a", " b", "  c"]);
        doc.set_selection(Selection::new(Position::new(0, 4), Position::new(2, 3)))?;
        assert!(decrease_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["  a", " b", "c"]);
        assert_eq!(
            doc.selection(),
            Selection::new(Position::new(0, 2), Position::new(2, 1))
        );
        Ok(())
    }

    #[test]
    fn test_rich_text_untouched() -> Result<()> {
        let t = TestContext::new();
        let mut doc = text_document(&["  a"]).into_rich_text();
        assert!(!increase_indentation(&t, &mut doc)?);
        assert!(!decrease_indentation(&t, &mut doc)?);
        assert_eq!(rendered_lines(&doc), ["  a"]);
        Ok(())
    }
}
