//! # Paragraph refilling.

use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};

use crate::constants::BULLET_MARKERS;

/// Joins a word to the one before it, the fill never breaks there.
const GLUE: char = '\u{a0}';

/// Width available for paragraph text at the given quote level.
///
/// Quoted text leaves one extra column for the markers added back on display.
pub fn effective_width(width: usize, level: usize) -> usize {
    if level > 0 {
        width.saturating_sub(level + 1).max(1)
    } else {
        width.max(1)
    }
}

/// Refills the words of a paragraph to `width`.
///
/// The leading whitespace of `text` becomes the indent of the first line
/// and of all continuation lines. With `bullets`, an indented `- `, `+ `
/// or `* ` item indents its continuation lines past the marker. Words are
/// never split, not even at hyphens, and runs of whitespace collapse into
/// single spaces. A word starting with `>` stays on the line of the word
/// before it, so refilling never produces a line that reads as a quote.
pub fn reflow_paragraph(text: &str, level: usize, width: usize, bullets: bool) -> String {
    let rest = text.trim_start();
    if rest.is_empty() {
        return String::new();
    }

    let words = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    let initial = text.chars().take_while(|c| c.is_whitespace()).count();
    let mut subsequent = initial;
    if bullets && initial > 0 && BULLET_MARKERS.iter().any(|bullet| words.starts_with(bullet)) {
        subsequent += 2;
    }

    let glued = words.replace(" >", &format!("{GLUE}>"));

    let initial_indent = " ".repeat(initial);
    let subsequent_indent = " ".repeat(subsequent);
    let options = Options::new(effective_width(width, level))
        .break_words(false)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .initial_indent(&initial_indent)
        .subsequent_indent(&subsequent_indent);

    textwrap::fill(&glued, options).replace(GLUE, " ")
}
