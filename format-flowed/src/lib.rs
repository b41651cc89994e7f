//! # format=flowed support.
//!
//! Format=flowed is defined in
//! [RFC 3676](https://tools.ietf.org/html/rfc3676).
//!
//! Lines are soft-wrapped for sending with DelSp semantics: every
//! soft-broken line keeps the whitespace that separated the words and gets
//! one extra padding space that the receiver deletes when rejoining.
//!
//! Quoted and indented lines are never re-wrapped here; their line breaks
//! are the ones the composer made.
#![cfg_attr(not(test), forbid(clippy::indexing_slicing))]
#![cfg_attr(not(test), forbid(clippy::string_slice))]

use std::fmt;

/// Canonical signature delimiter, see RFC 3676, section 4.3.
pub const SIGNATURE_DELIMITER: &str = "-- ";

/// Tab stop used for measuring line width.
const TAB_WIDTH: usize = 8;

/// One encoded output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowedLine {
    /// Line text including quote marker, space-stuffing and padding.
    pub text: String,

    /// The line ends in a soft break and continues on the next line.
    pub soft_break: bool,

    /// Quote depth of the logical line this line was produced from.
    pub quote_depth: usize,
}

impl fmt::Display for FlowedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returns quote depth and byte length of the quote marker at the start of
/// `line`.
///
/// The marker is a run of `>` characters, each optionally followed by
/// one space, so both `>> ` and `> > ` have depth 2.
pub fn quote_prefix(line: &str) -> (usize, usize) {
    let bytes = line.as_bytes();
    let mut depth = 0;
    let mut len = 0;
    while bytes.get(len) == Some(&b'>') {
        depth += 1;
        len += 1;
        if bytes.get(len) == Some(&b' ') {
            len += 1;
        }
    }
    (depth, len)
}

/// Returns the width of `text` in columns with tabs expanded.
pub fn display_width(text: &str) -> usize {
    text.chars().fold(0, |column, c| match c {
        '\t' => column + TAB_WIDTH - column % TAB_WIDTH,
        '\n' | '\r' => 0,
        _ => column + 1,
    })
}

/// Replaces tabs with spaces up to the next tab stop.
pub fn expand_tabs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let n = TAB_WIDTH - column % TAB_WIDTH;
                result.extend(std::iter::repeat(' ').take(n));
                column += n;
            }
            '\n' | '\r' => {
                result.push(c);
                column = 0;
            }
            _ => {
                result.push(c);
                column += 1;
            }
        }
    }
    result
}

/// Returns byte offsets where the line may be broken: the start of every
/// word but the first, followed by the end of the text.
///
/// Whitespace between two words always stays on the earlier line.
fn word_breaks(text: &str) -> Vec<usize> {
    let mut breaks = Vec::new();
    let mut after_space = false;
    let mut seen_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            after_space = true;
        } else {
            if after_space && seen_word {
                breaks.push(i);
            }
            seen_word = true;
            after_space = false;
        }
    }
    if seen_word {
        breaks.push(text.len());
    }
    breaks
}

/// Returns true if a line starting with `text` must be space-stuffed so it
/// is not mistaken for a quote or an mbox delimiter.
fn needs_stuffing(text: &str) -> bool {
    text.starts_with("From ") || text.starts_with('>')
}

/// Soft-wraps one logical line.
///
/// `width` is the number of columns a line may reach before it is broken;
/// a line is only broken between words, so a single word longer than
/// `width` ends up on a line of its own. If `padding` is set, every
/// soft-broken line gets a trailing space to be removed by a DelSp-aware
/// receiver.
pub fn flow_lines(line: &str, width: usize, padding: bool) -> Vec<FlowedLine> {
    let (quote_depth, prefix_len) = quote_prefix(line);
    let rest = line.get(prefix_len..).unwrap_or_default();
    let single = |text: String| {
        vec![FlowedLine {
            text,
            soft_break: false,
            quote_depth,
        }]
    };

    if rest == SIGNATURE_DELIMITER {
        return single(line.to_string());
    }
    let indented = rest.starts_with(char::is_whitespace);

    // Trailing spaces are reserved for soft breaks.
    let mut text = line.trim_end_matches(' ').to_string();

    // Space stuffing, see RFC 3676
    if quote_depth == 0 && (rest.starts_with(' ') || text.starts_with("From ")) {
        text.insert(0, ' ');
    }

    if quote_depth > 0 || indented || text.chars().count() <= width {
        return single(text);
    }

    let mut result = Vec::new();
    let mut breaks = word_breaks(&text);
    loop {
        // Index of the last break that still fits.
        let fits = breaks.iter().skip(1).position(|&end| {
            display_width(text.get(..end).unwrap_or_default()) >= width
        });
        let Some(index) = fits else {
            result.push(FlowedLine {
                text,
                soft_break: false,
                quote_depth,
            });
            return result;
        };

        let cursor = breaks.get(index).copied().unwrap_or(text.len());
        let (head, tail) = text.split_at(cursor);
        let mut head = head.to_string();
        if padding {
            head.push(' ');
        }
        result.push(FlowedLine {
            text: head,
            soft_break: true,
            quote_depth,
        });

        let stuffed = needs_stuffing(tail);
        let mut next = String::with_capacity(tail.len() + 1);
        if stuffed {
            next.push(' ');
        }
        next.push_str(tail);

        breaks = breaks
            .iter()
            .skip(index + 1)
            .map(|&end| end + usize::from(stuffed) - cursor)
            .collect();
        text = next;
    }
}

/// Same as [`flow_lines`], but returns only the line texts.
pub fn flow(line: &str, width: usize, padding: bool) -> Vec<String> {
    flow_lines(line, width, padding)
        .into_iter()
        .map(|line| line.text)
        .collect()
}

/// Soft-wraps every line of `text`.
///
/// Lines must be separated by single LF, the result is separated by LF
/// as well.
pub fn format_flowed(text: &str, width: usize, padding: bool) -> String {
    text.split('\n')
        .flat_map(|line| flow(line, width, padding))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins lines in format=flowed text.
///
/// Lines must be separated by single LF.
///
/// The signature delimiter `-- ` is a fixed line even though it ends with
/// a space.
pub fn unformat_flowed(text: &str, delsp: bool) -> String {
    let mut result = String::new();
    let mut skip_newline = true;

    for line in text.split('\n') {
        let line = if !result.is_empty() && skip_newline {
            line.trim_start_matches('>')
        } else {
            line
        };

        // Revert space-stuffing
        let line = line.strip_prefix(' ').unwrap_or(line);

        if !skip_newline {
            result.push('\n');
        }

        let (_, prefix_len) = quote_prefix(line);
        let is_signature = line.get(prefix_len..) == Some(SIGNATURE_DELIMITER);
        match line.strip_suffix(' ') {
            Some(line) if !is_signature => {
                // Flowed line
                result += line;
                if !delsp {
                    result.push(' ');
                }
                skip_newline = true;
            }
            _ => {
                // Fixed line
                result += line;
                skip_newline = false;
            }
        }
    }
    result
}
