//! # Quote-aware reflow for plain-text email.
//!
//! Hard-wraps paragraphs of a message being edited and soft-wraps outgoing
//! plain-text bodies as `format=flowed` (RFC 3676), keeping track of quote
//! levels, block indentation and bullet lists.

#![recursion_limit = "256"]
#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::correctness,
    missing_debug_implementations,
    clippy::all,
    clippy::wildcard_imports,
    clippy::needless_borrow,
    clippy::cast_lossless,
    clippy::unused_async,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::cloned_instead_of_copied
)]
#![cfg_attr(not(test), forbid(clippy::indexing_slicing))]
#![cfg_attr(not(test), forbid(clippy::string_slice))]
#![allow(
    clippy::match_bool,
    clippy::mixed_read_write_in_expression,
    clippy::bool_assert_comparison,
    clippy::manual_split_once,
    clippy::format_push_string,
    clippy::bool_to_int_with_if
)]

#[macro_use]
mod log;

pub mod config;
pub mod constants;
pub mod context;
pub mod document;
pub mod events;
pub mod hardwrap;
pub mod hooks;
pub mod indent;
pub mod outbound;
pub mod paragraph;
pub mod reflow;

pub use events::*;

#[cfg(test)]
mod test_utils;
