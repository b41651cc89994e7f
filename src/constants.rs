//! # Constants.

use strum_macros::{Display, EnumIter, EnumString};

/// Hard per-line ceiling of RFC 5322, excluding CRLF.
pub const MAX_LINE_LENGTH: usize = 998;

/// Default target width for both hard and soft wrapping.
pub const DEFAULT_WRAP_WIDTH: usize = 76;

/// Default number of spaces one indentation step inserts.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Bullet markers recognized at the start of indented text.
pub(crate) const BULLET_MARKERS: [&str; 3] = ["- ", "+ ", "* "];

/// How plain text is wrapped while composing and sending.
///
/// The modes are mutually exclusive, each is persisted as one of the
/// `flow_text`, `wrap_text` and `wrap_once` config keys.
#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum WrapMode {
    /// Outgoing bodies are sent as typed.
    #[default]
    Off,

    /// Outgoing bodies are soft-wrapped and sent with `format=flowed`.
    Flowed,

    /// Paragraphs are hard-wrapped on command and outgoing bodies are
    /// soft-wrapped without announcing `format=flowed`.
    HardWrapSticky,

    /// Only explicit wrap commands touch the text.
    ///
    /// Behaves like [`WrapMode::Off`] and only records the host's menu state.
    /// Running the wrap-once command neither reads nor sets this mode.
    HardWrapOnce,
}

impl WrapMode {
    /// Returns true if outgoing plain-text bodies are soft-wrapped in this mode.
    pub fn flows_outbound(self) -> bool {
        matches!(self, WrapMode::Flowed | WrapMode::HardWrapSticky)
    }

    /// Returns true if the receiver should be told to rejoin soft breaks.
    pub fn announces_format_flowed(self) -> bool {
        self == WrapMode::Flowed
    }
}
