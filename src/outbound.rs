//! # Outgoing plain-text bodies.
//!
//! Soft-wraps `text/plain` parts as `format=flowed` (RFC 3676) before they
//! are sent, and picks a transfer encoding for them.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use format_flowed::format_flowed;
use strum_macros::{AsRefStr, Display};

use crate::constants::MAX_LINE_LENGTH;
use crate::context::Context;
use crate::events::EventType;

/// Charset assumed when a part does not declare one.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Content-Transfer-Encoding chosen for a plain-text part.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum TransferEncoding {
    #[strum(serialize = "7bit")]
    SevenBit,
    #[strum(serialize = "8bit")]
    EightBit,
}

/// Errors converting a body between its declared charset and text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Unknown charset {0:?}")]
    UnknownCharset(String),

    #[error("Body is not valid {0}")]
    Decode(String),

    #[error("Body cannot be encoded as {0}")]
    Encode(String),
}

/// One MIME part of a message being composed.
pub trait MimePart {
    /// Lowercase `type/subtype`.
    fn mimetype(&self) -> String;

    /// Value of a Content-Type parameter such as `charset`.
    fn body_param(&self, key: &str) -> Option<String>;

    fn set_body_param(&mut self, key: &str, value: &str) -> Result<()>;

    /// Body bytes in the declared charset.
    fn data(&self) -> &[u8];

    fn set_data(&mut self, data: Vec<u8>) -> Result<()>;

    fn set_transfer_encoding(&mut self, encoding: TransferEncoding) -> Result<()>;
}

/// In-memory [`MimePart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextPart {
    pub mimetype: String,
    pub params: BTreeMap<String, String>,
    pub data: Vec<u8>,
    pub transfer_encoding: Option<TransferEncoding>,
}

impl PlainTextPart {
    /// Creates a `text/plain; charset=utf-8` part.
    pub fn new(text: &str) -> Self {
        Self::with_charset(DEFAULT_CHARSET, text.as_bytes().to_vec())
    }

    /// Creates a `text/plain` part holding data in the given charset.
    pub fn with_charset(charset: &str, data: Vec<u8>) -> Self {
        let mut params = BTreeMap::new();
        params.insert("charset".to_string(), charset.to_string());
        Self {
            mimetype: "text/plain".to_string(),
            params,
            data,
            transfer_encoding: None,
        }
    }
}

impl MimePart for PlainTextPart {
    fn mimetype(&self) -> String {
        self.mimetype.to_ascii_lowercase()
    }

    fn body_param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn set_body_param(&mut self, key: &str, value: &str) -> Result<()> {
        self.params.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn set_data(&mut self, data: Vec<u8>) -> Result<()> {
        self.data = data;
        Ok(())
    }

    fn set_transfer_encoding(&mut self, encoding: TransferEncoding) -> Result<()> {
        self.transfer_encoding = Some(encoding);
        Ok(())
    }
}

fn is_plain_text<P: MimePart + ?Sized>(part: &P) -> bool {
    part.mimetype() == "text/plain"
}

/// Decodes `data` from the charset named by `label`.
pub fn decode(label: &str, data: &[u8]) -> Result<String, EncodingError> {
    let charset = charset::Charset::for_label(label.as_bytes())
        .ok_or_else(|| EncodingError::UnknownCharset(label.to_string()))?;
    let (text, _, malformed) = charset.decode(data);
    if malformed {
        return Err(EncodingError::Decode(label.to_string()));
    }
    Ok(text.into_owned())
}

/// Encodes `text` into the charset named by `label`.
///
/// Fails instead of writing replacement characters or switching to another charset.
pub fn encode(label: &str, text: &str) -> Result<Vec<u8>, EncodingError> {
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| EncodingError::Encode(label.to_string()))?;
    let (bytes, used, unmappable) = encoding.encode(text);
    if unmappable || used != encoding {
        return Err(EncodingError::Encode(label.to_string()));
    }
    Ok(bytes.into_owned())
}

/// Soft-wraps a `text/plain` part before sending.
///
/// Only acts if the wrap mode flows outgoing text and `bypass` is not set.
/// Every line is flowed to the wrap width plus the padding column, the
/// part gets `delsp=yes` and, in [`WrapMode::Flowed`], `format=flowed`.
/// Returns true if the part was changed.
///
/// Charset failures are [`EncodingError`]s and leave the part as it was.
///
/// [`WrapMode::Flowed`]: crate::constants::WrapMode::Flowed
pub fn flow_part<P: MimePart + ?Sized>(context: &Context, part: &mut P, bypass: bool) -> Result<bool> {
    if bypass || !is_plain_text(part) {
        return Ok(false);
    }
    let mode = context.wrap_mode()?;
    if !mode.flows_outbound() {
        return Ok(false);
    }

    let width = context.wrap_width()? + 1;
    let charset = part
        .body_param("charset")
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string());
    let text = decode(&charset, part.data())?;
    let flowed = format_flowed(&text, width, true);
    let data = encode(&charset, &flowed)?;

    part.set_data(data).context("failed to set body")?;
    part.set_body_param("delsp", "yes")?;
    let announce = mode.announces_format_flowed();
    if announce {
        part.set_body_param("format", "flowed")?;
    }

    let lines = flowed.split('\n').count();
    info!(context, "Flowed body to {} lines of width {}.", lines, width);
    context.emit_event(EventType::BodyFlowed {
        lines,
        format_flowed: announce,
    });
    Ok(true)
}

/// Sets `7bit` or `8bit` transfer encoding on a `text/plain` part.
///
/// Returns false, leaving the choice to the host, if the part is not plain
/// text or a line is longer than [`MAX_LINE_LENGTH`] bytes.
pub fn select_transfer_encoding<P: MimePart + ?Sized>(part: &mut P) -> Result<bool> {
    if !is_plain_text(part) {
        return Ok(false);
    }
    let data = part.data();
    let too_long = data
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .any(|line| line.len() > MAX_LINE_LENGTH);
    if too_long {
        return Ok(false);
    }

    let encoding = if data.is_ascii() {
        TransferEncoding::SevenBit
    } else {
        TransferEncoding::EightBit
    };
    part.set_transfer_encoding(encoding)?;
    Ok(true)
}
