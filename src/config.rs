//! # Key-value configuration management.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use anyhow::{bail, ensure, format_err, Context as _, Result};
use strum::{EnumProperty, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumIter, EnumProperty, EnumString};

use crate::constants::{WrapMode, MAX_LINE_LENGTH};
use crate::context::Context;
use crate::events::EventType;

/// The available configuration keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, EnumIter, EnumProperty,
)]
#[strum(serialize_all = "snake_case")]
pub enum Config {
    /// Soft-wrap outgoing plain text and send it as `format=flowed`.
    #[strum(props(default = "0"))]
    FlowText,

    /// Soft-wrap outgoing plain text without `format=flowed`,
    /// paragraphs are hard-wrapped by the wrap commands.
    #[strum(props(default = "0"))]
    WrapText,

    /// Only the explicit wrap commands touch the text.
    #[strum(props(default = "0"))]
    WrapOnce,

    /// Rewrite reply attributions. Stored for the host, the core does not use it.
    #[strum(props(default = "0"))]
    FixAttribution,

    /// Indent continuation lines of `- `, `+ ` and `* ` bullets.
    #[strum(props(default = "1"))]
    BulletLists,

    /// Number of spaces added or removed by the indentation commands.
    #[strum(props(default = "2"))]
    IndentWidth,

    /// Target width of hard and soft wrapping.
    #[strum(props(default = "76"))]
    WrapWidth,
}

impl Config {
    /// Whether the key holds a `0`/`1` flag.
    pub(crate) fn is_bool(&self) -> bool {
        !matches!(self, Self::IndentWidth | Self::WrapWidth)
    }

    /// Inclusive range of accepted values for integer keys.
    fn int_range(&self) -> Option<(i32, i32)> {
        match self {
            // The padding column must fit within the line length ceiling.
            Self::WrapWidth => Some((1, MAX_LINE_LENGTH as i32 - 1)),
            Self::IndentWidth => Some((1, 16)),
            _ => None,
        }
    }
}

/// Host preference store.
///
/// Values are kept as raw strings, `None` means the key is unset and the
/// default of the [`Config`] key applies.
pub trait Preferences: fmt::Debug {
    /// Reads a raw value.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Writes a raw value, `None` removes it.
    fn set_raw(&self, key: &str, value: Option<&str>) -> Result<()>;
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| format_err!("preferences lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: Option<&str>) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| format_err!("preferences lock poisoned"))?;
        match value {
            Some(value) => values.insert(key.to_string(), value.to_string()),
            None => values.remove(key),
        };
        Ok(())
    }
}

impl Context {
    /// Get a config key value. Returns `None` if no value is set and there is no default.
    pub fn get_config(&self, key: Config) -> Result<Option<String>> {
        let value = self
            .prefs
            .get_raw(key.as_ref())
            .with_context(|| format!("failed to read {key}"))?;
        match value {
            Some(value) => Ok(Some(value)),
            None => Ok(key.get_str("default").map(|s| s.to_string())),
        }
    }

    /// Returns Some(T) if a value for the given key exists and was successfully parsed.
    /// Returns None if could not parse.
    pub fn get_config_parsed<T: FromStr>(&self, key: Config) -> Result<Option<T>> {
        self.get_config(key)
            .map(|s: Option<String>| s.and_then(|s| s.parse().ok()))
    }

    /// Returns 32-bit signed integer configuration value for the given key.
    pub fn get_config_int(&self, key: Config) -> Result<i32> {
        self.get_config_parsed(key)
            .map(|parsed: Option<i32>| parsed.unwrap_or_default())
    }

    /// Returns boolean configuration value for the given key.
    pub fn get_config_bool(&self, key: Config) -> Result<bool> {
        Ok(self.get_config_int(key)? != 0)
    }

    /// Set the given config key.
    /// If `None` is passed as a value the value is cleared and set to the default if there is one.
    pub fn set_config(&self, key: Config, value: Option<&str>) -> Result<()> {
        if let Some(value) = value {
            if key.is_bool() {
                ensure!(
                    matches!(value, "0" | "1"),
                    "{key} must be either \"0\" or \"1\", got {value:?}"
                );
            } else if let Some((min, max)) = key.int_range() {
                let parsed: i32 = value
                    .parse()
                    .with_context(|| format!("{key} must be an integer, got {value:?}"))?;
                ensure!(
                    (min..=max).contains(&parsed),
                    "{key} must be between {min} and {max}, got {parsed}"
                );
            }
        }
        self.prefs
            .set_raw(key.as_ref(), value)
            .with_context(|| format!("failed to write {key}"))
    }

    /// Set the given config to an integer value.
    pub fn set_config_int(&self, key: Config, value: i32) -> Result<()> {
        self.set_config(key, Some(&value.to_string()))
    }

    /// Set the given config to a boolean value.
    pub fn set_config_bool(&self, key: Config, value: bool) -> Result<()> {
        self.set_config(key, if value { Some("1") } else { Some("0") })
    }

    /// Returns all config keys with their current values, one `key=value` per line.
    pub fn get_config_summary(&self) -> Result<String> {
        let mut res = String::new();
        for key in Config::iter() {
            let value = self.get_config(key)?.unwrap_or_default();
            res += &format!("{key}={value}\n");
        }
        Ok(res)
    }

    /// Returns the current wrap mode.
    pub fn wrap_mode(&self) -> Result<WrapMode> {
        let mode = if self.get_config_bool(Config::FlowText)? {
            WrapMode::Flowed
        } else if self.get_config_bool(Config::WrapText)? {
            WrapMode::HardWrapSticky
        } else if self.get_config_bool(Config::WrapOnce)? {
            WrapMode::HardWrapOnce
        } else {
            WrapMode::Off
        };
        Ok(mode)
    }

    /// Sets the wrap mode, clearing the keys of the other modes.
    pub fn set_wrap_mode(&self, mode: WrapMode) -> Result<()> {
        let old = self.wrap_mode()?;
        self.set_config_bool(Config::FlowText, mode == WrapMode::Flowed)?;
        self.set_config_bool(Config::WrapText, mode == WrapMode::HardWrapSticky)?;
        self.set_config_bool(Config::WrapOnce, mode == WrapMode::HardWrapOnce)?;
        if old != mode {
            self.emit_event(EventType::WrapModeChanged(mode));
        }
        Ok(())
    }

    /// Switches flowed mode on, or back off if it is already on.
    pub fn toggle_flow_text(&self) -> Result<WrapMode> {
        self.toggle_wrap_mode(WrapMode::Flowed)
    }

    /// Switches sticky hard-wrap mode on, or back off if it is already on.
    pub fn toggle_wrap_text(&self) -> Result<WrapMode> {
        self.toggle_wrap_mode(WrapMode::HardWrapSticky)
    }

    fn toggle_wrap_mode(&self, mode: WrapMode) -> Result<WrapMode> {
        let new = if self.wrap_mode()? == mode {
            WrapMode::Off
        } else {
            mode
        };
        self.set_wrap_mode(new)?;
        Ok(new)
    }

    /// Returns the configured wrap width.
    pub fn wrap_width(&self) -> Result<usize> {
        self.positive_config(Config::WrapWidth)
    }

    /// Returns the configured indentation step.
    pub fn indent_width(&self) -> Result<usize> {
        self.positive_config(Config::IndentWidth)
    }

    fn positive_config(&self, key: Config) -> Result<usize> {
        let value = self.get_config_int(key)?;
        match usize::try_from(value) {
            Ok(value) if value > 0 => Ok(value),
            _ => bail!("{key} is not a positive integer: {value}"),
        }
    }
}
