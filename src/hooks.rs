//! # Host hooks.
//!
//! The host announces what it is about to do through [`HookEvent`]s and
//! lets [`Context::dispatch`] handle them. If dispatch returns false the
//! host goes on with its own behavior.

use anyhow::{Context as _, Result};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::context::Context;
use crate::document::Document;
use crate::hardwrap::wrap_once;
use crate::indent::{decrease_indentation, increase_indentation};
use crate::log::LogExt;
use crate::outbound::{flow_part, select_transfer_encoding, MimePart};

/// Points in the host at which the core takes part.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Hook {
    /// A plain-text part is about to be composed into the outgoing message.
    BeforeCompose,

    /// The transfer encoding of a part is about to be chosen.
    BeforeSendEncode,

    /// The user invoked one of the formatting commands.
    FormatCommand,
}

/// Formatting commands a host offers in its menus.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Command {
    /// Toggle flowed mode.
    FlowText,
    /// Toggle sticky hard-wrap mode.
    WrapText,
    /// Hard-wrap the paragraph at the cursor or the selected paragraphs.
    WrapOnce,
    IncreaseIndentation,
    DecreaseIndentation,
}

/// Host surface the core subscribes to hooks through.
pub trait HookRegistry {
    fn subscribe(&mut self, hook: Hook) -> Result<()>;
}

/// Subscribes to every [`Hook`].
pub fn register_hooks<R: HookRegistry + ?Sized>(registry: &mut R) -> Result<()> {
    for hook in Hook::iter() {
        registry
            .subscribe(hook)
            .with_context(|| format!("failed to subscribe to {hook}"))?;
    }
    Ok(())
}

/// A hook invocation and the host objects it concerns.
pub enum HookEvent<'a> {
    BeforeCompose {
        part: &'a mut dyn MimePart,
        /// The user asked to send the text as typed.
        bypass: bool,
    },
    BeforeSendEncode {
        part: &'a mut dyn MimePart,
    },
    FormatCommand {
        command: Command,
        document: &'a mut dyn Document,
    },
}

impl std::fmt::Debug for HookEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeforeCompose { part, bypass } => f
                .debug_struct("BeforeCompose")
                .field("mimetype", &part.mimetype())
                .field("bypass", bypass)
                .finish(),
            Self::BeforeSendEncode { part } => f
                .debug_struct("BeforeSendEncode")
                .field("mimetype", &part.mimetype())
                .finish(),
            Self::FormatCommand { command, .. } => f
                .debug_struct("FormatCommand")
                .field("command", command)
                .finish_non_exhaustive(),
        }
    }
}

impl HookEvent<'_> {
    pub fn hook(&self) -> Hook {
        match self {
            Self::BeforeCompose { .. } => Hook::BeforeCompose,
            Self::BeforeSendEncode { .. } => Hook::BeforeSendEncode,
            Self::FormatCommand { .. } => Hook::FormatCommand,
        }
    }
}

impl Context {
    /// Handles a hook invocation.
    ///
    /// Returns true if the event was handled and the host must skip its own behavior.
    pub fn dispatch(&self, event: HookEvent<'_>) -> Result<bool> {
        let hook = event.hook();
        let handled = match event {
            HookEvent::BeforeCompose { part, bypass } => flow_part(self, part, bypass)?,
            // The host has its own encoding fallback.
            HookEvent::BeforeSendEncode { part } => select_transfer_encoding(part)
                .context("failed to select transfer encoding")
                .log_err(self)
                .unwrap_or_default(),
            HookEvent::FormatCommand { command, document } => {
                self.run_command(command, document)
                    .with_context(|| format!("{command} failed"))?
            }
        };
        if handled {
            info!(self, "Handled {hook}.");
        }
        Ok(handled)
    }

    fn run_command(&self, command: Command, document: &mut dyn Document) -> Result<bool> {
        match command {
            Command::FlowText => {
                self.toggle_flow_text()?;
                Ok(true)
            }
            Command::WrapText => {
                self.toggle_wrap_text()?;
                Ok(true)
            }
            Command::WrapOnce => {
                if !document.is_plain_text() {
                    return Ok(false);
                }
                wrap_once(self, document)?;
                Ok(true)
            }
            Command::IncreaseIndentation => increase_indentation(self, document),
            Command::DecreaseIndentation => decrease_indentation(self, document),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;
    use crate::constants::WrapMode;
    use crate::document::Selection;
    use crate::events::EventType;
    use crate::outbound::{PlainTextPart, TransferEncoding};
    use crate::test_utils::{rendered_lines, text_document, TestContext};

    #[derive(Debug, Default)]
    struct Registry(Vec<Hook>);

    impl HookRegistry for Registry {
        fn subscribe(&mut self, hook: Hook) -> Result<()> {
            self.0.push(hook);
            Ok(())
        }
    }

    #[test]
    fn test_register_hooks() -> Result<()> {
        let mut registry = Registry::default();
        register_hooks(&mut registry)?;
        assert_eq!(
            registry.0,
            [Hook::BeforeCompose, Hook::BeforeSendEncode, Hook::FormatCommand]
        );
        assert_eq!(Hook::BeforeSendEncode.to_string(), "before-send-encode");
        assert_eq!(Command::IncreaseIndentation.as_ref(), "increase-indentation");
        Ok(())
    }

    #[test]
    fn test_dispatch_toggles() -> Result<()> {
        let t = TestContext::new();
        let mut doc = text_document(&["text"]);
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::FlowText,
            document: &mut doc,
        })?);
        assert_eq!(t.wrap_mode()?, WrapMode::Flowed);
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::FlowText,
            document: &mut doc,
        })?);
        assert_eq!(t.wrap_mode()?, WrapMode::Off);
        assert_eq!(rendered_lines(&doc), ["text"]);
        Ok(())
    }

    #[test]
    fn test_dispatch_wrap_text_then_compose() -> Result<()> {
        let t = TestContext::with_config(&[(Config::WrapWidth, "10")]);
        let mut doc = text_document(&["text"]);
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::WrapText,
            document: &mut doc,
        })?);
        assert_eq!(t.wrap_mode()?, WrapMode::HardWrapSticky);

        let mut part = PlainTextPart::new("one two three four");
        assert!(t.dispatch(HookEvent::BeforeCompose {
            part: &mut part,
            bypass: false,
        })?);
        assert_eq!(part.data, b"one two  \nthree four".to_vec());
        assert_eq!(part.body_param("format"), None);

        let mut bypassed = PlainTextPart::new("one two three four");
        assert!(!t.dispatch(HookEvent::BeforeCompose {
            part: &mut bypassed,
            bypass: true,
        })?);

        assert!(t.dispatch(HookEvent::BeforeSendEncode { part: &mut part })?);
        assert_eq!(part.transfer_encoding, Some(TransferEncoding::SevenBit));
        Ok(())
    }

    #[test]
    fn test_dispatch_document_commands() -> Result<()> {
        let t = TestContext::with_config(&[(Config::WrapWidth, "7")]);
        let mut doc = text_document(&["aaa bbb ccc"]);
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::WrapOnce,
            document: &mut doc,
        })?);
        assert_eq!(rendered_lines(&doc), ["aaa bbb", "ccc", ""]);

        doc.set_selection(Selection::cursor(1, 0))?;
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::IncreaseIndentation,
            document: &mut doc,
        })?);
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::DecreaseIndentation,
            document: &mut doc,
        })?);
        assert_eq!(rendered_lines(&doc), ["aaa bbb", "ccc", ""]);

        let mut rich = text_document(&["aaa bbb ccc"]).into_rich_text();
        for command in [
            Command::WrapOnce,
            Command::IncreaseIndentation,
            Command::DecreaseIndentation,
        ] {
            assert!(!t.dispatch(HookEvent::FormatCommand {
                command,
                document: &mut rich,
            })?);
        }
        Ok(())
    }

    #[test]
    fn test_wrap_once_keeps_wrap_mode() -> Result<()> {
        let t = TestContext::with_config(&[(Config::WrapWidth, "7")]);
        t.set_wrap_mode(WrapMode::Flowed)?;
        t.take_events();
        let mut doc = text_document(&["aaa bbb ccc"]);
        assert!(t.dispatch(HookEvent::FormatCommand {
            command: Command::WrapOnce,
            document: &mut doc,
        })?);
        assert_eq!(rendered_lines(&doc), ["aaa bbb", "ccc", ""]);
        assert_eq!(t.wrap_mode()?, WrapMode::Flowed);
        assert!(!t
            .take_events()
            .iter()
            .any(|event| matches!(event, EventType::WrapModeChanged(_))));
        Ok(())
    }

    /// Part whose transfer encoding cannot be changed.
    #[derive(Debug)]
    struct SealedPart(PlainTextPart);

    impl MimePart for SealedPart {
        fn mimetype(&self) -> String {
            self.0.mimetype()
        }

        fn body_param(&self, key: &str) -> Option<String> {
            self.0.body_param(key)
        }

        fn set_body_param(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.set_body_param(key, value)
        }

        fn data(&self) -> &[u8] {
            self.0.data()
        }

        fn set_data(&mut self, data: Vec<u8>) -> Result<()> {
            self.0.set_data(data)
        }

        fn set_transfer_encoding(&mut self, _encoding: TransferEncoding) -> Result<()> {
            anyhow::bail!("part is sealed")
        }
    }

    #[test]
    fn test_dispatch_encode_failure_is_logged() -> Result<()> {
        let t = TestContext::new();
        let mut part = SealedPart(PlainTextPart::new("hello"));
        assert!(!t.dispatch(HookEvent::BeforeSendEncode { part: &mut part })?);

        let events = t.take_events();
        let [EventType::Warning(warning)] = events.as_slice() else {
            panic!("unexpected events {events:?}");
        };
        assert!(warning.ends_with("failed to select transfer encoding: part is sealed"));
        Ok(())
    }
}
