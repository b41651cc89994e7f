//! Context module.

use std::fmt;

use crate::config::{MemoryPreferences, Preferences};
use crate::events::{Event, EventEmitter, EventType, Events};

/// The context for a composing session.
///
/// Holds the host preference store and the event queue. Every operation
/// that reads settings or reports progress takes a `&Context`.
pub struct Context {
    pub(crate) prefs: Box<dyn Preferences>,
    events: Events,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("prefs", &self.prefs)
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Box::new(MemoryPreferences::new()))
    }
}

impl Context {
    /// Creates a new context backed by the given preference store.
    pub fn new(prefs: Box<dyn Preferences>) -> Self {
        Context {
            prefs,
            events: Events::new(),
        }
    }

    /// Emits a single event.
    pub fn emit_event(&self, event: EventType) {
        self.events.emit(Event::from(event));
    }

    /// Returns a receiver for emitted events.
    ///
    /// Multiple emitters can be created, but note that in this case each emitted event will
    /// only be received by one of the emitters, not by all of them.
    pub fn get_event_emitter(&self) -> EventEmitter {
        self.events.get_emitter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_custom_preferences() -> anyhow::Result<()> {
        let prefs = MemoryPreferences::new();
        prefs.set_raw("wrap_width", Some("60"))?;
        let context = Context::new(Box::new(prefs));
        assert_eq!(context.get_config_int(Config::WrapWidth)?, 60);
        Ok(())
    }

    #[test]
    fn test_event_emitter() {
        let context = Context::default();
        let emitter = context.get_event_emitter();
        context.emit_event(EventType::Info("hello".to_string()));
        let event = emitter.try_recv();
        assert_eq!(
            event.map(|e| e.typ),
            Some(EventType::Info("hello".to_string()))
        );
        assert!(emitter.try_recv().is_none());
    }
}
