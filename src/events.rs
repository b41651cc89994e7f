//! # Events.

use async_channel::{self as channel, Receiver, Sender, TrySendError};
use strum::EnumProperty;
use strum_macros::EnumProperty;

use crate::constants::WrapMode;

/// Event queue.
///
/// Events are buffered until the host takes them with an [`EventEmitter`].
/// When the buffer is full the oldest event is dropped.
#[derive(Debug, Clone)]
pub struct Events {
    receiver: Receiver<Event>,
    sender: Sender<Event>,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    /// Creates a new event queue.
    pub fn new() -> Self {
        let (sender, receiver) = channel::bounded(1_000);

        Self { receiver, sender }
    }

    /// Emits an event.
    pub fn emit(&self, event: Event) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                // when we are full, we pop remove the oldest event and push on the new one
                let _ = self.receiver.try_recv();

                // try again
                self.emit(event);
            }
            Err(TrySendError::Closed(_)) => {
                // The queue owns a receiver, so the channel cannot be closed.
            }
        }
    }

    /// Retrieve the event emitter.
    pub fn get_emitter(&self) -> EventEmitter {
        EventEmitter(self.receiver.clone())
    }
}

/// A receiver of events from a [`Context`].
///
/// [`Context`]: crate::context::Context
#[derive(Debug, Clone)]
pub struct EventEmitter(Receiver<Event>);

impl EventEmitter {
    /// Async recv of an event. Return `None` if the `Sender` has been dropped.
    pub async fn recv(&self) -> Option<Event> {
        self.0.recv().await.ok()
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&self) -> Option<Event> {
        self.0.try_recv().ok()
    }
}

/// The event emitted by a [`Context`] from an [`EventEmitter`].
///
/// [`Context`]: crate::context::Context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event payload.
    pub typ: EventType,
}

impl From<EventType> for Event {
    fn from(typ: EventType) -> Self {
        Self { typ }
    }
}

impl EventType {
    /// Returns the corresponding event id.
    pub fn as_id(&self) -> i32 {
        self.get_str("id")
            .and_then(|id| id.parse().ok())
            .unwrap_or_default()
    }
}

/// Event payload.
#[derive(Debug, Clone, PartialEq, Eq, EnumProperty)]
pub enum EventType {
    /// The library-user may write an informational string to the log.
    ///
    /// This event should not be reported to the end-user using a popup or something like that.
    #[strum(props(id = "100"))]
    Info(String),

    /// The library-user should write a warning string to the log.
    ///
    /// This event should not be reported to the end-user using a popup or something like that.
    #[strum(props(id = "300"))]
    Warning(String),

    /// The library-user should report an error to the end-user.
    #[strum(props(id = "400"))]
    Error(String),

    /// A paragraph block has been hard-wrapped.
    #[strum(props(id = "2100"))]
    ParagraphWrapped {
        /// Index of the first line of the block.
        start: usize,
        /// Number of lines the paragraph has after wrapping.
        lines: usize,
        /// Quote level of the paragraph.
        level: usize,
    },

    /// An outgoing plain-text body has been soft-wrapped.
    #[strum(props(id = "2110"))]
    BodyFlowed {
        lines: usize,
        format_flowed: bool,
    },

    /// Wrap mode changed by a toggle command or [`Context::set_wrap_mode`].
    ///
    /// [`Context::set_wrap_mode`]: crate::context::Context::set_wrap_mode
    #[strum(props(id = "2120"))]
    WrapModeChanged(WrapMode),
}
