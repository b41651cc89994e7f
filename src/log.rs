//! # Logging

use crate::context::Context;

#[macro_export]
macro_rules! info {
    ($ctx:expr,  $msg:expr) => {
        info!($ctx, $msg,)
    };
    ($ctx:expr, $msg:expr, $($args:expr),* $(,)?) => {{
        let formatted = format!($msg, $($args),*);
        let full = format!("{file}:{line}: {msg}",
                           file = file!(),
                           line = line!(),
                           msg = &formatted);
        $ctx.emit_event($crate::EventType::Info(full));
    }};
}

#[macro_export]
macro_rules! warn {
    ($ctx:expr, $msg:expr) => {
        warn!($ctx, $msg,)
    };
    ($ctx:expr, $msg:expr, $($args:expr),* $(,)?) => {{
        let formatted = format!($msg, $($args),*);
        let full = format!("{file}:{line}: {msg}",
                           file = file!(),
                           line = line!(),
                           msg = &formatted);
        $ctx.emit_event($crate::EventType::Warning(full));
    }};
}

#[macro_export]
macro_rules! error {
    ($ctx:expr, $msg:expr) => {
        error!($ctx, $msg,)
    };
    ($ctx:expr, $msg:expr, $($args:expr),* $(,)?) => {{
        let formatted = format!($msg, $($args),*);
        $ctx.emit_event($crate::EventType::Error(formatted));
    }};
}

pub(crate) trait LogExt<T> {
    /// Emits a warning if the receiver contained an Err value.
    ///
    /// Returns an [`Option<T>`] with the `Ok(_)` value, if any.
    ///
    /// Thanks to `#[track_caller]` the location of the caller is printed
    /// to the log, just like with the warn!() macro.
    #[track_caller]
    fn log_err(self, context: &Context) -> Option<T>;
}

impl<T> LogExt<T> for anyhow::Result<T> {
    #[track_caller]
    fn log_err(self, context: &Context) -> Option<T> {
        match self {
            Err(e) => {
                let location = std::panic::Location::caller();
                // We are using Anyhow's .context() and to show the inner error, too, we need the {:#}:
                let full = format!(
                    "{file}:{line}: {e:#}",
                    file = location.file(),
                    line = location.line(),
                    e = e
                );
                // We can't use the warn!() macro here as the file!() and line!() macros
                // don't work well with #[track_caller]
                context.emit_event(crate::EventType::Warning(full));
                None
            }
            Ok(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;
    use crate::EventType;
    use anyhow::format_err;

    #[test]
    fn test_log_err() {
        let t = TestContext::new();
        let res: anyhow::Result<()> = Err(format_err!("testerror").context("Some context"));
        assert_eq!(res.log_err(&t), None);

        let events = t.take_events();
        let [EventType::Warning(warning)] = events.as_slice() else {
            panic!("unexpected events {events:?}");
        };
        assert!(warning.contains("log.rs"));
        assert!(warning.ends_with("Some context: testerror"));
    }

    #[test]
    fn test_info_macro() {
        let t = TestContext::new();
        info!(t, "wrapped {} lines", 3);
        warn!(t, "no paragraph");
        error!(t, "Failed: {}", "boom");
        let events = t.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], EventType::Info(s) if s.ends_with(": wrapped 3 lines")));
        assert!(matches!(&events[1], EventType::Warning(s) if s.ends_with(": no paragraph")));
        assert_eq!(events[2], EventType::Error("Failed: boom".to_string()));
    }
}
