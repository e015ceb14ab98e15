//! Leveled logging macros for [`Logger`](crate::Logger).
//!
//! Unlike the `Logger` methods, the macros check the gate before the message
//! and attribute expressions are evaluated, so a disabled call costs one
//! comparison and nothing else.
//!
//! ```no_run
//! use log_fanout::{attr, logger_info, Logger};
//!
//! fn handle(logger: &Logger, user: u32) {
//!     logger_info!(logger, "login", attr::int("user", i64::from(user)));
//! }
//! ```

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $msg:expr $(, $attr:expr)* $(,)?) => {{
        let __logger = &$logger;
        let __lvl = $lvl;
        if __logger.enabled(__lvl) {
            __logger.log(
                __lvl,
                $msg,
                ::core::iter::empty::<$crate::Attr>()$(.chain(::core::iter::once($attr)))*,
            );
        }
    }};
}

#[macro_export]
macro_rules! logger_debug {
    ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::Level::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! logger_info {
    ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::Level::Info, $($arg)*) };
}

#[macro_export]
macro_rules! logger_warn {
    ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::Level::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! logger_error {
    ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::Level::Error, $($arg)*) };
}

/// `logger_error_with_op!(logger, msg, err, op, attrs...)` where `err` is an
/// `Option<ErrorValue>`.
#[macro_export]
macro_rules! logger_error_with_op {
    ($logger:expr, $msg:expr, $err:expr, $op:expr $(, $attr:expr)* $(,)?) => {{
        let __logger = &$logger;
        if __logger.enabled($crate::Level::Error) {
            __logger.error_with_op(
                $msg,
                $err,
                $op,
                ::core::iter::empty::<$crate::Attr>()$(.chain(::core::iter::once($attr)))*,
            );
        }
    }};
}
