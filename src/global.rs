//! Process-wide convenience accessor.
//!
//! Prefer passing a [`Logger`] explicitly. Call sites that can't receive one
//! use [`get`]; startup code calls [`init`] or [`install`] once. Installing
//! again replaces the previous logger rather than adding to it.

use crate::config::{Config, RemoteConfig};
use crate::console::ConsoleSink;
use crate::level::Level;
use crate::logger::Logger;
use std::sync::{OnceLock, PoisonError, RwLock};

static GLOBAL: OnceLock<RwLock<Logger>> = OnceLock::new();

fn slot() -> &'static RwLock<Logger> {
    GLOBAL.get_or_init(|| {
        RwLock::new(
            Logger::builder()
                .level(Level::DEFAULT)
                .sink(ConsoleSink::stderr(Level::DEFAULT))
                .build(),
        )
    })
}

/// Resolve configuration and install the result as the global logger.
pub fn init(config: &Config, remote: &RemoteConfig) -> Logger {
    let logger = Logger::from_config(config, remote);
    install(logger.clone());
    logger
}

/// Replace the global logger. The previous one is flushed.
pub fn install(logger: Logger) {
    let previous = {
        let mut guard = slot().write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, logger)
    };
    previous.flush();
}

/// Current global logger; a stderr console at Info until one is installed.
pub fn get() -> Logger {
    slot().read().unwrap_or_else(PoisonError::into_inner).clone()
}
