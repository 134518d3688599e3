// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Activation facade
//!
//! `start` and `stop` are the whole public lifecycle. Transitions are
//! serialized by a mutex; wrapped calls never touch it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LoggerConfig;
use crate::network::{
    global_table, InstallOutcome, Installer, InterceptionTable, LogSink, StderrSink,
};

/// Process-wide on/off switch over one entry point table
pub struct OutLogger {
    installer: Mutex<Installer>,
}

impl OutLogger {
    /// Create a logger over `table`, writing lines to `sink`
    pub fn new(table: Arc<dyn InterceptionTable>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            installer: Mutex::new(Installer::new(table, sink)),
        }
    }

    /// Install the logging wrappers.
    ///
    /// Does nothing when `config.enable` is false or wrappers are already
    /// installed. Installation failures are reported, never returned.
    pub fn start(&self, config: LoggerConfig) {
        if !config.enable {
            return;
        }

        let options = config.active_options();
        match self.installer.lock().install(options) {
            Ok(InstallOutcome::Installed) => {
                tracing::debug!(
                    params = options.log_params,
                    body = options.log_body,
                    headers = options.log_headers,
                    "Outgoing request logging enabled"
                );
            }
            Ok(InstallOutcome::AlreadyInstalled) => {}
            Err(e) => tracing::error!(error = %e, "Error while initializing"),
        }
    }

    /// Restore the original entry points; a no-op when not started
    pub fn stop(&self) {
        match self.installer.lock().uninstall() {
            Ok(true) => tracing::debug!("Outgoing request logging disabled"),
            Ok(false) => {}
            Err(e) => tracing::error!(error = %e, "Error while restoring entry points"),
        }
    }

    /// Whether wrappers are installed
    pub fn is_active(&self) -> bool {
        self.installer.lock().is_installed()
    }
}

lazy_static::lazy_static! {
    static ref PROCESS_LOGGER: OutLogger = OutLogger::new(global_table(), Arc::new(StderrSink));
}

/// Start logging outgoing calls made through this process's entry points
pub fn start(config: LoggerConfig) {
    PROCESS_LOGGER.start(config);
}

/// Stop logging and restore the original entry points
pub fn stop() {
    PROCESS_LOGGER.stop();
}

/// Whether the process-wide logger is active
pub fn is_active() -> bool {
    PROCESS_LOGGER.is_active()
}

/// Send diagnostics to stderr through `tracing-subscriber`.
///
/// Honors `RUST_LOG`, defaulting to `outlogger=info`. Safe to call when a
/// subscriber is already set.
pub fn init_diagnostics() {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "outlogger=info"
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
    );
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RequestArgs, RequestOptions, Scheme};
    use crate::network::testing::FakeTable;
    use crate::network::MemorySink;

    fn logger() -> (OutLogger, Arc<FakeTable>, Arc<MemorySink>) {
        let table = Arc::new(FakeTable::new(true));
        let sink = Arc::new(MemorySink::new());
        (OutLogger::new(table.clone(), sink.clone()), table, sink)
    }

    #[test]
    fn test_start_twice_patches_once() {
        let (logger, table, sink) = logger();
        logger.start(LoggerConfig::default());
        logger.start(LoggerConfig::default());
        assert_eq!(table.set_calls(), 3);

        let entry = table.streaming(Scheme::Http);
        let _handle = entry(RequestArgs::options(RequestOptions::new().host("a.test")));
        assert_eq!(sink.lines(), vec!["GET http://a.test/"]);
    }

    #[test]
    fn test_disabled_start_is_noop() {
        let (logger, table, _sink) = logger();
        logger.start(LoggerConfig::new().enable(false));
        assert!(!logger.is_active());
        assert_eq!(table.set_calls(), 0);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let (logger, table, _sink) = logger();
        let (http, _, _) = table.current();
        logger.stop();
        assert!(!logger.is_active());
        assert_eq!(table.set_calls(), 0);
        assert!(Arc::ptr_eq(&table.streaming(Scheme::Http), &http));
    }

    #[test]
    fn test_restart_recaptures_baseline() {
        let (logger, table, sink) = logger();
        logger.start(LoggerConfig::default());
        logger.stop();
        logger.start(LoggerConfig::new().params(true));

        let entry = table.streaming(Scheme::Https);
        let opts = RequestOptions::new().host("a.test").path("/s?q=1");
        let _handle = entry(RequestArgs::options(opts));

        // one wrapper layer: exactly one line
        assert_eq!(sink.lines(), vec!["GET https://a.test/s?q=1"]);
    }
}
