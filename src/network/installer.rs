// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Installs and removes the logging wrappers
//!
//! UNINSTALLED -> `install` -> INSTALLED -> `uninstall` -> UNINSTALLED.
//! Installation is atomic: if any entry point refuses its wrapper, the ones
//! already patched are put back before the error is returned.

use std::sync::Arc;

use super::capture::TappedRequest;
use super::format::{format_line, render_fetch_body, LogSink};
use super::normalize::{normalize_fetch, normalize_streaming};
use super::table::InterceptionTable;
use crate::config::ActiveOptions;
use crate::error::{Error, Result};
use crate::http::{
    ClientRequest, FetchEntryPoint, FetchInit, FetchResource, RequestArgs, Scheme,
    StreamingEntryPoint,
};

const STREAMING_SCHEMES: [Scheme; 2] = [Scheme::Http, Scheme::Https];

/// Result of an `install` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Wrappers are now in place
    Installed,
    /// Wrappers were already in place; nothing changed
    AlreadyInstalled,
}

/// Entry points as they were before installation
struct Originals {
    http: StreamingEntryPoint,
    https: StreamingEntryPoint,
    fetch: Option<FetchEntryPoint>,
}

impl Originals {
    fn streaming(&self, scheme: Scheme) -> &StreamingEntryPoint {
        match scheme {
            Scheme::Http => &self.http,
            Scheme::Https => &self.https,
        }
    }
}

/// Owns the installed/uninstalled state for one table
pub struct Installer {
    table: Arc<dyn InterceptionTable>,
    sink: Arc<dyn LogSink>,
    originals: Option<Originals>,
}

impl Installer {
    /// Create an installer over a table, writing lines to `sink`
    pub fn new(table: Arc<dyn InterceptionTable>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            table,
            sink,
            originals: None,
        }
    }

    /// Whether wrappers are currently installed
    pub fn is_installed(&self) -> bool {
        self.originals.is_some()
    }

    /// Replace every entry point with a logging wrapper
    pub fn install(&mut self, options: ActiveOptions) -> Result<InstallOutcome> {
        if self.is_installed() {
            tracing::warn!("Already initialized");
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let originals = Originals {
            http: self.table.streaming(Scheme::Http),
            https: self.table.streaming(Scheme::Https),
            fetch: if self.table.has_fetch() {
                self.table.fetch()
            } else {
                None
            },
        };

        if originals.fetch.is_none() {
            tracing::warn!("fetch is not available, skipping fetch interception");
        }

        if let Err(e) = self.patch(&originals, options) {
            if let Err(rollback) = self.restore(&originals) {
                tracing::error!(error = %rollback, "Rollback after failed install also failed");
            }
            return Err(e);
        }

        self.originals = Some(originals);
        Ok(InstallOutcome::Installed)
    }

    /// Put the captured originals back.
    ///
    /// Returns `false` when nothing was installed.
    pub fn uninstall(&mut self) -> Result<bool> {
        match self.originals.take() {
            Some(originals) => {
                self.restore(&originals)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn patch(&self, originals: &Originals, options: ActiveOptions) -> Result<()> {
        for scheme in STREAMING_SCHEMES {
            let wrapper = wrap_streaming(
                scheme,
                originals.streaming(scheme).clone(),
                options,
                self.sink.clone(),
            );
            self.table.set_streaming(scheme, wrapper)?;
        }

        if let Some(ref fetch) = originals.fetch {
            let wrapper = wrap_fetch(fetch.clone(), options, self.sink.clone());
            self.table.set_fetch(wrapper)?;
        }
        Ok(())
    }

    /// Restore every slot, attempting all of them even if one fails
    fn restore(&self, originals: &Originals) -> Result<()> {
        let mut failures = Vec::new();

        for scheme in STREAMING_SCHEMES {
            if let Err(e) = self
                .table
                .set_streaming(scheme, originals.streaming(scheme).clone())
            {
                failures.push(format!("{}: {}", scheme, e));
            }
        }
        if let Some(ref fetch) = originals.fetch {
            if let Err(e) = self.table.set_fetch(fetch.clone()) {
                failures.push(format!("fetch: {}", e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::install(failures.join("; ")))
        }
    }
}

/// Wrap a streaming entry point.
///
/// The original is always called, with the caller's arguments, and its
/// handle is returned. Normalization only borrows the arguments.
pub fn wrap_streaming(
    scheme: Scheme,
    original: StreamingEntryPoint,
    options: ActiveOptions,
    sink: Arc<dyn LogSink>,
) -> StreamingEntryPoint {
    Arc::new(move |args: RequestArgs| -> Box<dyn ClientRequest> {
        let normalized = normalize_streaming(scheme, &args, options);
        let handle = original(args);

        match normalized {
            Ok(request) if options.logs_body_for(&request.method) => {
                Box::new(TappedRequest::new(handle, request, options, sink.clone()))
            }
            Ok(request) => {
                sink.write(&format_line(&request, None, options));
                handle
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not describe outgoing request");
                handle
            }
        }
    })
}

/// Wrap a fetch entry point; the line is written before the original is called
pub fn wrap_fetch(
    original: FetchEntryPoint,
    options: ActiveOptions,
    sink: Arc<dyn LogSink>,
) -> FetchEntryPoint {
    Arc::new(move |resource: FetchResource, init: FetchInit| {
        match normalize_fetch(&resource, &init, options) {
            Ok(request) => {
                let body = init.body.as_ref().and_then(render_fetch_body);
                sink.write(&format_line(&request, body.as_deref(), options));
            }
            Err(e) => tracing::warn!(error = %e, "Could not describe outgoing fetch"),
        }
        original(resource, init)
    })
}
