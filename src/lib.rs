// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # outlogger - Outgoing request logging
//!
//! One call at startup and every outgoing HTTP(S) and fetch call made
//! through the process's entry points gets a log line on stderr:
//!
//! ```text
//! POST http://api.example.com/users - Body: {"name":"a"}
//! GET https://x.test/a?x=1 - Headers: {}
//! ```
//!
//! Requests are never delayed, altered or blocked. The wrappers call the
//! real entry point first and only observe what passes through.
//!
//! ## Example
//!
//! ```rust,no_run
//! use outlogger::{FetchInit, LoggerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     outlogger::start(LoggerConfig::new().body(true).headers(true));
//!
//!     let response = outlogger::fetch("https://example.com/", FetchInit::new()).await?;
//!     println!("{}", response.status_code());
//!
//!     outlogger::stop();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod network;

// Configuration
pub use config::{ActiveOptions, LoggerConfig};

// Errors
pub use error::{Error, Result};

// Instrumented surface
pub use http::{
    Chunk, ClientRequest, Encoding, EndArgs, FetchBody, FetchEntryPoint, FetchFuture, FetchInit,
    FetchResource, FormData, Headers, HttpTransport, RequestArgs, RequestLike, RequestOptions,
    Response, Scheme, StreamingEntryPoint, UrlArg,
};

// Engine
pub use network::{
    EntryPointTable, InterceptionTable, LogSink, MemorySink, NormalizedRequest, StderrSink,
};

// Lifecycle
pub use logger::{init_diagnostics, is_active, start, stop, OutLogger};

/// Issue a fetch through the process-wide entry point
pub fn fetch(resource: impl Into<FetchResource>, init: FetchInit) -> FetchFuture {
    use futures::FutureExt;

    match network::global_table().fetch() {
        Some(entry) => entry(resource.into(), init),
        None => futures::future::ready(Err(Error::network("fetch is not available"))).boxed(),
    }
}

/// outlogger version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
