// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The instrumented request surface
//!
//! Two streaming-style entry points (one per scheme) and one promise-style
//! fetch entry point. Application code issues requests through
//! [`request`], [`https::request`] and [`crate::fetch`]; those dispatch to
//! whatever implementation the process-wide table currently holds.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

mod client;
mod fetch;
mod headers;
mod request;
mod response;

pub use client::{HttpTransport, ReqwestClientRequest, TransportConfig};
pub use fetch::{FetchBody, FetchInit, FetchResource, FormData, FormValue, RequestLike};
pub use headers::{FetchHeaders, Headers};
pub use request::{
    Chunk, ClientRequest, Encoding, EndArgs, EndCallback, ErrorListener, RequestArgs,
    RequestOptions, ResponseCallback, UrlArg, WriteCallback,
};
pub use response::Response;

use crate::error::Result;
use crate::network::{global_table, InterceptionTable};

/// Future returned by a fetch entry point
pub type FetchFuture = BoxFuture<'static, Result<Response>>;

/// A streaming-style entry point
pub type StreamingEntryPoint = Arc<dyn Fn(RequestArgs) -> Box<dyn ClientRequest> + Send + Sync>;

/// A promise-style fetch entry point
pub type FetchEntryPoint = Arc<dyn Fn(FetchResource, FetchInit) -> FetchFuture + Send + Sync>;

/// Scheme label of a streaming entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Lower-case scheme name
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue a plain-HTTP request through the process-wide entry point
pub fn request(args: RequestArgs) -> Box<dyn ClientRequest> {
    let entry = global_table().streaming(Scheme::Http);
    entry(args)
}

/// HTTPS entry point
pub mod https {
    use super::{global_table, ClientRequest, InterceptionTable, RequestArgs, Scheme};

    /// Issue an HTTPS request through the process-wide entry point
    pub fn request(args: RequestArgs) -> Box<dyn ClientRequest> {
        let entry = global_table().streaming(Scheme::Https);
        entry(args)
    }
}

/// Common HTTP header names
pub mod header_names {
    pub const CONTENT_TYPE: &str = "content-type";
}
