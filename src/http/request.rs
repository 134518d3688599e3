// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Streaming-style request calls and the handle they return

use std::fmt;

use base64::Engine;
use bytes::Bytes;
use url::Url;

use super::headers::Headers;
use super::response::Response;
use crate::error::{Error, Result};

/// Called once with the response
pub type ResponseCallback = Box<dyn FnOnce(Response) + Send>;
/// Called once a chunk has been handed to the transport
pub type WriteCallback = Box<dyn FnOnce() + Send>;
/// Called once the body has been fully handed to the transport
pub type EndCallback = Box<dyn FnOnce() + Send>;
/// Called for every error the request reports
pub type ErrorListener = Box<dyn Fn(&Error) + Send + Sync>;

/// Options object accepted by a streaming entry point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Request method
    pub method: Option<String>,
    /// Host, used when `hostname` is absent
    pub host: Option<String>,
    /// Hostname
    pub hostname: Option<String>,
    /// Port
    pub port: Option<u16>,
    /// Path, possibly with a query string
    pub path: Option<String>,
    /// Request headers
    pub headers: Option<Headers>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set hostname
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name, value);
        self
    }

    /// `hostname`, else `host`, else `localhost`
    pub fn resolved_host(&self) -> &str {
        self.hostname
            .as_deref()
            .or(self.host.as_deref())
            .unwrap_or("localhost")
    }

    /// Path, defaulting to `/`
    pub fn resolved_path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }
}

/// A bare URL argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlArg {
    /// URL string, parsed on use
    Str(String),
    /// Already-parsed URL
    Parsed(Url),
}

impl UrlArg {
    /// Parse into a URL
    pub fn to_url(&self) -> Result<Url> {
        match self {
            UrlArg::Str(s) => Ok(Url::parse(s)?),
            UrlArg::Parsed(url) => Ok(url.clone()),
        }
    }
}

impl From<&str> for UrlArg {
    fn from(s: &str) -> Self {
        UrlArg::Str(s.to_string())
    }
}

impl From<String> for UrlArg {
    fn from(s: String) -> Self {
        UrlArg::Str(s)
    }
}

impl From<Url> for UrlArg {
    fn from(url: Url) -> Self {
        UrlArg::Parsed(url)
    }
}

/// Arguments of one streaming entry point call, one variant per calling convention
pub enum RequestArgs {
    /// `(options)`
    Options(RequestOptions),
    /// `(options, callback)`
    OptionsWithCallback(RequestOptions, ResponseCallback),
    /// `(url)` or `(url, moreOptions)`
    Url(UrlArg, Option<RequestOptions>),
}

impl RequestArgs {
    /// `(options)` call
    pub fn options(options: RequestOptions) -> Self {
        RequestArgs::Options(options)
    }

    /// `(url, moreOptions)` call
    pub fn url(url: impl Into<UrlArg>, more: Option<RequestOptions>) -> Self {
        RequestArgs::Url(url.into(), more)
    }
}

impl fmt::Debug for RequestArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestArgs::Options(opts) => f.debug_tuple("Options").field(opts).finish(),
            RequestArgs::OptionsWithCallback(opts, _) => f
                .debug_tuple("OptionsWithCallback")
                .field(opts)
                .field(&"<callback>")
                .finish(),
            RequestArgs::Url(url, more) => f.debug_tuple("Url").field(url).field(more).finish(),
        }
    }
}

/// Text encoding of a string chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Base64,
    Hex,
}

/// One piece of a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Raw bytes
    Bytes(Bytes),
    /// Text with an encoding
    Text { data: String, encoding: Encoding },
}

impl Chunk {
    /// Text chunk with explicit encoding
    pub fn encoded(data: impl Into<String>, encoding: Encoding) -> Self {
        Chunk::Text {
            data: data.into(),
            encoding,
        }
    }

    /// Decode into bytes
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Chunk::Bytes(bytes) => Ok(bytes.clone()),
            Chunk::Text { data, encoding } => match encoding {
                Encoding::Utf8 => Ok(Bytes::copy_from_slice(data.as_bytes())),
                // latin1 keeps the low byte of each code point
                Encoding::Latin1 => Ok(data.chars().map(|c| c as u32 as u8).collect()),
                Encoding::Base64 => base64::engine::general_purpose::STANDARD
                    .decode(data)
                    .map(Bytes::from)
                    .map_err(|e| Error::chunk(format!("base64: {}", e))),
                Encoding::Hex => hex::decode(data)
                    .map(Bytes::from)
                    .map_err(|e| Error::chunk(format!("hex: {}", e))),
            },
        }
    }

    /// Whether the chunk carries no data
    pub fn is_empty(&self) -> bool {
        match self {
            Chunk::Bytes(bytes) => bytes.is_empty(),
            Chunk::Text { data, .. } => data.is_empty(),
        }
    }
}

impl From<&str> for Chunk {
    fn from(s: &str) -> Self {
        Chunk::encoded(s, Encoding::Utf8)
    }
}

impl From<String> for Chunk {
    fn from(s: String) -> Self {
        Chunk::encoded(s, Encoding::Utf8)
    }
}

impl From<Bytes> for Chunk {
    fn from(bytes: Bytes) -> Self {
        Chunk::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(bytes: Vec<u8>) -> Self {
        Chunk::Bytes(Bytes::from(bytes))
    }
}

/// Arguments of an `end` call
pub enum EndArgs {
    /// `end()`
    Empty,
    /// `end(chunk)`
    Chunk(Chunk),
    /// `end(chunk, callback)`
    ChunkWithCallback(Chunk, EndCallback),
    /// `end(callback)`, callback first and no final chunk
    Callback(EndCallback),
}

impl EndArgs {
    /// Final chunk, if any
    pub fn chunk(&self) -> Option<&Chunk> {
        match self {
            EndArgs::Chunk(chunk) | EndArgs::ChunkWithCallback(chunk, _) => Some(chunk),
            EndArgs::Empty | EndArgs::Callback(_) => None,
        }
    }

    /// Split into final chunk and callback
    pub fn into_parts(self) -> (Option<Chunk>, Option<EndCallback>) {
        match self {
            EndArgs::Empty => (None, None),
            EndArgs::Chunk(chunk) => (Some(chunk), None),
            EndArgs::ChunkWithCallback(chunk, cb) => (Some(chunk), Some(cb)),
            EndArgs::Callback(cb) => (None, Some(cb)),
        }
    }
}

impl fmt::Debug for EndArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndArgs::Empty => f.write_str("Empty"),
            EndArgs::Chunk(chunk) => f.debug_tuple("Chunk").field(chunk).finish(),
            EndArgs::ChunkWithCallback(chunk, _) => f
                .debug_tuple("ChunkWithCallback")
                .field(chunk)
                .field(&"<callback>")
                .finish(),
            EndArgs::Callback(_) => f.write_str("Callback(<callback>)"),
        }
    }
}

/// Handle returned by a streaming entry point.
///
/// The body is written incrementally; the request is complete once `end`
/// has been called. Implementations must not block in any of these.
pub trait ClientRequest: Send {
    /// Hand a chunk to the transport.
    ///
    /// Returns `false` when the caller should wait before writing more.
    fn write(&mut self, chunk: Chunk, callback: Option<WriteCallback>) -> bool;

    /// Finish the body
    fn end(&mut self, args: EndArgs);

    /// Register an error listener; listeners accumulate
    fn on_error(&mut self, listener: ErrorListener);

    /// Register a response callback
    fn on_response(&mut self, callback: ResponseCallback);
}
