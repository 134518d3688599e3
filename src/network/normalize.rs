// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Call-shape normalization
//!
//! Every calling convention an entry point accepts is reduced here to one
//! [`NormalizedRequest`]. Nothing past this module branches on call shape.

use serde_json::{Map, Value};
use url::Url;

use crate::config::ActiveOptions;
use crate::error::{Error, Result};
use crate::http::{
    FetchHeaders, FetchInit, FetchResource, RequestArgs, RequestOptions, Scheme, UrlArg,
};

/// Uniform view of one outgoing request, built per call and dropped after logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Upper-cased method
    pub method: String,
    /// Scheme label without `://`
    pub scheme: String,
    /// Host without port
    pub host: String,
    /// `:<port>` or empty
    pub port: String,
    /// Path; carries `?query` only when params are logged
    pub path: String,
    /// Header mapping as it will be rendered
    pub headers: Map<String, Value>,
}

/// Shape of a streaming call's arguments
enum CallShape<'a> {
    Options(&'a RequestOptions),
    Url(&'a UrlArg, Option<&'a RequestOptions>),
}

impl<'a> From<&'a RequestArgs> for CallShape<'a> {
    fn from(args: &'a RequestArgs) -> Self {
        match args {
            RequestArgs::Options(opts) | RequestArgs::OptionsWithCallback(opts, _) => {
                CallShape::Options(opts)
            }
            RequestArgs::Url(url, more) => CallShape::Url(url, more.as_ref()),
        }
    }
}

/// Normalize a streaming entry point call
pub fn normalize_streaming(
    scheme: Scheme,
    args: &RequestArgs,
    options: ActiveOptions,
) -> Result<NormalizedRequest> {
    match CallShape::from(args) {
        CallShape::Options(opts) => {
            let path = if options.log_params {
                opts.resolved_path().to_string()
            } else {
                strip_query(opts.resolved_path()).to_string()
            };

            Ok(NormalizedRequest {
                method: upper_method(opts.method.as_deref()),
                scheme: scheme.to_string(),
                host: opts.resolved_host().to_string(),
                port: opts.port.map(|p| format!(":{}", p)).unwrap_or_default(),
                path,
                headers: opts
                    .headers
                    .as_ref()
                    .map(|h| h.to_json_map())
                    .unwrap_or_default(),
            })
        }
        // A bare URL carries no method or headers; those come from the second argument
        CallShape::Url(url, more) => {
            let url = url.to_url()?;
            let (host, port, path) = url_parts(&url, options)?;
            Ok(NormalizedRequest {
                method: upper_method(more.and_then(|m| m.method.as_deref())),
                scheme: scheme.to_string(),
                host,
                port,
                path,
                headers: more
                    .and_then(|m| m.headers.as_ref())
                    .map(|h| h.to_json_map())
                    .unwrap_or_default(),
            })
        }
    }
}

/// Normalize a fetch call.
///
/// An init method overrides a request object's method, and init headers are
/// set on top of the request object's own headers.
pub fn normalize_fetch(
    resource: &FetchResource,
    init: &FetchInit,
    options: ActiveOptions,
) -> Result<NormalizedRequest> {
    let (url, resource_method, mut headers) = match resource {
        FetchResource::Str(s) => (Url::parse(s)?, None, FetchHeaders::new()),
        FetchResource::Url(url) => (url.clone(), None, FetchHeaders::new()),
        FetchResource::Request(req) => (
            Url::parse(&req.url)?,
            Some(req.method.as_str()),
            FetchHeaders::from(&req.headers),
        ),
    };

    if let Some(ref extra) = init.headers {
        headers.merge_from(extra);
    }

    let (host, port, path) = url_parts(&url, options)?;
    Ok(NormalizedRequest {
        method: upper_method(init.method.as_deref().or(resource_method)),
        scheme: url.scheme().to_string(),
        host,
        port,
        path,
        headers: headers.to_json_map(),
    })
}

fn upper_method(method: Option<&str>) -> String {
    match method {
        Some(m) if !m.is_empty() => m.to_ascii_uppercase(),
        _ => "GET".to_string(),
    }
}

fn strip_query(path: &str) -> &str {
    path.split_once('?').map(|(p, _)| p).unwrap_or(path)
}

fn url_parts(url: &Url, options: ActiveOptions) -> Result<(String, String, String)> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::network(format!("URL has no host: {}", url)))?
        .to_string();
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();

    let mut path = url.path().to_string();
    if options.log_params {
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            path.push('?');
            path.push_str(query);
        }
    }
    Ok((host, port, path))
}
