// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Default transport behind the process-wide entry points

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use futures::FutureExt;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::Url;

use super::fetch::{FetchBody, FetchInit, FetchResource};
use super::header_names::CONTENT_TYPE;
use super::headers::{FetchHeaders, Headers};
use super::request::{
    Chunk, ClientRequest, EndArgs, ErrorListener, RequestArgs, ResponseCallback, WriteCallback,
};
use super::response::Response;
use super::{FetchEntryPoint, Scheme, StreamingEntryPoint};
use crate::error::{Error, Result};

/// Transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            proxy: None,
        }
    }
}

/// reqwest-backed implementation of the entry points
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects));

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Streaming entry point for one scheme
    pub fn streaming_entry_point(&self, scheme: Scheme) -> StreamingEntryPoint {
        let client = self.client.clone();
        Arc::new(move |args: RequestArgs| -> Box<dyn ClientRequest> {
            Box::new(ReqwestClientRequest::new(client.clone(), scheme, args))
        })
    }

    /// Fetch entry point
    pub fn fetch_entry_point(&self) -> FetchEntryPoint {
        let client = self.client.clone();
        Arc::new(move |resource: FetchResource, init: FetchInit| {
            let client = client.clone();
            async move {
                let (method, url, headers, body) = fetch_parts(resource, init)?;
                send(&client, method, url, headers, body).await
            }
            .boxed()
        })
    }
}

/// Streaming request buffered in memory and sent through reqwest on `end`
pub struct ReqwestClientRequest {
    client: Client,
    target: Result<(Method, Url, HeaderMap)>,
    body: BytesMut,
    listeners: Arc<Mutex<Vec<ErrorListener>>>,
    response_callbacks: Vec<ResponseCallback>,
    ended: bool,
}

impl ReqwestClientRequest {
    /// Resolve the call shape into a pending request
    pub fn new(client: Client, scheme: Scheme, args: RequestArgs) -> Self {
        let mut response_callbacks = Vec::new();
        let target = match args {
            RequestArgs::Options(opts) => options_target(scheme, &opts),
            RequestArgs::OptionsWithCallback(opts, callback) => {
                response_callbacks.push(callback);
                options_target(scheme, &opts)
            }
            RequestArgs::Url(url, more) => url.to_url().and_then(|url| {
                let more = more.unwrap_or_default();
                let method = parse_method(more.method.as_deref())?;
                let headers = more.headers.as_ref().map(Headers::to_header_map);
                Ok((method, url, headers.unwrap_or_default()))
            }),
        };

        Self {
            client,
            target,
            body: BytesMut::new(),
            listeners: Arc::new(Mutex::new(Vec::new())),
            response_callbacks,
            ended: false,
        }
    }

    fn report(&self, err: Error) {
        report(&self.listeners, &err);
    }
}

impl ClientRequest for ReqwestClientRequest {
    fn write(&mut self, chunk: Chunk, callback: Option<WriteCallback>) -> bool {
        if self.ended {
            self.report(Error::network("write after end"));
            return false;
        }
        match chunk.to_bytes() {
            Ok(bytes) => self.body.extend_from_slice(&bytes),
            Err(e) => {
                self.report(e);
                return false;
            }
        }
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    fn end(&mut self, args: EndArgs) {
        if self.ended {
            return;
        }
        let (chunk, callback) = args.into_parts();
        if let Some(chunk) = chunk {
            match chunk.to_bytes() {
                Ok(bytes) => self.body.extend_from_slice(&bytes),
                Err(e) => self.report(e),
            }
        }
        self.ended = true;

        let target = std::mem::replace(
            &mut self.target,
            Err(Error::network("request already sent")),
        );
        let (method, url, headers) = match target {
            Ok(target) => target,
            Err(e) => {
                self.report(e);
                return;
            }
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                self.report(Error::network("no tokio runtime to send the request on"));
                return;
            }
        };

        let client = self.client.clone();
        let body = std::mem::take(&mut self.body).freeze();
        let listeners = self.listeners.clone();
        let response_callbacks = std::mem::take(&mut self.response_callbacks);

        handle.spawn(async move {
            let body = if body.is_empty() { None } else { Some(body) };
            match send(&client, method, url, headers, body).await {
                Ok(response) => {
                    for callback in response_callbacks {
                        callback(response.clone());
                    }
                }
                Err(e) => report(&listeners, &e),
            }
        });

        if let Some(callback) = callback {
            callback();
        }
    }

    fn on_error(&mut self, listener: ErrorListener) {
        self.listeners.lock().push(listener);
    }

    fn on_response(&mut self, callback: ResponseCallback) {
        self.response_callbacks.push(callback);
    }
}

fn report(listeners: &Mutex<Vec<ErrorListener>>, err: &Error) {
    let listeners = listeners.lock();
    if listeners.is_empty() {
        tracing::debug!(error = %err, "Unhandled request error");
    }
    for listener in listeners.iter() {
        listener(err);
    }
}

fn parse_method(method: Option<&str>) -> Result<Method> {
    match method {
        Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
            .map_err(|e| Error::network(format!("invalid method {:?}: {}", m, e))),
        None => Ok(Method::GET),
    }
}

fn options_target(
    scheme: Scheme,
    opts: &super::request::RequestOptions,
) -> Result<(Method, Url, HeaderMap)> {
    let port = opts.port.map(|p| format!(":{}", p)).unwrap_or_default();
    let url = Url::parse(&format!(
        "{}://{}{}{}",
        scheme,
        opts.resolved_host(),
        port,
        opts.resolved_path()
    ))?;
    let method = parse_method(opts.method.as_deref())?;
    let headers = opts
        .headers
        .as_ref()
        .map(Headers::to_header_map)
        .unwrap_or_default();
    Ok((method, url, headers))
}

fn fetch_parts(
    resource: FetchResource,
    init: FetchInit,
) -> Result<(Method, Url, HeaderMap, Option<Bytes>)> {
    let (default_method, url, mut headers, resource_body) = match resource {
        FetchResource::Str(s) => ("GET".to_string(), Url::parse(&s)?, FetchHeaders::new(), None),
        FetchResource::Url(url) => ("GET".to_string(), url, FetchHeaders::new(), None),
        FetchResource::Request(req) => (
            req.method.clone(),
            Url::parse(&req.url)?,
            FetchHeaders::from(&req.headers),
            req.body.clone(),
        ),
    };

    if let Some(ref extra) = init.headers {
        headers.merge_from(extra);
    }

    let method = parse_method(Some(init.method.as_deref().unwrap_or(&default_method)))?;

    let mut map = headers.to_header_map();

    if matches!(init.body, Some(FetchBody::Json(_))) && !map.contains_key(CONTENT_TYPE) {
        map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    let body = init.body.as_ref().map(FetchBody::to_bytes).or(resource_body);
    Ok((method, url, map, body))
}

async fn send(
    client: &Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
) -> Result<Response> {
    let start = Instant::now();

    let mut builder = client.request(method, url).headers(headers);
    if let Some(body) = body {
        builder = builder.body(body);
    }

    let response = builder.send().await?;
    let final_url = response.url().clone();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    Ok(Response::new(
        status,
        headers,
        body,
        final_url,
        start.elapsed().as_millis() as u64,
    ))
}
