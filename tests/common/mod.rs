// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared fakes for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use outlogger::http::{ErrorListener, ResponseCallback, WriteCallback};
use outlogger::{
    Chunk, ClientRequest, EndArgs, EntryPointTable, FetchEntryPoint, FetchInit, FetchResource,
    RequestArgs, Response, StreamingEntryPoint,
};

/// Everything the fake transport observed
#[derive(Debug, Default)]
pub struct Observed {
    pub issued: Vec<String>,
    pub written: Vec<Bytes>,
    pub ended: usize,
    pub fetched: usize,
}

pub type Shared = Arc<Mutex<Observed>>;

/// Fake handle; `write` answers `accept`
pub struct FakeRequest {
    observed: Shared,
    accept: bool,
}

impl ClientRequest for FakeRequest {
    fn write(&mut self, chunk: Chunk, callback: Option<WriteCallback>) -> bool {
        if let Ok(bytes) = chunk.to_bytes() {
            self.observed.lock().written.push(bytes);
        }
        if let Some(callback) = callback {
            callback();
        }
        self.accept
    }

    fn end(&mut self, args: EndArgs) {
        let (chunk, callback) = args.into_parts();
        {
            let mut observed = self.observed.lock();
            if let Some(bytes) = chunk.and_then(|c| c.to_bytes().ok()) {
                observed.written.push(bytes);
            }
            observed.ended += 1;
        }
        if let Some(callback) = callback {
            callback();
        }
    }

    fn on_error(&mut self, _listener: ErrorListener) {}

    fn on_response(&mut self, _callback: ResponseCallback) {}
}

pub fn streaming_entry(observed: Shared, accept: bool) -> StreamingEntryPoint {
    Arc::new(move |args: RequestArgs| -> Box<dyn ClientRequest> {
        observed.lock().issued.push(format!("{:?}", args));
        Box::new(FakeRequest {
            observed: observed.clone(),
            accept,
        })
    })
}

pub fn fetch_entry(observed: Shared) -> FetchEntryPoint {
    Arc::new(move |_: FetchResource, _: FetchInit| {
        observed.lock().fetched += 1;
        async {
            let url = Url::parse("https://x.test/")?;
            Ok::<_, outlogger::Error>(Response::new(
                StatusCode::OK,
                HeaderMap::new(),
                Bytes::new(),
                url,
                1,
            ))
        }
        .boxed()
    })
}

/// Table over fake entry points, plus what they observe
pub fn fake_table(with_fetch: bool) -> (Arc<EntryPointTable>, Shared) {
    let observed: Shared = Arc::new(Mutex::new(Observed::default()));
    let table = EntryPointTable::new(
        streaming_entry(observed.clone(), true),
        streaming_entry(observed.clone(), true),
        with_fetch.then(|| fetch_entry(observed.clone())),
    );
    (Arc::new(table), observed)
}
