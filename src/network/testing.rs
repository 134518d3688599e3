// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fakes for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use super::table::InterceptionTable;
use crate::error::{Error, Result};
use crate::http::{
    Chunk, ClientRequest, EndArgs, ErrorListener, FetchEntryPoint, FetchInit, FetchResource,
    RequestArgs, Response, ResponseCallback, Scheme, StreamingEntryPoint, WriteCallback,
};

/// What a [`RecordingRequest`] saw
#[derive(Debug, Default)]
pub struct Record {
    pub writes: Vec<Bytes>,
    pub write_calls: usize,
    pub end_chunk: Option<Bytes>,
    pub ends: usize,
    pub error_listeners: usize,
}

/// Handle that records every call and answers `write` with a fixed value
pub struct RecordingRequest {
    record: Arc<Mutex<Record>>,
    accept: bool,
}

impl RecordingRequest {
    pub fn new(accept: bool) -> (Self, Arc<Mutex<Record>>) {
        let record = Arc::new(Mutex::new(Record::default()));
        (
            Self {
                record: record.clone(),
                accept,
            },
            record,
        )
    }
}

impl ClientRequest for RecordingRequest {
    fn write(&mut self, chunk: Chunk, callback: Option<WriteCallback>) -> bool {
        let mut record = self.record.lock();
        record.write_calls += 1;
        if let Ok(bytes) = chunk.to_bytes() {
            record.writes.push(bytes);
        }
        drop(record);
        if let Some(callback) = callback {
            callback();
        }
        self.accept
    }

    fn end(&mut self, args: EndArgs) {
        let (chunk, callback) = args.into_parts();
        {
            let mut record = self.record.lock();
            record.ends += 1;
            record.end_chunk = chunk.and_then(|c| c.to_bytes().ok());
        }
        if let Some(callback) = callback {
            callback();
        }
    }

    fn on_error(&mut self, _listener: ErrorListener) {
        self.record.lock().error_listeners += 1;
    }

    fn on_response(&mut self, _callback: ResponseCallback) {}
}

/// Table of fake entry points that counts patches and issued requests
pub struct FakeTable {
    http: RwLock<StreamingEntryPoint>,
    https: RwLock<StreamingEntryPoint>,
    fetch: RwLock<Option<FetchEntryPoint>>,
    set_calls: AtomicUsize,
    issued: Arc<AtomicUsize>,
    refused: Mutex<Option<Scheme>>,
}

impl FakeTable {
    pub fn new(with_fetch: bool) -> Self {
        let issued = Arc::new(AtomicUsize::new(0));
        let fetch: Option<FetchEntryPoint> = if with_fetch {
            Some(Arc::new(|_: FetchResource, _: FetchInit| {
                async {
                    let url = Url::parse("http://fake.test/")?;
                    Ok::<_, Error>(Response::new(
                        StatusCode::OK,
                        HeaderMap::new(),
                        Bytes::new(),
                        url,
                        0,
                    ))
                }
                .boxed()
            }))
        } else {
            None
        };

        Self {
            http: RwLock::new(recording_entry(issued.clone())),
            https: RwLock::new(recording_entry(issued.clone())),
            fetch: RwLock::new(fetch),
            set_calls: AtomicUsize::new(0),
            issued,
            refused: Mutex::new(None),
        }
    }

    /// Make `set_streaming` fail for a scheme
    pub fn refuse(&self, scheme: Scheme) {
        *self.refused.lock() = Some(scheme);
    }

    pub fn current(
        &self,
    ) -> (StreamingEntryPoint, StreamingEntryPoint, Option<FetchEntryPoint>) {
        (
            self.streaming(Scheme::Http),
            self.streaming(Scheme::Https),
            self.fetch(),
        )
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    fn slot(&self, scheme: Scheme) -> &RwLock<StreamingEntryPoint> {
        match scheme {
            Scheme::Http => &self.http,
            Scheme::Https => &self.https,
        }
    }
}

fn recording_entry(issued: Arc<AtomicUsize>) -> StreamingEntryPoint {
    Arc::new(move |_: RequestArgs| -> Box<dyn ClientRequest> {
        issued.fetch_add(1, Ordering::SeqCst);
        Box::new(RecordingRequest::new(true).0)
    })
}

impl InterceptionTable for FakeTable {
    fn streaming(&self, scheme: Scheme) -> StreamingEntryPoint {
        self.slot(scheme).read().clone()
    }

    fn set_streaming(&self, scheme: Scheme, entry: StreamingEntryPoint) -> Result<()> {
        if *self.refused.lock() == Some(scheme) {
            return Err(Error::install(format!("{} slot is sealed", scheme)));
        }
        *self.slot(scheme).write() = entry;
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn fetch(&self) -> Option<FetchEntryPoint> {
        self.fetch.read().clone()
    }

    fn set_fetch(&self, entry: FetchEntryPoint) -> Result<()> {
        *self.fetch.write() = Some(entry);
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
