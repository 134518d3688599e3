// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Body capture for streaming requests

use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use super::format::{compact_body, format_line, LogSink};
use super::normalize::NormalizedRequest;
use crate::config::ActiveOptions;
use crate::error::Result;
use crate::http::{
    Chunk, ClientRequest, EndArgs, ErrorListener, ResponseCallback, WriteCallback,
};

/// Chunks written to one in-flight request, in order
#[derive(Debug, Default)]
pub struct BodyAccumulator {
    chunks: Vec<Bytes>,
}

impl BodyAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a chunk; empty chunks are skipped
    pub fn push(&mut self, chunk: &Chunk) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        self.chunks.push(chunk.to_bytes()?);
        Ok(())
    }

    /// Number of buffered chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing has been buffered
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenate into one string (lossy UTF-8)
    pub fn finish(self) -> String {
        let mut body = BytesMut::with_capacity(self.chunks.iter().map(Bytes::len).sum());
        for chunk in self.chunks {
            body.extend_from_slice(&chunk);
        }
        String::from_utf8_lossy(&body).into_owned()
    }
}

/// Line waiting for the end of the body
struct PendingLine {
    request: NormalizedRequest,
    options: ActiveOptions,
    sink: Arc<dyn LogSink>,
}

/// Handle that buffers the body on its way through to the real handle.
///
/// Every call is forwarded unchanged, and `write` returns exactly what the
/// inner handle returns. The log line is emitted once, at `end`, before
/// the inner `end` runs.
pub struct TappedRequest {
    inner: Box<dyn ClientRequest>,
    accumulator: Option<BodyAccumulator>,
    pending: Option<PendingLine>,
}

impl TappedRequest {
    /// Wrap a freshly issued handle
    pub fn new(
        mut inner: Box<dyn ClientRequest>,
        request: NormalizedRequest,
        options: ActiveOptions,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        let target = format!("{}://{}{}{}", request.scheme, request.host, request.port, request.path);
        inner.on_error(Box::new(move |err: &crate::error::Error| {
            tracing::error!(url = %target, error = %err, "Error in request");
        }));

        Self {
            inner,
            accumulator: Some(BodyAccumulator::new()),
            pending: Some(PendingLine {
                request,
                options,
                sink,
            }),
        }
    }

    fn collect(&mut self, chunk: Option<&Chunk>) {
        let (Some(acc), Some(chunk)) = (self.accumulator.as_mut(), chunk) else {
            return;
        };
        if let Err(e) = acc.push(chunk) {
            tracing::warn!(error = %e, "Failed to buffer chunk");
        }
    }

    fn flush(&mut self) {
        let (Some(acc), Some(pending)) = (self.accumulator.take(), self.pending.take()) else {
            return;
        };
        let body = compact_body(&acc.finish());
        let line = format_line(&pending.request, Some(&body), pending.options);
        pending.sink.write(&line);
    }
}

impl ClientRequest for TappedRequest {
    fn write(&mut self, chunk: Chunk, callback: Option<WriteCallback>) -> bool {
        self.collect(Some(&chunk));
        self.inner.write(chunk, callback)
    }

    fn end(&mut self, args: EndArgs) {
        self.collect(args.chunk());
        self.flush();
        self.inner.end(args);
    }

    fn on_error(&mut self, listener: ErrorListener) {
        self.inner.on_error(listener);
    }

    fn on_response(&mut self, callback: ResponseCallback) {
        self.inner.on_response(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Encoding;
    use crate::network::format::MemorySink;
    use crate::network::testing::RecordingRequest;

    fn post() -> NormalizedRequest {
        NormalizedRequest {
            method: "POST".to_string(),
            scheme: "http".to_string(),
            host: "api.example.com".to_string(),
            port: String::new(),
            path: "/users".to_string(),
            headers: Default::default(),
        }
    }

    fn body_only() -> ActiveOptions {
        ActiveOptions {
            log_body: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_accumulator_concatenates() {
        let mut acc = BodyAccumulator::new();
        acc.push(&Chunk::from("{\"na")).unwrap();
        acc.push(&Chunk::from("")).unwrap();
        acc.push(&Chunk::encoded("6d65223a2261227d", Encoding::Hex)).unwrap();
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.finish(), r#"{"name":"a"}"#);
    }

    #[test]
    fn test_tap_logs_on_end_and_forwards() {
        let (inner, record) = RecordingRequest::new(true);
        let sink = Arc::new(MemorySink::new());
        let mut tapped = TappedRequest::new(Box::new(inner), post(), body_only(), sink.clone());

        assert!(tapped.write(Chunk::from("{\"name\":"), None));
        assert!(sink.lines().is_empty());
        tapped.end(EndArgs::Chunk(Chunk::from("\"a\"}")));

        assert_eq!(
            sink.lines(),
            vec![r#"POST http://api.example.com/users - Body: {"name":"a"}"#]
        );
        let record = record.lock();
        assert_eq!(record.writes, vec![Bytes::from("{\"name\":")]);
        assert_eq!(record.end_chunk, Some(Bytes::from("\"a\"}")));
        assert_eq!(record.ends, 1);
    }

    #[test]
    fn test_tap_preserves_backpressure() {
        let (inner, _record) = RecordingRequest::new(false);
        let sink = Arc::new(MemorySink::new());
        let mut tapped = TappedRequest::new(Box::new(inner), post(), body_only(), sink);

        assert!(!tapped.write(Chunk::from("x"), None));
    }

    #[test]
    fn test_malformed_chunk_still_written() {
        let (inner, record) = RecordingRequest::new(true);
        let sink = Arc::new(MemorySink::new());
        let mut tapped = TappedRequest::new(Box::new(inner), post(), body_only(), sink.clone());

        tapped.write(Chunk::encoded("not hex", Encoding::Hex), None);
        tapped.write(Chunk::from("ok"), None);
        tapped.end(EndArgs::Empty);

        assert_eq!(record.lock().write_calls, 2);
        assert_eq!(
            sink.lines(),
            vec!["POST http://api.example.com/users - Body: ok"]
        );
    }

    #[test]
    fn test_callback_first_end() {
        let (inner, record) = RecordingRequest::new(true);
        let sink = Arc::new(MemorySink::new());
        let mut tapped = TappedRequest::new(Box::new(inner), post(), body_only(), sink.clone());

        let fired = Arc::new(parking_lot::Mutex::new(false));
        let flag = fired.clone();
        tapped.write(Chunk::from("payload"), None);
        tapped.end(EndArgs::Callback(Box::new(move || *flag.lock() = true)));

        assert!(*fired.lock());
        assert_eq!(record.lock().end_chunk, None);
        assert_eq!(
            sink.lines(),
            vec!["POST http://api.example.com/users - Body: payload"]
        );
    }

    #[test]
    fn test_single_line_on_double_end() {
        let (inner, _record) = RecordingRequest::new(true);
        let sink = Arc::new(MemorySink::new());
        let mut tapped = TappedRequest::new(Box::new(inner), post(), body_only(), sink.clone());

        tapped.end(EndArgs::Empty);
        tapped.end(EndArgs::Empty);
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_error_listener_registered() {
        let (inner, record) = RecordingRequest::new(true);
        let sink = Arc::new(MemorySink::new());
        let _tapped = TappedRequest::new(Box::new(inner), post(), body_only(), sink);
        assert_eq!(record.lock().error_listeners, 1);
    }
}
