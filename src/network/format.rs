// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Log line formatting and the sink lines are written to

use std::fmt::Write as _;
use std::io::Write as _;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::normalize::NormalizedRequest;
use crate::config::ActiveOptions;
use crate::http::{FetchBody, FormData, FormValue};

/// Placeholder for a body that cannot be rendered
pub const UNSERIALIZABLE_BODY: &str = "[Unserializable body]";

/// Placeholder for headers that cannot be rendered
pub const UNSERIALIZABLE_HEADERS: &str = "[Unserializable headers]";

/// Destination of formatted log lines
pub trait LogSink: Send + Sync {
    /// Append one line
    fn write(&self, line: &str);
}

/// Writes each line to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        // Nowhere to report a failed write to stderr
        let _ = writeln!(stderr, "{}", line);
    }
}

/// Keeps lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Drop all lines
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Build one log line.
///
/// `<METHOD> <scheme>://<host><port><path>`, then ` - Body: ...` when a body
/// is given and may be logged for this method, then ` - Headers: ...`.
pub fn format_line(
    request: &NormalizedRequest,
    body: Option<&str>,
    options: ActiveOptions,
) -> String {
    let mut line = format!(
        "{} {}://{}{}{}",
        request.method, request.scheme, request.host, request.port, request.path
    );

    if let Some(body) = body {
        if options.logs_body_for(&request.method) {
            let _ = write!(line, " - Body: {}", body);
        }
    }

    if options.log_headers {
        let _ = write!(line, " - Headers: {}", render_headers(&request.headers));
    }

    line
}

/// Headers as a JSON object
pub fn render_headers(headers: &Map<String, Value>) -> String {
    serde_json::to_string(headers).unwrap_or_else(|_| UNSERIALIZABLE_HEADERS.to_string())
}

/// Re-serialize a JSON body compactly, or keep it as is
pub fn compact_body(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => value.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Render a fetch body; `None` when there is nothing to log
pub fn render_fetch_body(body: &FetchBody) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    let rendered = match body {
        FetchBody::Text(text) => text.clone(),
        FetchBody::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => UNSERIALIZABLE_BODY.to_string(),
        },
        FetchBody::Form(form) => render_form(form),
        FetchBody::Json(value) => serde_json::to_string(value)
            .unwrap_or_else(|_| UNSERIALIZABLE_BODY.to_string()),
    };
    Some(rendered)
}

/// Form entries as a JSON object; a repeated name keeps its first position
/// and its last value, file entries render as `{}`
fn render_form(form: &FormData) -> String {
    let mut map = Map::new();
    for (name, value) in form.entries() {
        let value = match value {
            FormValue::Text(text) => Value::String(text.clone()),
            FormValue::File { .. } => Value::Object(Map::new()),
        };
        map.insert(name.to_string(), value);
    }
    serde_json::to_string(&map).unwrap_or_else(|_| UNSERIALIZABLE_BODY.to_string())
}
