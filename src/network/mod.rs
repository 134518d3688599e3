// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interception engine
//!
//! Normalizes each intercepted call, optionally taps its body, and writes
//! one log line per request.

mod capture;
mod format;
mod installer;
mod normalize;
mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::{BodyAccumulator, TappedRequest};
pub use format::{
    compact_body, format_line, render_fetch_body, render_headers, LogSink, MemorySink,
    StderrSink, UNSERIALIZABLE_BODY, UNSERIALIZABLE_HEADERS,
};
pub use installer::{wrap_fetch, wrap_streaming, InstallOutcome, Installer};
pub use normalize::{normalize_fetch, normalize_streaming, NormalizedRequest};
pub use table::{global_table, EntryPointTable, InterceptionTable};
