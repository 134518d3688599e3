// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Table of the process's request-issuing entry points

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::http::{FetchEntryPoint, HttpTransport, Scheme, StreamingEntryPoint};

/// Get/set access to the current implementation of each entry point.
///
/// The installer only ever goes through this trait, so tests can hand it
/// a fake table instead of the real transport.
pub trait InterceptionTable: Send + Sync {
    /// Current streaming entry point for a scheme
    fn streaming(&self, scheme: Scheme) -> StreamingEntryPoint;

    /// Replace the streaming entry point for a scheme
    fn set_streaming(&self, scheme: Scheme, entry: StreamingEntryPoint) -> Result<()>;

    /// Current fetch entry point, if this environment has one
    fn fetch(&self) -> Option<FetchEntryPoint>;

    /// Replace the fetch entry point
    fn set_fetch(&self, entry: FetchEntryPoint) -> Result<()>;

    /// Capability query for fetch
    fn has_fetch(&self) -> bool {
        self.fetch().is_some()
    }
}

/// In-process entry point table
pub struct EntryPointTable {
    http: RwLock<StreamingEntryPoint>,
    https: RwLock<StreamingEntryPoint>,
    fetch: RwLock<Option<FetchEntryPoint>>,
}

impl EntryPointTable {
    /// Create a table from explicit implementations
    pub fn new(
        http: StreamingEntryPoint,
        https: StreamingEntryPoint,
        fetch: Option<FetchEntryPoint>,
    ) -> Self {
        Self {
            http: RwLock::new(http),
            https: RwLock::new(https),
            fetch: RwLock::new(fetch),
        }
    }

    /// Table whose entry points all send through `transport`
    pub fn from_transport(transport: &HttpTransport) -> Self {
        Self::new(
            transport.streaming_entry_point(Scheme::Http),
            transport.streaming_entry_point(Scheme::Https),
            Some(transport.fetch_entry_point()),
        )
    }

    fn slot(&self, scheme: Scheme) -> &RwLock<StreamingEntryPoint> {
        match scheme {
            Scheme::Http => &self.http,
            Scheme::Https => &self.https,
        }
    }
}

impl InterceptionTable for EntryPointTable {
    fn streaming(&self, scheme: Scheme) -> StreamingEntryPoint {
        self.slot(scheme).read().clone()
    }

    fn set_streaming(&self, scheme: Scheme, entry: StreamingEntryPoint) -> Result<()> {
        *self.slot(scheme).write() = entry;
        Ok(())
    }

    fn fetch(&self) -> Option<FetchEntryPoint> {
        self.fetch.read().clone()
    }

    fn set_fetch(&self, entry: FetchEntryPoint) -> Result<()> {
        *self.fetch.write() = Some(entry);
        Ok(())
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_TABLE: Arc<EntryPointTable> = Arc::new(EntryPointTable::from_transport(
        &HttpTransport::from_client(reqwest::Client::new()),
    ));
}

/// The process-wide table behind [`crate::http::request`],
/// [`crate::http::https::request`] and [`crate::fetch`]
pub fn global_table() -> Arc<EntryPointTable> {
    GLOBAL_TABLE.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ClientRequest, RequestArgs};

    fn transport() -> HttpTransport {
        HttpTransport::from_client(reqwest::Client::new())
    }

    #[test]
    fn test_set_and_get_streaming() {
        let table = EntryPointTable::from_transport(&transport());
        let replacement: StreamingEntryPoint = transport().streaming_entry_point(Scheme::Http);

        table.set_streaming(Scheme::Https, replacement.clone()).unwrap();

        assert!(Arc::ptr_eq(&table.streaming(Scheme::Https), &replacement));
        assert!(!Arc::ptr_eq(&table.streaming(Scheme::Http), &replacement));
    }

    #[test]
    fn test_fetch_capability() {
        let t = transport();
        let without = EntryPointTable::new(
            t.streaming_entry_point(Scheme::Http),
            t.streaming_entry_point(Scheme::Https),
            None,
        );
        assert!(!without.has_fetch());
        assert!(EntryPointTable::from_transport(&t).has_fetch());
    }

    #[test]
    fn test_entry_point_returns_handle() {
        let table = EntryPointTable::from_transport(&transport());
        let entry = table.streaming(Scheme::Http);
        let mut handle: Box<dyn ClientRequest> =
            entry(RequestArgs::url("http://localhost/", None));
        assert!(handle.write("x".into(), None));
    }
}
