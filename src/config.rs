// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Activation configuration

use serde::{Deserialize, Serialize};

/// Caller-supplied configuration for [`crate::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// When false, `start` does nothing
    pub enable: bool,
    /// Include the query string in logged paths
    pub params: bool,
    /// Include request bodies
    pub body: bool,
    /// Include request headers
    pub headers: bool,
    /// Force params, body and headers on
    pub verbose: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enable: true,
            params: false,
            body: false,
            headers: false,
            verbose: false,
        }
    }
}

impl LoggerConfig {
    /// Create a new logger config
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable activation
    pub fn enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// Log query parameters
    pub fn params(mut self, params: bool) -> Self {
        self.params = params;
        self
    }

    /// Log request bodies
    pub fn body(mut self, body: bool) -> Self {
        self.body = body;
        self
    }

    /// Log request headers
    pub fn headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    /// Log everything
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Config with every facet on
    pub fn for_debugging() -> Self {
        Self {
            verbose: true,
            ..Default::default()
        }
    }

    /// Freeze the facets for one activation
    pub fn active_options(&self) -> ActiveOptions {
        ActiveOptions {
            log_params: self.verbose || self.params,
            log_body: self.verbose || self.body,
            log_headers: self.verbose || self.headers,
        }
    }
}

/// Facets enabled for the current activation.
///
/// Computed once by `start` and copied into every wrapper, so wrapped
/// calls never observe a change mid-activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveOptions {
    /// Keep `?query` on logged paths
    pub log_params: bool,
    /// Append ` - Body: ...`
    pub log_body: bool,
    /// Append ` - Headers: ...`
    pub log_headers: bool,
}

impl ActiveOptions {
    /// Every facet on
    pub fn all() -> Self {
        Self {
            log_params: true,
            log_body: true,
            log_headers: true,
        }
    }

    /// Whether a body segment may be logged for this method
    pub fn logs_body_for(&self, method: &str) -> bool {
        self.log_body && !method_has_no_body(method)
    }
}

/// GET and DELETE never carry a logged body
pub fn method_has_no_body(method: &str) -> bool {
    method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("DELETE")
}
