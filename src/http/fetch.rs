// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Promise-style fetch calls

use bytes::Bytes;
use url::Url;

use super::headers::Headers;

/// First argument of a fetch call
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResource {
    /// URL string
    Str(String),
    /// Parsed URL
    Url(Url),
    /// Request object carrying its own method, headers and URL
    Request(RequestLike),
}

impl From<&str> for FetchResource {
    fn from(s: &str) -> Self {
        FetchResource::Str(s.to_string())
    }
}

impl From<String> for FetchResource {
    fn from(s: String) -> Self {
        FetchResource::Str(s)
    }
}

impl From<Url> for FetchResource {
    fn from(url: Url) -> Self {
        FetchResource::Url(url)
    }
}

impl From<RequestLike> for FetchResource {
    fn from(request: RequestLike) -> Self {
        FetchResource::Request(request)
    }
}

/// Request object passed as a fetch resource
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLike {
    /// Request method
    pub method: String,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (sent, never logged)
    pub body: Option<Bytes>,
}

impl RequestLike {
    /// Create a new request object
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Set a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Second argument of a fetch call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchInit {
    /// Method override
    pub method: Option<String>,
    /// Extra headers
    pub headers: Option<Headers>,
    /// Request body
    pub body: Option<FetchBody>,
}

impl FetchInit {
    /// Create empty init options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name, value);
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<FetchBody>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Body given to fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchBody {
    /// String body
    Text(String),
    /// Binary body
    Bytes(Bytes),
    /// Multipart form
    Form(FormData),
    /// Structured value sent as JSON
    Json(serde_json::Value),
}

impl FetchBody {
    /// Whether the body is empty (an empty body is not logged)
    pub fn is_empty(&self) -> bool {
        match self {
            FetchBody::Text(s) => s.is_empty(),
            FetchBody::Bytes(b) => b.is_empty(),
            FetchBody::Form(_) | FetchBody::Json(_) => false,
        }
    }

    /// Bytes sent on the wire
    pub fn to_bytes(&self) -> Bytes {
        match self {
            FetchBody::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            FetchBody::Bytes(b) => b.clone(),
            FetchBody::Form(form) => Bytes::from(form.to_urlencoded()),
            FetchBody::Json(value) => Bytes::from(value.to_string()),
        }
    }
}

impl From<&str> for FetchBody {
    fn from(s: &str) -> Self {
        FetchBody::Text(s.to_string())
    }
}

impl From<String> for FetchBody {
    fn from(s: String) -> Self {
        FetchBody::Text(s)
    }
}

impl From<Bytes> for FetchBody {
    fn from(b: Bytes) -> Self {
        FetchBody::Bytes(b)
    }
}

impl From<FormData> for FetchBody {
    fn from(form: FormData) -> Self {
        FetchBody::Form(form)
    }
}

impl From<serde_json::Value> for FetchBody {
    fn from(value: serde_json::Value) -> Self {
        FetchBody::Json(value)
    }
}

/// Value of a form entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field
    Text(String),
    /// File upload
    File { filename: String, data: Bytes },
}

/// Ordered multipart form entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.entries.push((
            name.into(),
            FormValue::File {
                filename: filename.into(),
                data: data.into(),
            },
        ));
        self
    }

    /// Iterate over entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// `application/x-www-form-urlencoded` rendering of the text fields
    pub fn to_urlencoded(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.entries {
            if let FormValue::Text(text) = value {
                serializer.append_pair(name, text);
            }
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_urlencoded() {
        let form = FormData::new()
            .text("name", "a b")
            .file("avatar", "a.png", Bytes::from_static(b"\x89PNG"))
            .text("role", "admin");
        assert_eq!(form.to_urlencoded(), "name=a+b&role=admin");
        assert_eq!(form.entries().count(), 3);
    }

    #[test]
    fn test_body_is_empty() {
        assert!(FetchBody::from("").is_empty());
        assert!(!FetchBody::from("x").is_empty());
        assert!(!FetchBody::from(serde_json::json!({})).is_empty());
    }

    #[test]
    fn test_init_builder() {
        let init = FetchInit::new()
            .method("post")
            .header("x-a", "1")
            .body(serde_json::json!({"k": 1}));
        assert_eq!(init.method.as_deref(), Some("post"));
        assert_eq!(init.body.unwrap().to_bytes(), Bytes::from(r#"{"k":1}"#));
    }
}
