/// Fully built REST requests, ready for a transport

use serde::Serialize;
use serde_json::Value as Json;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method, path (with query string) and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Json>,
}

impl RestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Json) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable value as the body.
    pub fn with_json<T: Serialize>(self, body: &T) -> crate::Result<Self> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }
}

impl fmt::Display for RestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
