//! HTTP response captured for validation.
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fs, path::Path};

use crate::error::Result;

/// One HTTP response: status code, case-insensitive headers and raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// On-disk form of a captured exchange. The body may be stored either as
/// raw text or as an inline JSON document.
#[derive(Debug, Deserialize)]
struct CapturedResponse {
    status: u16,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Value,
}

impl HttpResponse {
    pub fn new(
        status: u16,
        headers: HeaderMap,
        body: impl Into<String>,
    ) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Parse a captured response document.
    pub fn from_captured(content: &str) -> Result<Self> {
        let captured: CapturedResponse = serde_json::from_str(content)?;

        let mut headers = HeaderMap::new();
        for (name, value) in captured.headers.iter() {
            headers.append(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        let body = match captured.body {
            Value::String(raw) => raw,
            Value::Null => String::new(),
            other => other.to_string(),
        };

        Ok(Self::new(captured.status, headers, body))
    }

    /// Load a captured response from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_captured(&content)
    }

    /// Case-insensitive header lookup. Values that are not valid visible
    /// ASCII are treated as missing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }

    /// Parse the body as a JSON object, substituting an empty object when
    /// the body is not valid JSON or not an object.
    pub fn json_object_or_empty(&self) -> Map<String, Value> {
        match self.json() {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
