//! Captured requests and simulated responses.

use crate::form::decode_form_body;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// HTTP method of a captured request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// Outgoing request intercepted by the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub method: HttpMethod,
    /// Absolute URL, query string included
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// POST with a form-encoded body.
    pub fn form_post<'a, I>(url: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = Self::new(HttpMethod::Post, url);
        request.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        request.body = crate::form::encode_form_body(fields);
        request
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Body decoded as form fields.
    pub fn form(&self) -> HashMap<String, String> {
        decode_form_body(&self.body)
    }
}

/// Canned response produced by a simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Serialized JSON body
    pub body: String,
}

impl SimulatedResponse {
    /// Response with no headers and `body` serialized as JSON.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.to_string(),
        }
    }

    /// Parse the body back into JSON.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_form_post_sets_content_type_and_body() {
        let request = CapturedRequest::form_post(
            "https://ee.example.org/api/v2/instance",
            [("instance_id", "abc 123")],
        );
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body, b"instance_id=abc%20123".to_vec());
        assert_eq!(
            request.form().get("instance_id").map(String::as_str),
            Some("abc 123")
        );
    }

    #[rstest]
    fn test_json_response() {
        let response = SimulatedResponse::json(201, &json!({"edit_url": "x"}));
        assert!(response.headers.is_empty());
        assert_eq!(response.body, r#"{"edit_url":"x"}"#);
        assert_eq!(response.body_json().unwrap(), json!({"edit_url": "x"}));
    }

    #[rstest]
    #[case(HttpMethod::Get, "\"GET\"")]
    #[case(HttpMethod::Post, "\"POST\"")]
    #[case(HttpMethod::Options, "\"OPTIONS\"")]
    fn test_http_method_uses_uppercase_names(#[case] method: HttpMethod, #[case] expected: &str) {
        let json = serde_json::to_string(&method).expect("Should serialize");
        assert_eq!(json, expected);
        let parsed: HttpMethod = serde_json::from_str(expected).expect("Should deserialize");
        assert_eq!(parsed, method);
    }
}
