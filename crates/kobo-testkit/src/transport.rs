//! In-process HTTP transport that answers registered endpoints with callbacks.
//!
//! Requests are matched against registrations in order; the first
//! registration with the same method and URL answers. Every request that
//! reaches a callback is recorded in [`MockTransport::calls`].

use crate::enketo::{EnketoSimulator, SimulatorError};
use crate::http::{CapturedRequest, HttpMethod, SimulatedResponse};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub const ENKETO_EDIT_INSTANCE_ENDPOINT: &str = "api/v2/instance";
pub const ENKETO_VIEW_INSTANCE_ENDPOINT: &str = "api/v2/instance/view";

type Callback = Box<dyn Fn(&CapturedRequest) -> Result<SimulatedResponse, SimulatorError>>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// No registration matches; a real client would fail to connect
    #[error("connection refused by mock transport: {method:?} {url}")]
    ConnectionRefused { method: HttpMethod, url: String },
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
    #[error("invalid endpoint definitions: {0}")]
    InvalidEndpoints(#[from] serde_json::Error),
}

/// Endpoint answering every request with the same response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StaticEndpoint {
    pub method: HttpMethod,
    pub url: String,
    /// Defaults to 200
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl StaticEndpoint {
    fn response(&self) -> SimulatedResponse {
        SimulatedResponse {
            status: self.status.unwrap_or(200),
            headers: self.headers.clone().unwrap_or_default(),
            body: self.body.as_ref().map(Value::to_string).unwrap_or_default(),
        }
    }
}

struct Registration {
    method: HttpMethod,
    url: String,
    callback: Callback,
}

/// Mock HTTP transport.
#[derive(Default)]
pub struct MockTransport {
    registrations: Vec<Registration>,
    calls: Vec<CapturedRequest>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field(
                "registrations",
                &self
                    .registrations
                    .iter()
                    .map(|r| format!("{:?} {}", r.method, r.url))
                    .collect::<Vec<_>>(),
            )
            .field("calls", &self.calls.len())
            .finish()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method url` with `callback`.
    pub fn add_callback<F>(&mut self, method: HttpMethod, url: impl Into<String>, callback: F)
    where
        F: Fn(&CapturedRequest) -> Result<SimulatedResponse, SimulatorError> + 'static,
    {
        let url = url.into();
        tracing::debug!(?method, url = %url, "registered mock endpoint");
        self.registrations.push(Registration {
            method,
            url,
            callback: Box::new(callback),
        });
    }

    /// Register canned endpoints from a JSON array of [`StaticEndpoint`]s.
    ///
    /// Returns how many endpoints were added. Nothing is registered if the
    /// document is invalid.
    pub fn load_endpoints(&mut self, json: &str) -> Result<usize, TransportError> {
        let endpoints: Vec<StaticEndpoint> = serde_json::from_str(json)?;
        let count = endpoints.len();
        for endpoint in endpoints {
            let response = endpoint.response();
            self.add_callback(endpoint.method, endpoint.url, move |_| Ok(response.clone()));
        }
        Ok(count)
    }

    /// Dispatch a request to the first matching registration.
    pub fn send(&mut self, request: CapturedRequest) -> Result<SimulatedResponse, TransportError> {
        let Some(registration) = self
            .registrations
            .iter()
            .find(|r| r.method == request.method && urls_match(&r.url, &request.url))
        else {
            tracing::warn!(method = ?request.method, url = %request.url, "no mock endpoint registered");
            return Err(TransportError::ConnectionRefused {
                method: request.method,
                url: request.url,
            });
        };

        let result = (registration.callback)(&request);
        self.calls.push(request);
        result.map_err(TransportError::from)
    }

    /// Requests that reached a callback, oldest first.
    pub fn calls(&self) -> &[CapturedRequest] {
        &self.calls
    }

    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }
}

/// Register the plain edit and view simulators on their Enketo endpoints.
pub fn register_enketo(transport: &mut MockTransport, simulator: &EnketoSimulator) {
    let edit = simulator.clone();
    transport.add_callback(
        HttpMethod::Post,
        enketo_endpoint(simulator, ENKETO_EDIT_INSTANCE_ENDPOINT),
        move |request| edit.edit_instance_response(request),
    );

    let view = simulator.clone();
    transport.add_callback(
        HttpMethod::Post,
        enketo_endpoint(simulator, ENKETO_VIEW_INSTANCE_ENDPOINT),
        move |request| view.view_instance_response(request),
    );
}

/// Absolute URL of an Enketo API endpoint.
pub fn enketo_endpoint(simulator: &EnketoSimulator, endpoint: &str) -> String {
    format!("{}/{}", simulator.base_url(), endpoint.trim_start_matches('/'))
}

fn urls_match(registered: &str, requested: &str) -> bool {
    normalize_url(registered) == normalize_url(requested)
}

fn normalize_url(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or("");
    without_query.trim_end_matches('/')
}
