//! Enketo response simulators.
//!
//! Each simulator decodes the form-encoded request body, optionally checks
//! the submitted instance, and answers `201 Created` with a JSON body
//! holding a single URL. Validation failures are returned as
//! [`SimulatorError`] so the test driving the request fails loudly.

use crate::http::{CapturedRequest, SimulatedResponse};
use crate::snapshot::SnapshotStore;
use crate::xml::{find_child_text, form_and_submission_tag_names, XmlError};
use kobo_core::Settings;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub const HTTP_201_CREATED: u16 = 201;

/// Simulator failure. Tests are expected to fail on any of these.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("request body has no '{0}' field")]
    MissingField(&'static str),
    #[error("form snapshot not found: {0}")]
    SnapshotNotFound(String),
    #[error("root name mismatch: form has '{form}', submission has '{submission}'")]
    RootNameMismatch { form: String, submission: String },
    #[error("submission has no non-empty '{0}' element")]
    MissingElement(&'static str),
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Fake Enketo service answering edit and view requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnketoSimulator {
    base_url: String,
}

impl EnketoSimulator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            base_url: settings.enketo_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{"edit_url": "{base}/edit/{instance_id}"}`
    pub fn edit_instance_response(
        &self,
        request: &CapturedRequest,
    ) -> Result<SimulatedResponse, SimulatorError> {
        let body = request.form();
        self.url_response("edit", &body)
    }

    /// `{"view_url": "{base}/view/{instance_id}"}`
    pub fn view_instance_response(
        &self,
        request: &CapturedRequest,
    ) -> Result<SimulatedResponse, SimulatorError> {
        let body = request.form();
        self.url_response("view", &body)
    }

    /// Edit response that first checks the submission's root element
    /// against the stored form snapshot named by `form_id`.
    pub fn edit_instance_response_with_root_name_validation(
        &self,
        request: &CapturedRequest,
        snapshots: &dyn SnapshotStore,
    ) -> Result<SimulatedResponse, SimulatorError> {
        let body = request.form();
        let submission = field(&body, "instance")?;
        let form_id = field(&body, "form_id")?;
        let snapshot = snapshots
            .get(form_id)
            .ok_or_else(|| SimulatorError::SnapshotNotFound(form_id.to_string()))?;

        let (form_root, submission_root) =
            form_and_submission_tag_names(&snapshot.xml, submission)?;
        if form_root != submission_root {
            tracing::warn!(
                form_id,
                form_root = %form_root,
                submission_root = %submission_root,
                "submission root name does not match form"
            );
            return Err(SimulatorError::RootNameMismatch {
                form: form_root,
                submission: submission_root,
            });
        }

        self.url_response("edit", &body)
    }

    /// Edit response that first checks `formhub/uuid` and `meta/instanceID`
    /// are present and non-blank in the submission.
    pub fn edit_instance_response_with_uuid_validation(
        &self,
        request: &CapturedRequest,
    ) -> Result<SimulatedResponse, SimulatorError> {
        let body = request.form();
        let submission = field(&body, "instance")?;
        let doc = roxmltree::Document::parse(submission).map_err(XmlError::from)?;
        let root = doc.root_element();

        for path in ["formhub/uuid", "meta/instanceID"] {
            let present = find_child_text(root, path).is_some_and(|text| !text.is_empty());
            if !present {
                tracing::warn!(element = path, "submission is missing a required uuid");
                return Err(SimulatorError::MissingElement(path));
            }
        }

        self.url_response("edit", &body)
    }

    fn url_response(
        &self,
        action: &'static str,
        body: &HashMap<String, String>,
    ) -> Result<SimulatedResponse, SimulatorError> {
        let instance_id = field(body, "instance_id")?;
        let url = format!("{}/{action}/{instance_id}", self.base_url);

        let mut resp_body = Map::new();
        resp_body.insert(format!("{action}_url"), Value::String(url));
        Ok(SimulatedResponse::json(HTTP_201_CREATED, &Value::Object(resp_body)))
    }
}

fn field<'a>(
    body: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, SimulatorError> {
    body.get(name)
        .map(String::as_str)
        .ok_or(SimulatorError::MissingField(name))
}
