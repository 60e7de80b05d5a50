//! XForm and submission XML helpers.

use roxmltree::{Document, Node};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("invalid XML: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("form has no primary instance element")]
    MissingInstance,
}

/// Root element names of a form's primary instance and of a submission.
///
/// The primary instance is the first element child of the first `instance`
/// element without an `id` attribute.
///
/// Only local names are returned. An XForm's instance sits in the XForms
/// default namespace while submissions usually declare none, so a
/// submission root `<data xmlns="urn:other">` still reports `data`.
pub fn form_and_submission_tag_names(
    form_xml: &str,
    submission_xml: &str,
) -> Result<(String, String), XmlError> {
    let form = Document::parse(form_xml)?;
    let form_root = form
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "instance")
        .find(|n| n.attribute("id").is_none())
        .and_then(|instance| instance.children().find(Node::is_element))
        .ok_or(XmlError::MissingInstance)?;

    let submission = Document::parse(submission_xml)?;
    Ok((
        form_root.tag_name().name().to_string(),
        submission.root_element().tag_name().name().to_string(),
    ))
}

/// Trimmed text of the element at `path` (`/`-separated child names) below `node`.
///
/// `None` when any step is missing; an element without text yields `Some("")`.
/// Steps match local names in any namespace.
pub fn find_child_text(node: Node<'_, '_>, path: &str) -> Option<String> {
    let mut current = node;
    for step in path.split('/').filter(|s| !s.is_empty()) {
        current = current
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == step)?;
    }
    Some(current.text().unwrap_or_default().trim().to_string())
}
