//! Renders API failures into the composite messages shown to users.

use crate::api::FieldError;

use super::introspect::Introspect;

/// Renders validation entries as an indented block.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn validation_block(errors: &[FieldError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let mut block = String::from("Validation errors:");
    for entry in errors {
        block.push_str("\n  - ");
        block.push_str(&entry.field_name);
        block.push_str(": ");
        block.push_str(&entry.error_message);
    }
    Some(block)
}

/// Builds the full text of a failed response, validation block included.
#[must_use]
pub fn describe_response<R: Introspect>(response: &R) -> String {
    let summary = response.summary();
    let mut text = format!("API error (status {})", summary.status_code);
    if let Some(message) = summary.message() {
        text.push_str(": ");
        text.push_str(&message);
    }
    if let Some(block) = validation_block(&response.field_errors()) {
        text.push('\n');
        text.push_str(&block);
    }
    text
}
