//! Tests for the introspector, classifier and validation formatter.

use rstest::rstest;
use serde_json::json;

use crate::api::{ApiErrorBody, ApiResponse, TransportError};
use crate::reconcile::{
    ErrorSummary, Introspect, Verdict, classify, classify_outcome, describe_response,
    mentions_dependency, validation_block,
};

#[rstest]
fn success_summary_carries_no_message() {
    let response = super::success();
    let summary = response.summary();
    assert_eq!(
        summary,
        ErrorSummary {
            status_code: 200,
            title: None,
            detail: None,
            is_error: false,
        }
    );
    assert_eq!(classify(&summary), Verdict::Ok);
}

#[rstest]
fn absent_response_is_the_empty_summary() {
    let response: Option<ApiResponse> = None;
    assert_eq!(response.summary(), ErrorSummary::EMPTY);
    assert_eq!(classify(&response.summary()), Verdict::Ok);
}

#[rstest]
fn present_option_delegates_to_inner_response() {
    let response = Some(super::failure(409, "Conflict", "busy"));
    assert_eq!(response.summary().status_code, 409);
    assert_eq!(classify(&response.summary()), Verdict::Retryable);
}

#[rstest]
#[case::not_found(404, "Not Found", "VPC is attached to nothing", Verdict::Gone)]
#[case::dependency(409, "Conflict", "VPC has subnets", Verdict::RetryableDependency)]
#[case::case_insensitive(400, "CANNOT DELETE", "", Verdict::RetryableDependency)]
#[case::title_only(409, "Resource still in use", "", Verdict::RetryableDependency)]
#[case::generic(500, "Internal Server Error", "boom", Verdict::Retryable)]
#[case::validation(422, "Unprocessable", "name is required", Verdict::Retryable)]
fn classify_error_responses(
    #[case] status: u16,
    #[case] title: &str,
    #[case] detail: &str,
    #[case] expected: Verdict,
) {
    let response = super::failure(status, title, detail);
    assert_eq!(classify(&response.summary()), expected);
}

#[rstest]
fn transport_failures_are_retryable() {
    let outcome: Result<ApiResponse, TransportError> =
        Err(TransportError::new("connection refused"));
    assert_eq!(classify_outcome(&outcome), Verdict::Retryable);
    assert!(classify_outcome(&outcome).is_retryable());
}

#[rstest]
fn keyword_matching_over_matches_substrings() {
    // `attached_at` is a timestamp field name, not a dependency.
    assert!(mentions_dependency("invalid value for attached_at"));
    let response = super::failure(400, "Bad Request", "invalid value for attached_at");
    assert_eq!(classify(&response.summary()), Verdict::RetryableDependency);
}

#[rstest]
fn message_skips_blank_parts() {
    let summary = ErrorSummary {
        status_code: 500,
        title: Some(""),
        detail: Some("boom"),
        is_error: true,
    };
    assert_eq!(summary.message().as_deref(), Some("boom"));
    assert_eq!(ErrorSummary::EMPTY.message(), None);
}

#[rstest]
fn validation_block_lists_each_field() {
    let body: ApiErrorBody = serde_json::from_value(json!({
        "title": "Bad Request",
        "detail": "validation failed",
        "errors": [
            { "fieldName": "name", "errorMessage": "required" },
            { "fieldName": "location", "errorMessage": "unknown region" }
        ]
    }))
    .expect("problem document");
    let response: ApiResponse = ApiResponse::failure(400, body);

    let block = validation_block(&response.field_errors()).expect("block rendered");
    assert_eq!(
        block,
        "Validation errors:\n  - name: required\n  - location: unknown region"
    );
    assert_eq!(
        describe_response(&response),
        format!("API error (status 400): Bad Request: validation failed\n{block}")
    );
}

#[rstest]
fn validation_block_is_absent_without_entries() {
    assert_eq!(validation_block(&[]), None);
    let response = super::failure(500, "Internal Server Error", "");
    assert_eq!(
        describe_response(&response),
        "API error (status 500): Internal Server Error"
    );
}

#[rstest]
fn error_payload_serialises_problem_document() {
    let response = super::failure(409, "Conflict", "VPC has subnets");
    let payload = response.error_payload().expect("payload");
    let parsed: serde_json::Value = serde_json::from_str(&payload).expect("json payload");
    assert_eq!(parsed["detail"], "VPC has subnets");
    assert_eq!(super::success().error_payload(), None);
}
