use idc_aws::{ApiError, WriteOutcome, is_transient_code};

#[test]
fn throttling_and_server_faults_are_transient() {
    assert!(is_transient_code("ThrottlingException"));
    assert!(is_transient_code("TooManyRequestsException"));
    assert!(is_transient_code("RequestLimitExceeded"));
    assert!(is_transient_code("InternalServerException"));
    assert!(is_transient_code("ServiceUnavailable"));
}

#[test]
fn definitive_failures_are_not_transient() {
    assert!(!is_transient_code("AccessDeniedException"));
    assert!(!is_transient_code("ValidationException"));
    assert!(!is_transient_code("ConflictException"));
    assert!(!is_transient_code("ResourceNotFoundException"));
}

#[test]
fn error_display_carries_the_classification() {
    let transient = ApiError::Transient("sso:ListPermissionSets: ThrottlingException".into());
    assert!(transient.to_string().contains("retries exhausted"));

    let permanent = ApiError::Permanent("sso:CreatePermissionSet: AccessDeniedException".into());
    assert!(permanent.to_string().starts_with("permanent API failure"));
}

#[test]
fn write_outcomes_are_distinct() {
    assert_ne!(WriteOutcome::Applied, WriteOutcome::NoChange);
}
