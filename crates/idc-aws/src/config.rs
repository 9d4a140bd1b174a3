//! SDK configuration with the pipeline retry posture.

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};

use crate::error::ApiError;

/// Retry ceiling for every remote call.
///
/// Adaptive mode adds client-side rate limiting on top of exponential
/// backoff with jitter; the high ceiling rides out the long throttling
/// bursts a tenant with hundreds of permission sets produces.
pub const MAX_API_ATTEMPTS: u32 = 1000;

const ASSUME_ROLE_SESSION_NAME: &str = "identitycenter-pipeline";

/// Load ambient credentials with the pipeline retry posture applied.
pub async fn load_pipeline_config() -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::adaptive().with_max_attempts(MAX_API_ATTEMPTS))
        .load()
        .await
}

/// Assume the organization management role and return a config carrying its
/// temporary credentials.
///
/// Organization tree walks (account and OU listings) must run as the
/// management account; every other call uses the ambient credentials.
pub async fn assume_org_role(base: &SdkConfig, role_arn: &str) -> Result<SdkConfig, ApiError> {
    let sts = aws_sdk_sts::Client::new(base);

    tracing::info!(role_arn = %role_arn, "assuming organization management role");

    let resp = sts
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(ASSUME_ROLE_SESSION_NAME)
        .send()
        .await
        .map_err(|e| ApiError::from_sdk("sts:AssumeRole", e))?;

    let creds = resp
        .credentials()
        .ok_or_else(|| ApiError::Permanent("sts:AssumeRole returned no credentials".into()))?;

    let provider = aws_sdk_sts::config::Credentials::new(
        creds.access_key_id(),
        creds.secret_access_key(),
        Some(creds.session_token().to_string()),
        None,
        "org-management-role",
    );

    Ok(aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(provider)
        .retry_config(RetryConfig::adaptive().with_max_attempts(MAX_API_ATTEMPTS))
        .load()
        .await)
}
