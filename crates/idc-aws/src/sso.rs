//! SSO instance discovery and the shared admin-client handle.

use aws_config::SdkConfig;
use aws_sdk_ssoadmin::Client;

use crate::error::ApiError;

/// Everything an SSO-admin call needs: the client plus the tenant's
/// instance coordinates.
#[derive(Debug, Clone)]
pub struct SsoContext {
    pub client: Client,
    pub instance_arn: String,
    pub identity_store_id: String,
}

impl SsoContext {
    /// Discover the tenant's SSO instance.
    ///
    /// Uses the first instance returned; one instance per tenant is
    /// assumed throughout the pipeline.
    pub async fn discover(config: &SdkConfig) -> Result<Self, ApiError> {
        let client = Client::new(config);

        let resp = client
            .list_instances()
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("sso:ListInstances", e))?;

        let instance = resp
            .instances()
            .first()
            .ok_or_else(|| ApiError::Permanent("no SSO instance found in this tenant".into()))?;

        let instance_arn = instance
            .instance_arn()
            .ok_or_else(|| ApiError::Permanent("SSO instance carries no ARN".into()))?
            .to_string();
        let identity_store_id = instance
            .identity_store_id()
            .ok_or_else(|| ApiError::Permanent("SSO instance carries no identity store ID".into()))?
            .to_string();

        tracing::info!(instance_arn = %instance_arn, "SSO instance discovered");

        Ok(Self {
            client,
            instance_arn,
            identity_store_id,
        })
    }
}
