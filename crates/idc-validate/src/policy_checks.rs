//! Checks that consult Access Analyzer and IAM. Read-only.

use aws_config::SdkConfig;
use aws_sdk_accessanalyzer::types::{Locale, PolicyType, ValidatePolicyFindingType};

use idc_aws::ApiError;
use idc_core::{BoundaryPolicyType, PermissionSetCatalog};

use crate::error::ValidationError;
use crate::static_checks::is_arn_shaped;

/// Validate every non-empty inline policy as an identity policy.
///
/// `ERROR` findings are fatal; `WARNING` findings are logged and tolerated.
pub async fn check_custom_policies(
    config: &SdkConfig,
    catalog: &PermissionSetCatalog,
) -> Result<(), ValidationError> {
    let client = aws_sdk_accessanalyzer::Client::new(config);

    for template in catalog.iter() {
        let Some(document) = template.custom_policy() else {
            tracing::info!(permission_set = %template.name, "no custom policy, skipping analysis");
            continue;
        };

        tracing::info!(permission_set = %template.name, "analyzing custom policy");
        let rendered = serde_json::to_string(document)?;

        let mut pages = client
            .validate_policy()
            .locale(Locale::En)
            .policy_document(rendered)
            .policy_type(PolicyType::IdentityPolicy)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| ApiError::from_sdk("access-analyzer:ValidatePolicy", e))?;
            for finding in page.findings() {
                match finding.finding_type() {
                    ValidatePolicyFindingType::Error => {
                        return Err(ValidationError::PolicyFinding {
                            name: template.name.clone(),
                            details: finding.finding_details().to_string(),
                        });
                    }
                    ValidatePolicyFindingType::Warning => {
                        tracing::warn!(
                            permission_set = %template.name,
                            details = %finding.finding_details(),
                            "custom policy warning"
                        );
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// Confirm every referenced AWS managed policy ARN resolves in IAM.
pub async fn check_managed_policies(
    config: &SdkConfig,
    catalog: &PermissionSetCatalog,
) -> Result<(), ValidationError> {
    let client = aws_sdk_iam::Client::new(config);

    for template in catalog.iter() {
        tracing::info!(permission_set = %template.name, "checking AWS managed policies");
        for arn in &template.managed_policies {
            resolve_policy_arn(&client, &template.name, arn).await?;
        }
    }

    Ok(())
}

/// AWS boundaries must resolve in IAM; customer boundaries must be plain
/// policy names, not ARNs.
pub async fn check_permission_boundaries(
    config: &SdkConfig,
    catalog: &PermissionSetCatalog,
) -> Result<(), ValidationError> {
    let client = aws_sdk_iam::Client::new(config);

    for template in catalog.iter() {
        let Some(boundary) = &template.permission_boundary else {
            continue;
        };

        match boundary.policy_type {
            BoundaryPolicyType::Aws => {
                tracing::info!(
                    permission_set = %template.name,
                    "checking AWS managed permission boundary"
                );
                resolve_policy_arn(&client, &template.name, &boundary.policy).await?;
            }
            BoundaryPolicyType::Customer => {
                if is_arn_shaped(&boundary.policy) {
                    return Err(ValidationError::BoundaryIsArn {
                        name: template.name.clone(),
                        value: boundary.policy.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

async fn resolve_policy_arn(
    client: &aws_sdk_iam::Client,
    permission_set: &str,
    arn: &str,
) -> Result<(), ValidationError> {
    match client.get_policy().policy_arn(arn).send().await {
        Ok(_) => Ok(()),
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_no_such_entity_exception()) =>
        {
            Err(ValidationError::UnresolvedManagedPolicy {
                name: permission_set.to_string(),
                arn: arn.to_string(),
            })
        }
        Err(err) => Err(ApiError::from_sdk("iam:GetPolicy", err).into()),
    }
}
