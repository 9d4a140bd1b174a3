//! idc-validate
//!
//! Static and remote validation of repository templates. Every check runs
//! before any live mutation; the first failure aborts the pipeline.

pub mod error;
pub mod policy_checks;
pub mod static_checks;

pub use crate::error::ValidationError;

use aws_config::SdkConfig;
use idc_core::{AssignmentTemplate, PermissionSetCatalog};

/// Run every check in order, failing fast:
///
/// 1. unique permission set names;
/// 2. unique assignment SIDs;
/// 3. inline policies pass Access Analyzer (`ERROR` fatal, `WARNING` logged);
/// 4. managed policy ARNs resolve in IAM, permission boundaries are
///    well-formed (AWS boundaries resolve, customer boundaries are names).
pub async fn validate_templates(
    config: &SdkConfig,
    catalog: &PermissionSetCatalog,
    assignments: &[AssignmentTemplate],
) -> Result<(), ValidationError> {
    static_checks::check_unique_names(catalog)?;
    static_checks::check_unique_sids(assignments)?;
    policy_checks::check_custom_policies(config, catalog).await?;
    policy_checks::check_managed_policies(config, catalog).await?;
    policy_checks::check_permission_boundaries(config, catalog).await?;
    Ok(())
}
