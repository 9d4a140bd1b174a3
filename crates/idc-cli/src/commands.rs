//! One function per pipeline stage. Library errors convert into `eyre`
//! reports at this boundary; a returned error becomes a non-zero exit.

use std::path::Path;

use idc_assignments::{AwsIdentityDirectory, AwsOrgDirectory, PrincipalResolver};
use idc_aws::SsoContext;
use idc_permset::PermissionSetReconciler;

/// Converge the tenant's pipeline-owned permission sets to the repository.
pub async fn permission_sets(ps_folder: &Path) -> eyre::Result<()> {
    let catalog = idc_core::load_permission_sets(ps_folder)?;

    let config = idc_aws::load_pipeline_config().await;
    let ctx = SsoContext::discover(&config).await?;

    let live = idc_permset::build_live_index(&ctx).await?;
    let reconciler = PermissionSetReconciler::new(&ctx);
    let summary = reconciler.reconcile(&catalog, &live).await?;

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        "permission set reconciliation finished"
    );
    Ok(())
}

/// Expand repository assignments and write `assignments.json` for the
/// downstream applier.
pub async fn assignments(
    org_role: &str,
    mgmt_account: &str,
    assignments_folder: &Path,
) -> eyre::Result<()> {
    let assignments = idc_core::load_assignments(assignments_folder)?;

    let config = idc_aws::load_pipeline_config().await;
    let org_config = idc_aws::assume_org_role(&config, org_role).await?;
    let ctx = SsoContext::discover(&config).await?;

    // Assignments reference live ARNs, so the reconciler must have run
    // before this stage.
    let live = idc_permset::build_live_index(&ctx).await?;

    let org = AwsOrgDirectory::new(&org_config);
    let identity = AwsIdentityDirectory::new(&config, ctx.identity_store_id.clone());
    let mut principals = PrincipalResolver::new(&identity);

    let resolved = idc_assignments::expand_assignments(
        &assignments,
        &live,
        &org,
        &mut principals,
        mgmt_account,
    )
    .await?;

    idc_assignments::write_assignments_file(Path::new(idc_assignments::OUTPUT_FILE), &resolved)?;

    tracing::info!(count = resolved.len(), "assignment expansion finished");
    Ok(())
}

/// Validate the repository templates. Never writes to the tenant.
pub async fn validate(ps_folder: &Path, assignments_folder: &Path) -> eyre::Result<()> {
    let catalog = idc_core::load_permission_sets(ps_folder)?;
    let assignments = idc_core::load_assignments(assignments_folder)?;

    let config = idc_aws::load_pipeline_config().await;
    idc_validate::validate_templates(&config, &catalog, &assignments).await?;

    tracing::info!("all templates validated");
    Ok(())
}
