//! Expansion of repository assignments into concrete per-account records.

use std::collections::HashSet;
use std::path::Path;

use idc_core::{AssignmentTemplate, ResolvedAssignment};
use idc_permset::LiveIndex;

use crate::error::ExpandError;
use crate::principals::PrincipalResolver;
use crate::targets::{OrgDirectory, resolve_all};

/// Output path consumed by the downstream applier, relative to the working
/// directory.
pub const OUTPUT_FILE: &str = "assignments.json";

/// Expand every repository assignment.
///
/// A principal miss or a target failure skips the affected assignment and
/// the run continues. A permission set missing from the live index aborts:
/// the reconciler must have converged it first.
pub async fn expand_assignments(
    assignments: &[AssignmentTemplate],
    live: &LiveIndex,
    directory: &dyn OrgDirectory,
    principals: &mut PrincipalResolver<'_>,
    management_account: &str,
) -> Result<Vec<ResolvedAssignment>, ExpandError> {
    let mut resolved = Vec::new();

    for assignment in assignments {
        tracing::info!(sid = %assignment.sid, "resolving assignment");

        let principal_id = match principals
            .resolve(&assignment.principal_id, assignment.principal_type)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(
                    sid = %assignment.sid,
                    principal = %assignment.principal_id,
                    error = %err,
                    "principal lookup failed, skipping assignment"
                );
                continue;
            }
        };

        let accounts = match resolve_all(directory, &assignment.target).await {
            Ok(accounts) => accounts,
            Err(err) => {
                tracing::error!(
                    sid = %assignment.sid,
                    error = %err,
                    "target resolution failed, skipping assignment"
                );
                continue;
            }
        };

        let arn = live.arn_for(&assignment.permission_set_name).ok_or_else(|| {
            ExpandError::UnknownPermissionSet {
                sid: assignment.sid.clone(),
                name: assignment.permission_set_name.clone(),
            }
        })?;

        for account in accounts {
            if account == management_account {
                continue;
            }
            resolved.push(ResolvedAssignment {
                sid: ResolvedAssignment::derive_sid(
                    &account,
                    &assignment.principal_id,
                    assignment.principal_type,
                    &assignment.permission_set_name,
                ),
                principal_id: principal_id.clone(),
                principal_type: assignment.principal_type,
                permission_set_name: arn.to_string(),
                target: account,
            });
        }
    }

    Ok(dedup_preserving_order(resolved))
}

/// First-occurrence dedup by full record equality.
pub fn dedup_preserving_order(records: Vec<ResolvedAssignment>) -> Vec<ResolvedAssignment> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

/// Serialize the records as a flat JSON array.
///
/// No envelope; downstream consumers depend on the bare-array shape.
pub fn write_assignments_file(
    path: &Path,
    records: &[ResolvedAssignment],
) -> Result<(), ExpandError> {
    let rendered = serde_json::to_string(records)?;
    std::fs::write(path, rendered).map_err(|source| ExpandError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        count = records.len(),
        "assignment file written"
    );
    Ok(())
}
