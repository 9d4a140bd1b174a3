//! Checks that run without touching AWS.

use std::collections::HashSet;

use idc_core::{AssignmentTemplate, PermissionSetCatalog};

use crate::error::ValidationError;

/// Every permission set template must have a distinct `Name`.
pub fn check_unique_names(catalog: &PermissionSetCatalog) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for template in catalog.iter() {
        if !seen.insert(template.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: template.name.clone(),
            });
        }
    }

    tracing::info!("no duplicate permission set names detected");
    Ok(())
}

/// Every assignment must have a distinct `SID`.
pub fn check_unique_sids(assignments: &[AssignmentTemplate]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for assignment in assignments {
        if !seen.insert(assignment.sid.as_str()) {
            return Err(ValidationError::DuplicateSid {
                sid: assignment.sid.clone(),
            });
        }
    }

    tracing::info!("no duplicate assignment SIDs detected");
    Ok(())
}

/// Whether a customer managed policy reference was written as an ARN.
/// Boundary references of type `CUSTOMER` must be plain policy names.
pub fn is_arn_shaped(value: &str) -> bool {
    value.contains("arn:aws")
}
