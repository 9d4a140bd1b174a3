//! idc-core
//!
//! Pure domain types and template catalog loading for the Identity Center
//! pipeline. No AWS SDK dependency: this is the shared vocabulary between
//! the validator, the reconciler, and the assignment expander.

pub mod catalog;
pub mod error;
pub mod models;

pub use crate::catalog::{PermissionSetCatalog, load_assignments, load_permission_sets};
pub use crate::error::TemplateError;
pub use crate::models::assignment::{AssignmentTemplate, PrincipalType};
pub use crate::models::permission_set::{
    BoundaryPolicyType, DEFAULT_RELAY_STATE, PermissionBoundary, PermissionSetTemplate,
};
pub use crate::models::resolved::ResolvedAssignment;
