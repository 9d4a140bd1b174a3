//! idc-assignments
//!
//! Expansion of repository assignments into concrete per-account records.
//! Symbolic targets resolve against the organization tree and principal
//! names resolve against the identity store; the resulting product, with
//! the management account filtered out, lands in `assignments.json` for
//! the downstream applier.

pub mod error;
pub mod expand;
pub mod principals;
pub mod targets;

pub use crate::error::{ExpandError, PrincipalResolutionError, TargetResolutionError};
pub use crate::expand::{
    OUTPUT_FILE, dedup_preserving_order, expand_assignments, write_assignments_file,
};
pub use crate::principals::{AwsIdentityDirectory, IdentityDirectory, PrincipalResolver};
pub use crate::targets::{
    AwsOrgDirectory, OrgDirectory, TargetKind, parse_target, resolve_all, resolve_target,
};
