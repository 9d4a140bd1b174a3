use serde::{Deserialize, Serialize};

use crate::models::assignment::PrincipalType;

/// One concrete principal-to-account binding, as consumed by the downstream
/// applier.
///
/// `permission_set_name` carries the live permission set ARN, not the
/// template name. The applier works with ARNs and the key is kept for
/// compatibility with the file format it already parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolvedAssignment {
    pub sid: String,
    /// Identity store ID of the principal.
    pub principal_id: String,
    pub principal_type: PrincipalType,
    /// The live permission set ARN.
    pub permission_set_name: String,
    /// A single 12-digit account ID.
    pub target: String,
}

impl ResolvedAssignment {
    /// Deterministic record key: the account, principal name, principal
    /// type, and template name concatenated with no separator. Kept
    /// bit-for-bit compatible with files produced by earlier pipeline
    /// versions.
    pub fn derive_sid(
        account: &str,
        principal_name: &str,
        principal_type: PrincipalType,
        permission_set_name: &str,
    ) -> String {
        format!(
            "{account}{principal_name}{}{permission_set_name}",
            principal_type.as_str()
        )
    }
}
