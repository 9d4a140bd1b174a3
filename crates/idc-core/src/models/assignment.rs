use std::fmt;

use serde::{Deserialize, Serialize};

/// An assignment as declared in the repository: one principal bound to one
/// permission set on a list of symbolic targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssignmentTemplate {
    /// Unique key across the whole repository.
    #[serde(rename = "SID")]
    pub sid: String,
    pub principal_type: PrincipalType,
    /// The principal *name* (user name or group display name). The key says
    /// Id for compatibility with the template format.
    pub principal_id: String,
    pub permission_set_name: String,
    /// Symbolic targets: account IDs, OU IDs (`:*` suffix for nested
    /// descent), or the organization root.
    pub target: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalType {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "GROUP")]
    Group,
}

impl PrincipalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalType::User => "USER",
            PrincipalType::Group => "GROUP",
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
