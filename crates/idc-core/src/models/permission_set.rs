use serde::{Deserialize, Serialize};

/// Relay state applied when a template omits `RelayState`.
pub const DEFAULT_RELAY_STATE: &str = "https://console.aws.amazon.com/";

/// A permission set as declared in the repository.
///
/// One JSON file per permission set; `Name` is the primary key across the
/// whole repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionSetTemplate {
    pub name: String,
    pub description: String,
    /// ISO-8601 duration, e.g. `PT8H`.
    pub session_duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_state: Option<String>,
    /// AWS managed policy ARNs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_policies: Vec<String>,
    /// Inline policy document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_policy: Option<serde_json::Value>,
    /// Customer managed policy names (not ARNs).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customer_managed_policies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_boundary: Option<PermissionBoundary>,
}

impl PermissionSetTemplate {
    /// Relay state to apply, falling back to the console root.
    pub fn relay_state_or_default(&self) -> &str {
        self.relay_state.as_deref().unwrap_or(DEFAULT_RELAY_STATE)
    }

    /// The inline policy document, if the template carries a non-empty one.
    ///
    /// An absent key, `null`, and `{}` all mean "no inline policy".
    /// Templates exported from existing tenants often carry empty objects.
    pub fn custom_policy(&self) -> Option<&serde_json::Value> {
        match &self.custom_policy {
            Some(document) if !is_empty_document(document) => Some(document),
            _ => None,
        }
    }
}

fn is_empty_document(document: &serde_json::Value) -> bool {
    match document {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Permission boundary reference: an AWS managed policy by ARN, or a
/// customer managed policy by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PermissionBoundary {
    pub policy_type: BoundaryPolicyType,
    /// ARN for `AWS`, plain policy name for `CUSTOMER`.
    pub policy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicyType {
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "CUSTOMER")]
    Customer,
}
