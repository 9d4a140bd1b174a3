//! Set arithmetic for policy attachment reconciliation.

/// Attachments and detachments needed to move `current` to `desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyChanges {
    pub to_attach: Vec<String>,
    pub to_detach: Vec<String>,
}

impl PolicyChanges {
    pub fn is_empty(&self) -> bool {
        self.to_attach.is_empty() && self.to_detach.is_empty()
    }
}

/// Symmetric difference between the template's policy list and the live
/// attachment list. Order within each side follows input order; policy
/// lists are small, so linear scans.
pub fn policy_changes(desired: &[String], current: &[String]) -> PolicyChanges {
    PolicyChanges {
        to_attach: desired
            .iter()
            .filter(|policy| !current.contains(policy))
            .cloned()
            .collect(),
        to_detach: current
            .iter()
            .filter(|policy| !desired.contains(policy))
            .cloned()
            .collect(),
    }
}
