//! Symbolic target expressions and their expansion over the organization.

use aws_sdk_organizations::types::{Account, AccountStatus};

use idc_aws::{ApiError, BoxFuture};

use crate::error::TargetResolutionError;

/// A parsed symbolic target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// A literal 12-digit account ID.
    Account(String),
    /// An organizational unit, optionally descending through nested OUs.
    Ou { id: String, recursive: bool },
    /// Every account in the organization.
    Root,
}

/// Parse a symbolic target.
///
/// Targets may carry a `<tag>:` prefix (e.g. `ACCOUNT:111122223333`); the
/// first `:`-separated segment is stripped when the full string does not
/// already parse. The tag's spelling is never inspected.
pub fn parse_target(raw: &str) -> Result<TargetKind, TargetResolutionError> {
    if let Some(kind) = parse_bare(raw) {
        return Ok(kind);
    }
    if let Some((_tag, rest)) = raw.split_once(':')
        && let Some(kind) = parse_bare(rest)
    {
        return Ok(kind);
    }
    Err(TargetResolutionError::InvalidFormat {
        target: raw.to_string(),
    })
}

fn parse_bare(value: &str) -> Option<TargetKind> {
    if is_account_id(value) {
        return Some(TargetKind::Account(value.to_string()));
    }
    if let Some(ou) = value.strip_suffix(":*") {
        if ou.starts_with("ou-") {
            return Some(TargetKind::Ou {
                id: ou.to_string(),
                recursive: true,
            });
        }
        return None;
    }
    if value.starts_with("ou-") {
        return Some(TargetKind::Ou {
            id: value.to_string(),
            recursive: false,
        });
    }
    if value == "Root" || value.starts_with("r-") {
        return Some(TargetKind::Root);
    }
    None
}

fn is_account_id(value: &str) -> bool {
    value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Read-only view of the organization tree.
///
/// The AWS implementation runs with the management role's credentials;
/// tests substitute an in-memory tree.
pub trait OrgDirectory: Send + Sync {
    /// Active accounts directly under `parent_id` (an OU or root ID).
    fn active_accounts_under<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, ApiError>>;

    /// Child OU IDs directly under `parent_id`.
    fn child_ous<'a>(&'a self, parent_id: &'a str)
    -> BoxFuture<'a, Result<Vec<String>, ApiError>>;

    /// Every active account in the organization.
    fn all_active_accounts(&self) -> BoxFuture<'_, Result<Vec<String>, ApiError>>;
}

/// Expand one parsed target into account IDs.
pub async fn resolve_target(
    directory: &dyn OrgDirectory,
    target: &TargetKind,
) -> Result<Vec<String>, TargetResolutionError> {
    match target {
        TargetKind::Account(id) => Ok(vec![id.clone()]),
        TargetKind::Ou {
            id,
            recursive: false,
        } => Ok(directory.active_accounts_under(id).await?),
        TargetKind::Ou {
            id,
            recursive: true,
        } => {
            tracing::info!(ou = %id, "nested target, descending through child OUs");
            Ok(collect_nested(directory, id.clone()).await?)
        }
        TargetKind::Root => Ok(directory.all_active_accounts().await?),
    }
}

/// Resolve every symbolic target of an assignment, in order. The union may
/// contain duplicates; the expander dedups the final records.
pub async fn resolve_all(
    directory: &dyn OrgDirectory,
    targets: &[String],
) -> Result<Vec<String>, TargetResolutionError> {
    let mut accounts = Vec::new();
    for raw in targets {
        let kind = parse_target(raw)?;
        accounts.extend(resolve_target(directory, &kind).await?);
    }
    Ok(accounts)
}

/// Depth-first walk: the OU's own accounts first, then each child subtree.
fn collect_nested(
    directory: &dyn OrgDirectory,
    ou_id: String,
) -> BoxFuture<'_, Result<Vec<String>, ApiError>> {
    Box::pin(async move {
        let mut accounts = directory.active_accounts_under(&ou_id).await?;
        for child in directory.child_ous(&ou_id).await? {
            accounts.extend(collect_nested(directory, child).await?);
        }
        Ok(accounts)
    })
}

/// Organization tree backed by the Organizations API.
pub struct AwsOrgDirectory {
    client: aws_sdk_organizations::Client,
}

impl AwsOrgDirectory {
    /// Build against a config carrying the management role's credentials.
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_organizations::Client::new(config),
        }
    }
}

impl OrgDirectory for AwsOrgDirectory {
    fn active_accounts_under<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, ApiError>> {
        Box::pin(async move {
            let mut accounts = Vec::new();
            let mut pages = self
                .client
                .list_accounts_for_parent()
                .parent_id(parent_id)
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page
                    .map_err(|e| ApiError::from_sdk("organizations:ListAccountsForParent", e))?;
                collect_active(page.accounts(), &mut accounts);
            }
            Ok(accounts)
        })
    }

    fn child_ous<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, ApiError>> {
        Box::pin(async move {
            let mut ous = Vec::new();
            let mut pages = self
                .client
                .list_organizational_units_for_parent()
                .parent_id(parent_id)
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|e| {
                    ApiError::from_sdk("organizations:ListOrganizationalUnitsForParent", e)
                })?;
                for ou in page.organizational_units() {
                    if let Some(id) = ou.id() {
                        ous.push(id.to_string());
                    }
                }
            }
            Ok(ous)
        })
    }

    fn all_active_accounts(&self) -> BoxFuture<'_, Result<Vec<String>, ApiError>> {
        Box::pin(async move {
            let mut accounts = Vec::new();
            let mut pages = self.client.list_accounts().into_paginator().send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|e| ApiError::from_sdk("organizations:ListAccounts", e))?;
                collect_active(page.accounts(), &mut accounts);
            }
            Ok(accounts)
        })
    }
}

fn collect_active(batch: &[Account], out: &mut Vec<String>) {
    for account in batch {
        if account.status() == Some(&AccountStatus::Active)
            && let Some(id) = account.id()
        {
            out.push(id.to_string());
        }
    }
}
