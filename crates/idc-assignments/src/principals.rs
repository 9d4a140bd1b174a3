//! Principal name → directory ID resolution with run-scoped memoization.

use std::collections::HashMap;

use aws_sdk_identitystore::types::Filter;

use idc_aws::{ApiError, BoxFuture};
use idc_core::PrincipalType;

use crate::error::PrincipalResolutionError;

/// Read-only view of the identity store.
pub trait IdentityDirectory: Send + Sync {
    /// ID of the user with this user name, if any.
    fn find_user<'a>(
        &'a self,
        user_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>>;

    /// ID of the group with this display name, if any.
    fn find_group<'a>(
        &'a self,
        display_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>>;
}

/// Identity store backed by the Identity Store API.
pub struct AwsIdentityDirectory {
    client: aws_sdk_identitystore::Client,
    identity_store_id: String,
}

impl AwsIdentityDirectory {
    pub fn new(config: &aws_config::SdkConfig, identity_store_id: String) -> Self {
        Self {
            client: aws_sdk_identitystore::Client::new(config),
            identity_store_id,
        }
    }
}

impl IdentityDirectory for AwsIdentityDirectory {
    fn find_user<'a>(
        &'a self,
        user_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>> {
        Box::pin(async move {
            let resp = self
                .client
                .list_users()
                .identity_store_id(&self.identity_store_id)
                .filters(attribute_filter("UserName", user_name)?)
                .send()
                .await
                .map_err(|e| ApiError::from_sdk("identitystore:ListUsers", e))?;

            Ok(resp.users().first().map(|user| user.user_id().to_string()))
        })
    }

    fn find_group<'a>(
        &'a self,
        display_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>> {
        Box::pin(async move {
            let resp = self
                .client
                .list_groups()
                .identity_store_id(&self.identity_store_id)
                .filters(attribute_filter("DisplayName", display_name)?)
                .send()
                .await
                .map_err(|e| ApiError::from_sdk("identitystore:ListGroups", e))?;

            Ok(resp
                .groups()
                .first()
                .map(|group| group.group_id().to_string()))
        })
    }
}

fn attribute_filter(path: &str, value: &str) -> Result<Filter, ApiError> {
    Filter::builder()
        .attribute_path(path)
        .attribute_value(value)
        .build()
        .map_err(|e| ApiError::Permanent(format!("identitystore: invalid attribute filter: {e}")))
}

/// Resolves `(name, type)` pairs against an [`IdentityDirectory`], caching
/// results by name for the duration of the run.
pub struct PrincipalResolver<'a> {
    directory: &'a dyn IdentityDirectory,
    cache: HashMap<String, String>,
}

impl<'a> PrincipalResolver<'a> {
    pub fn new(directory: &'a dyn IdentityDirectory) -> Self {
        Self {
            directory,
            cache: HashMap::new(),
        }
    }

    pub async fn resolve(
        &mut self,
        name: &str,
        principal_type: PrincipalType,
    ) -> Result<String, PrincipalResolutionError> {
        if let Some(id) = self.cache.get(name) {
            return Ok(id.clone());
        }

        let found = match principal_type {
            PrincipalType::User => self.directory.find_user(name).await?,
            PrincipalType::Group => self.directory.find_group(name).await?,
        };

        let id = found.ok_or_else(|| PrincipalResolutionError::NotFound {
            name: name.to_string(),
            principal_type,
        })?;

        self.cache.insert(name.to_string(), id.clone());
        Ok(id)
    }
}
