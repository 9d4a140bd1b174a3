//! Live-state index of pipeline-owned permission sets.

use std::collections::HashMap;

use idc_aws::{ApiError, SsoContext};

/// Tag key marking a permission set as managed by this pipeline. The value
/// is ignored on match; created sets carry `SSOPipeline=true`.
pub const OWNERSHIP_TAG_KEY: &str = "SSOPipeline";

/// Name → ARN map of the live permission sets under pipeline control.
///
/// An untagged permission set stays out of the index even when its name
/// matches a template; the later create attempt then fails with a name
/// conflict instead of silently taking the set over.
#[derive(Debug, Clone, Default)]
pub struct LiveIndex {
    by_name: HashMap<String, String>,
}

impl LiveIndex {
    /// Build an index from already-resolved entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            by_name: entries.into_iter().collect(),
        }
    }

    pub fn arn_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_name
            .iter()
            .map(|(name, arn)| (name.as_str(), arn.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Enumerate the tenant's permission sets and index the pipeline-owned ones
/// by name.
pub async fn build_live_index(ctx: &SsoContext) -> Result<LiveIndex, ApiError> {
    let mut arns = Vec::new();
    let mut pages = ctx
        .client
        .list_permission_sets()
        .instance_arn(&ctx.instance_arn)
        .into_paginator()
        .send();
    while let Some(page) = pages.next().await {
        let page = page.map_err(|e| ApiError::from_sdk("sso:ListPermissionSets", e))?;
        arns.extend(page.permission_sets().iter().cloned());
    }

    let mut by_name = HashMap::new();
    for arn in arns {
        if !is_pipeline_owned(ctx, &arn).await? {
            continue;
        }
        let name = describe_name(ctx, &arn).await?;
        by_name.insert(name, arn);
    }

    tracing::info!(owned = by_name.len(), "live permission set index built");
    Ok(LiveIndex { by_name })
}

async fn is_pipeline_owned(ctx: &SsoContext, arn: &str) -> Result<bool, ApiError> {
    let mut pages = ctx
        .client
        .list_tags_for_resource()
        .instance_arn(&ctx.instance_arn)
        .resource_arn(arn)
        .into_paginator()
        .send();

    while let Some(page) = pages.next().await {
        let page = page.map_err(|e| ApiError::from_sdk("sso:ListTagsForResource", e))?;
        if page.tags().iter().any(|tag| tag.key() == OWNERSHIP_TAG_KEY) {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn describe_name(ctx: &SsoContext, arn: &str) -> Result<String, ApiError> {
    let resp = ctx
        .client
        .describe_permission_set()
        .instance_arn(&ctx.instance_arn)
        .permission_set_arn(arn)
        .send()
        .await
        .map_err(|e| ApiError::from_sdk("sso:DescribePermissionSet", e))?;

    resp.permission_set()
        .and_then(|ps| ps.name())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Permanent(format!("sso:DescribePermissionSet: {arn} has no name")))
}
