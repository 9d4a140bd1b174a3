//! Repository-to-live convergence of permission sets.
//!
//! Each permission set converges facet by facet (general info, inline
//! policy, AWS managed policies, customer managed policies, permission
//! boundary) in that fixed order, and each facet update is idempotent
//! against the live state of just that facet. A non-benign failure anywhere
//! aborts the run; there is no rollback, the next run resumes convergence.

use aws_sdk_ssoadmin::types::{
    CustomerManagedPolicyReference, PermissionsBoundary, ProvisionTargetType, Tag,
};

use idc_aws::{ApiError, SsoContext, WriteOutcome};
use idc_core::{BoundaryPolicyType, PermissionSetCatalog, PermissionSetTemplate};

use crate::diff::policy_changes;
use crate::error::ReconcileError;
use crate::index::{LiveIndex, OWNERSHIP_TAG_KEY};

/// Counts of remote mutations applied by a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

pub struct PermissionSetReconciler<'a> {
    ctx: &'a SsoContext,
}

impl<'a> PermissionSetReconciler<'a> {
    pub fn new(ctx: &'a SsoContext) -> Self {
        Self { ctx }
    }

    /// Converge the tenant to the repository catalog.
    ///
    /// Creates and updates run first, in catalog order. Deletions of owned
    /// sets that no longer have a template run strictly after, so they work
    /// from a stable view.
    pub async fn reconcile(
        &self,
        catalog: &PermissionSetCatalog,
        live: &LiveIndex,
    ) -> Result<ReconcileSummary, ReconcileError> {
        let mut summary = ReconcileSummary::default();

        for template in catalog.iter() {
            match live.arn_for(&template.name) {
                Some(arn) => {
                    tracing::info!(
                        permission_set = %template.name,
                        "permission set exists in the tenant, updating"
                    );
                    self.update(template, arn).await?;
                    summary.updated += 1;
                }
                None => {
                    tracing::info!(
                        permission_set = %template.name,
                        "permission set missing from the tenant, creating"
                    );
                    let arn = self.create(template).await?;
                    self.update(template, &arn).await?;
                    summary.created += 1;
                }
            }
        }

        for (name, arn) in live.iter() {
            if catalog.get(name).is_none() {
                tracing::info!(
                    permission_set = %name,
                    "permission set no longer in the repository, deleting"
                );
                self.delete(name, arn).await?;
                summary.deleted += 1;
            }
        }

        Ok(summary)
    }

    /// Create the permission set shell with the ownership tag. Facet
    /// content is pushed by the subsequent update pass.
    async fn create(&self, template: &PermissionSetTemplate) -> Result<String, ReconcileError> {
        let tag = Tag::builder()
            .key(OWNERSHIP_TAG_KEY)
            .value("true")
            .build()
            .map_err(|e| {
                ApiError::Permanent(format!("sso:CreatePermissionSet: invalid tag: {e}"))
            })?;

        let resp = self
            .ctx
            .client
            .create_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .name(&template.name)
            .description(&template.description)
            .session_duration(&template.session_duration)
            .tags(tag)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("sso:CreatePermissionSet", e))?;

        let arn = resp
            .permission_set()
            .and_then(|ps| ps.permission_set_arn())
            .ok_or_else(|| ReconcileError::MissingCreatedArn {
                name: template.name.clone(),
            })?;

        tracing::info!(permission_set = %template.name, arn = %arn, "permission set created");
        Ok(arn.to_string())
    }

    /// Run the five facet updates in order, then trigger re-provisioning.
    async fn update(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        self.sync_general_info(template, arn).await?;
        self.sync_inline_policy(template, arn).await?;
        self.sync_managed_policies(template, arn).await?;
        self.sync_customer_managed_policies(template, arn).await?;
        self.sync_permission_boundary(template, arn).await?;
        self.provision(template, arn).await?;
        Ok(())
    }

    async fn delete(&self, name: &str, arn: &str) -> Result<(), ReconcileError> {
        self.ctx
            .client
            .delete_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("sso:DeletePermissionSet", e))?;

        tracing::info!(permission_set = %name, arn = %arn, "permission set deleted");
        Ok(())
    }

    // ── Facet: general information ───────────────────────────────────────

    async fn sync_general_info(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        self.ctx
            .client
            .update_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .description(&template.description)
            .session_duration(&template.session_duration)
            .relay_state(template.relay_state_or_default())
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("sso:UpdatePermissionSet", e))?;

        tracing::info!(permission_set = %template.name, "general information updated");
        Ok(())
    }

    // ── Facet: inline policy ─────────────────────────────────────────────

    async fn sync_inline_policy(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        match template.custom_policy() {
            Some(document) => {
                let rendered = serde_json::to_string(document)?;
                self.ctx
                    .client
                    .put_inline_policy_to_permission_set()
                    .instance_arn(&self.ctx.instance_arn)
                    .permission_set_arn(arn)
                    .inline_policy(rendered)
                    .send()
                    .await
                    .map_err(|e| ApiError::from_sdk("sso:PutInlinePolicyToPermissionSet", e))?;

                tracing::info!(permission_set = %template.name, "inline policy updated");
            }
            None => match self.delete_inline_policy(arn).await? {
                WriteOutcome::Applied => {
                    tracing::info!(permission_set = %template.name, "inline policy removed");
                }
                WriteOutcome::NoChange => {
                    tracing::info!(permission_set = %template.name, "no inline policy to remove");
                }
            },
        }
        Ok(())
    }

    async fn delete_inline_policy(&self, arn: &str) -> Result<WriteOutcome, ApiError> {
        match self
            .ctx
            .client
            .delete_inline_policy_from_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .send()
            .await
        {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(WriteOutcome::NoChange)
            }
            Err(err) => Err(ApiError::from_sdk(
                "sso:DeleteInlinePolicyFromPermissionSet",
                err,
            )),
        }
    }

    // ── Facet: AWS managed policies ──────────────────────────────────────

    async fn sync_managed_policies(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        let current = self.list_attached_managed_policies(arn).await?;
        let changes = policy_changes(&template.managed_policies, &current);

        for policy_arn in &changes.to_attach {
            match self.attach_managed_policy(arn, policy_arn).await? {
                WriteOutcome::Applied => {
                    tracing::info!(
                        permission_set = %template.name,
                        policy = %policy_arn,
                        "managed policy attached"
                    );
                }
                WriteOutcome::NoChange => {
                    tracing::info!(
                        permission_set = %template.name,
                        policy = %policy_arn,
                        "managed policy was already attached"
                    );
                }
            }
        }

        for policy_arn in &changes.to_detach {
            self.ctx
                .client
                .detach_managed_policy_from_permission_set()
                .instance_arn(&self.ctx.instance_arn)
                .permission_set_arn(arn)
                .managed_policy_arn(policy_arn)
                .send()
                .await
                .map_err(|e| ApiError::from_sdk("sso:DetachManagedPolicyFromPermissionSet", e))?;

            tracing::info!(
                permission_set = %template.name,
                policy = %policy_arn,
                "managed policy detached"
            );
        }

        Ok(())
    }

    async fn list_attached_managed_policies(&self, arn: &str) -> Result<Vec<String>, ApiError> {
        let mut attached = Vec::new();
        let mut pages = self
            .ctx
            .client
            .list_managed_policies_in_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| ApiError::from_sdk("sso:ListManagedPoliciesInPermissionSet", e))?;
            for policy in page.attached_managed_policies() {
                if let Some(policy_arn) = policy.arn() {
                    attached.push(policy_arn.to_string());
                }
            }
        }
        Ok(attached)
    }

    async fn attach_managed_policy(
        &self,
        arn: &str,
        policy_arn: &str,
    ) -> Result<WriteOutcome, ApiError> {
        match self
            .ctx
            .client
            .attach_managed_policy_to_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .managed_policy_arn(policy_arn)
            .send()
            .await
        {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conflict_exception()) =>
            {
                Ok(WriteOutcome::NoChange)
            }
            Err(err) => Err(ApiError::from_sdk(
                "sso:AttachManagedPolicyToPermissionSet",
                err,
            )),
        }
    }

    // ── Facet: customer managed policies ─────────────────────────────────

    async fn sync_customer_managed_policies(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        let current = self.list_customer_managed_policies(arn).await?;
        let changes = policy_changes(&template.customer_managed_policies, &current);

        for name in &changes.to_attach {
            match self.attach_customer_managed_policy(arn, name).await? {
                WriteOutcome::Applied => {
                    tracing::info!(
                        permission_set = %template.name,
                        policy = %name,
                        "customer managed policy attached"
                    );
                }
                WriteOutcome::NoChange => {
                    tracing::info!(
                        permission_set = %template.name,
                        policy = %name,
                        "customer managed policy was already attached"
                    );
                }
            }
        }

        for name in &changes.to_detach {
            self.ctx
                .client
                .detach_customer_managed_policy_reference_from_permission_set()
                .instance_arn(&self.ctx.instance_arn)
                .permission_set_arn(arn)
                .customer_managed_policy_reference(root_path_reference(name)?)
                .send()
                .await
                .map_err(|e| {
                    ApiError::from_sdk(
                        "sso:DetachCustomerManagedPolicyReferenceFromPermissionSet",
                        e,
                    )
                })?;

            tracing::info!(
                permission_set = %template.name,
                policy = %name,
                "customer managed policy detached"
            );
        }

        Ok(())
    }

    async fn list_customer_managed_policies(&self, arn: &str) -> Result<Vec<String>, ApiError> {
        let mut names = Vec::new();
        let mut pages = self
            .ctx
            .client
            .list_customer_managed_policy_references_in_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                ApiError::from_sdk(
                    "sso:ListCustomerManagedPolicyReferencesInPermissionSet",
                    e,
                )
            })?;
            for reference in page.customer_managed_policy_references() {
                names.push(reference.name().to_string());
            }
        }
        Ok(names)
    }

    async fn attach_customer_managed_policy(
        &self,
        arn: &str,
        name: &str,
    ) -> Result<WriteOutcome, ApiError> {
        match self
            .ctx
            .client
            .attach_customer_managed_policy_reference_to_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .customer_managed_policy_reference(root_path_reference(name)?)
            .send()
            .await
        {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conflict_exception()) =>
            {
                Ok(WriteOutcome::NoChange)
            }
            Err(err) => Err(ApiError::from_sdk(
                "sso:AttachCustomerManagedPolicyReferenceToPermissionSet",
                err,
            )),
        }
    }

    // ── Facet: permission boundary ───────────────────────────────────────

    async fn sync_permission_boundary(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        match &template.permission_boundary {
            Some(boundary) => {
                let payload = match boundary.policy_type {
                    BoundaryPolicyType::Aws => PermissionsBoundary::builder()
                        .managed_policy_arn(&boundary.policy)
                        .build(),
                    BoundaryPolicyType::Customer => PermissionsBoundary::builder()
                        .customer_managed_policy_reference(root_path_reference(&boundary.policy)?)
                        .build(),
                };

                match self.put_permission_boundary(arn, payload).await? {
                    WriteOutcome::Applied => {
                        tracing::info!(permission_set = %template.name, "permission boundary attached");
                    }
                    WriteOutcome::NoChange => {
                        tracing::info!(
                            permission_set = %template.name,
                            "permission boundary was already attached"
                        );
                    }
                }
            }
            None => match self.delete_permission_boundary(arn).await? {
                WriteOutcome::Applied => {
                    tracing::info!(permission_set = %template.name, "permission boundary removed");
                }
                WriteOutcome::NoChange => {
                    tracing::info!(
                        permission_set = %template.name,
                        "no permission boundary to remove"
                    );
                }
            },
        }
        Ok(())
    }

    async fn put_permission_boundary(
        &self,
        arn: &str,
        payload: PermissionsBoundary,
    ) -> Result<WriteOutcome, ApiError> {
        match self
            .ctx
            .client
            .put_permissions_boundary_to_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .permissions_boundary(payload)
            .send()
            .await
        {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conflict_exception()) =>
            {
                Ok(WriteOutcome::NoChange)
            }
            Err(err) => Err(ApiError::from_sdk(
                "sso:PutPermissionsBoundaryToPermissionSet",
                err,
            )),
        }
    }

    async fn delete_permission_boundary(&self, arn: &str) -> Result<WriteOutcome, ApiError> {
        match self
            .ctx
            .client
            .delete_permissions_boundary_from_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .send()
            .await
        {
            Ok(_) => Ok(WriteOutcome::Applied),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(WriteOutcome::NoChange)
            }
            Err(err) => Err(ApiError::from_sdk(
                "sso:DeletePermissionsBoundaryFromPermissionSet",
                err,
            )),
        }
    }

    // ── Re-provisioning ──────────────────────────────────────────────────

    /// Push the updated content to every account the set is already bound
    /// to. The service applies this asynchronously; the engine does not
    /// wait for convergence.
    async fn provision(
        &self,
        template: &PermissionSetTemplate,
        arn: &str,
    ) -> Result<(), ReconcileError> {
        self.ctx
            .client
            .provision_permission_set()
            .instance_arn(&self.ctx.instance_arn)
            .permission_set_arn(arn)
            .target_type(ProvisionTargetType::AllProvisionedAccounts)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("sso:ProvisionPermissionSet", e))?;

        tracing::info!(
            permission_set = %template.name,
            "re-provisioning in all bound accounts"
        );
        Ok(())
    }
}

/// `{Name, Path: "/"}` reference used for customer managed policy
/// attachment, detachment, and boundaries.
fn root_path_reference(name: &str) -> Result<CustomerManagedPolicyReference, ApiError> {
    CustomerManagedPolicyReference::builder()
        .name(name)
        .path("/")
        .build()
        .map_err(|e| ApiError::Permanent(format!("invalid customer managed policy reference: {e}")))
}
