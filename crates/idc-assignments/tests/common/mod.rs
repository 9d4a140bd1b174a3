#![allow(dead_code)] // not every test binary uses every fake

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use idc_assignments::{IdentityDirectory, OrgDirectory};
use idc_aws::{ApiError, BoxFuture};

/// In-memory organization tree.
#[derive(Default)]
pub struct FakeOrg {
    pub accounts_by_parent: HashMap<String, Vec<String>>,
    pub ous_by_parent: HashMap<String, Vec<String>>,
    pub all_accounts: Vec<String>,
}

impl FakeOrg {
    pub fn with_parent(mut self, parent: &str, accounts: &[&str], ous: &[&str]) -> Self {
        self.accounts_by_parent.insert(
            parent.to_string(),
            accounts.iter().map(|s| s.to_string()).collect(),
        );
        self.ous_by_parent.insert(
            parent.to_string(),
            ous.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_all_accounts(mut self, accounts: &[&str]) -> Self {
        self.all_accounts = accounts.iter().map(|s| s.to_string()).collect();
        self
    }
}

impl OrgDirectory for FakeOrg {
    fn active_accounts_under<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, ApiError>> {
        let accounts = self
            .accounts_by_parent
            .get(parent_id)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(accounts) })
    }

    fn child_ous<'a>(
        &'a self,
        parent_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, ApiError>> {
        let ous = self
            .ous_by_parent
            .get(parent_id)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(ous) })
    }

    fn all_active_accounts(&self) -> BoxFuture<'_, Result<Vec<String>, ApiError>> {
        let accounts = self.all_accounts.clone();
        Box::pin(async move { Ok(accounts) })
    }
}

/// In-memory identity store that counts directory lookups.
#[derive(Default)]
pub struct FakeIdentity {
    pub users: HashMap<String, String>,
    pub groups: HashMap<String, String>,
    pub lookups: AtomicUsize,
}

impl FakeIdentity {
    pub fn with_user(mut self, name: &str, id: &str) -> Self {
        self.users.insert(name.to_string(), id.to_string());
        self
    }

    pub fn with_group(mut self, name: &str, id: &str) -> Self {
        self.groups.insert(name.to_string(), id.to_string());
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl IdentityDirectory for FakeIdentity {
    fn find_user<'a>(
        &'a self,
        user_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let id = self.users.get(user_name).cloned();
        Box::pin(async move { Ok(id) })
    }

    fn find_group<'a>(
        &'a self,
        display_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let id = self.groups.get(display_name).cloned();
        Box::pin(async move { Ok(id) })
    }
}
