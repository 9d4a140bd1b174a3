//! idc-aws
//!
//! Shared AWS plumbing for the Identity Center pipeline: SDK configuration
//! with the pipeline retry posture, organization-role assumption, SSO
//! instance discovery, and the error taxonomy every remote call maps into.
//!
//! No component issues raw SDK calls outside the posture configured here;
//! every client is built from a config produced by this crate.

use std::future::Future;
use std::pin::Pin;

pub mod config;
pub mod error;
pub mod sso;

pub use crate::config::{MAX_API_ATTEMPTS, assume_org_role, load_pipeline_config};
pub use crate::error::{ApiError, WriteOutcome, is_transient_code};
pub use crate::sso::SsoContext;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
