use std::path::PathBuf;

use idc_aws::ApiError;
use idc_core::PrincipalType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetResolutionError {
    #[error("target {target:?} is not a valid account, OU, or root expression")]
    InvalidFormat { target: String },

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum PrincipalResolutionError {
    #[error("{principal_type} {name:?} not found in the identity store")]
    NotFound {
        name: String,
        principal_type: PrincipalType,
    },

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("assignment {sid}: permission set {name:?} is not under pipeline control")]
    UnknownPermissionSet { sid: String, name: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
