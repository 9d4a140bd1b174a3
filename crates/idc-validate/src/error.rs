use idc_aws::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("duplicate permission set name: {name}")]
    DuplicateName { name: String },

    #[error("duplicate assignment SID: {sid}")]
    DuplicateSid { sid: String },

    #[error("permission set {name}: custom policy rejected: {details}")]
    PolicyFinding { name: String, details: String },

    #[error("permission set {name}: managed policy {arn} does not resolve in IAM")]
    UnresolvedManagedPolicy { name: String, arn: String },

    #[error(
        "permission set {name}: customer managed permission boundary must be a policy name, not an ARN: {value}"
    )]
    BoundaryIsArn { name: String, value: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}
