use idc_aws::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("create for {name} returned no permission set ARN")]
    MissingCreatedArn { name: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
