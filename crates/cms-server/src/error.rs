use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cms_blob::BlobError;
use cms_index::IndexError;
use cms_publish::PublishError;
use thiserror::Error;

/// Errors from server startup and configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("blob backend construction failed: {0}")]
    Blob(#[from] BlobError),

    #[error("index backend construction failed: {0}")]
    Index(#[from] IndexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Request-scoped errors rendered as JSON responses.
///
/// Validation failures carry the exact field list back to the client;
/// backend failures get a generic message (the detail goes to the log)
/// plus the failing stage, so clients know whether the file was stored.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("undecodable file payload: {0}")]
    BadFilePayload(String),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("index unavailable")]
    List(#[from] IndexError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::UnknownContentType(_) | Self::InvalidRecordId(_) => StatusCode::NOT_FOUND,
            Self::BadFilePayload(_) => StatusCode::BAD_REQUEST,
            Self::Publish(PublishError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Publish(PublishError::BlobStore { source }) => match source {
                BlobError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Publish(PublishError::IndexWrite { source, .. }) => index_status(source),
            Self::List(source) => index_status(source),
        }
    }
}

fn index_status(err: &IndexError) -> StatusCode {
    match err {
        IndexError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        IndexError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            // Client-fixable: return the precise problem list.
            ApiError::Publish(PublishError::Validation(v)) => serde_json::json!({
                "error": "validation failed",
                "content_type": v.content_type,
                "problems": v.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            }),
            ApiError::UnknownContentType(name) => serde_json::json!({
                "error": format!("unknown content type: {name}"),
            }),
            ApiError::InvalidRecordId(id) => serde_json::json!({
                "error": format!("invalid record id: {id}"),
            }),
            ApiError::BadFilePayload(detail) => serde_json::json!({
                "error": format!("undecodable file payload: {detail}"),
            }),
            // Backend failures: generic message, stage disclosed so the
            // client knows whether the file might already be stored.
            ApiError::Publish(err) => {
                tracing::error!(stage = %err.stage(), error = %err, "publish failed");
                serde_json::json!({
                    "error": "publish failed",
                    "stage": err.stage().to_string(),
                    "file_may_be_stored": err.blob_may_be_stored(),
                })
            }
            ApiError::List(err) => {
                tracing::error!(error = %err, "list failed");
                serde_json::json!({ "error": "index unavailable" })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_types::ContentType;
    use cms_validate::{FieldError, ValidationError};

    #[test]
    fn validation_maps_to_422() {
        let err = ApiError::Publish(PublishError::Validation(ValidationError {
            content_type: ContentType::Gallery,
            errors: vec![FieldError::Missing("title".to_string())],
        }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn timeouts_map_to_504() {
        let blob = ApiError::Publish(PublishError::BlobStore {
            source: BlobError::Timeout,
        });
        assert_eq!(blob.status(), StatusCode::GATEWAY_TIMEOUT);

        let index = ApiError::Publish(PublishError::IndexWrite {
            source: IndexError::Timeout,
            orphaned_blob: None,
        });
        assert_eq!(index.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn unavailable_maps_to_502() {
        let err = ApiError::Publish(PublishError::BlobStore {
            source: BlobError::Unavailable("down".to_string()),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unknown_type_and_missing_record_map_to_404() {
        assert_eq!(
            ApiError::UnknownContentType("newsletter".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Publish(PublishError::IndexWrite {
                source: IndexError::NotFound(cms_types::RecordId::new()),
                orphaned_blob: None,
            })
            .status(),
            StatusCode::NOT_FOUND
        );
    }
}
