use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use cms_index::IndexStore;
use cms_publish::Upload;
use cms_types::{ContentItem, ContentType, FieldMap, RecordId};
use serde::Deserialize;

use crate::bootstrap::AppState;
use crate::error::ApiError;

/// Create-request body: metadata fields plus an optional base64 file.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub fields: FieldMap,
    #[serde(default)]
    pub file: Option<FilePayload>,
}

#[derive(Debug, Deserialize)]
pub struct FilePayload {
    pub name: String,
    pub data_base64: String,
}

/// Update-request body: the field patch to merge.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub patch: FieldMap,
}

fn parse_content_type(raw: &str) -> Result<ContentType, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::UnknownContentType(raw.to_string()))
}

fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidRecordId(raw.to_string()))
}

fn decode_file(payload: FilePayload) -> Result<Upload, ApiError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.data_base64.as_bytes())
        .map_err(|e| ApiError::BadFilePayload(e.to_string()))?;
    Ok(Upload::new(payload.name, bytes))
}

pub async fn health_handler() -> &'static str {
    "ok"
}

/// `POST /v1/content/{type}` — run a submission through the pipeline.
pub async fn create_handler(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<ContentItem>), ApiError> {
    let content_type = parse_content_type(&content_type)?;
    let file = request.file.map(decode_file).transpose()?;

    let item = state
        .publisher
        .publish(content_type, request.fields, file)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /v1/content/{type}` — all published records, newest first.
/// An empty list means nothing published yet, not an error.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
    let content_type = parse_content_type(&content_type)?;
    let items = state.index.list_all(content_type).await?;
    Ok(Json(items))
}

/// `PATCH /v1/content/{type}/{id}` — edit metadata fields on a record.
pub async fn update_handler(
    State(state): State<AppState>,
    Path((content_type, id)): Path<(String, String)>,
    Json(request): Json<UpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let content_type = parse_content_type(&content_type)?;
    let id = parse_record_id(&id)?;

    state.publisher.update(content_type, id, request.patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parsing() {
        assert!(parse_content_type("gallery").is_ok());
        assert!(matches!(
            parse_content_type("newsletter"),
            Err(ApiError::UnknownContentType(_))
        ));
    }

    #[test]
    fn record_id_parsing() {
        let id = RecordId::new();
        assert_eq!(parse_record_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_record_id("not-a-uuid"),
            Err(ApiError::InvalidRecordId(_))
        ));
    }

    #[test]
    fn file_decoding() {
        let payload = FilePayload {
            name: "a.jpg".to_string(),
            data_base64: base64::engine::general_purpose::STANDARD.encode(b"jpeg"),
        };
        let upload = decode_file(payload).unwrap();
        assert_eq!(upload.bytes, b"jpeg");

        let bad = FilePayload {
            name: "a.jpg".to_string(),
            data_base64: "!!not base64!!".to_string(),
        };
        assert!(matches!(
            decode_file(bad),
            Err(ApiError::BadFilePayload(_))
        ));
    }
}
