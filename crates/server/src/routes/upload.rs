use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use service::errors::ServiceError;
use service::import_service;

use crate::errors::JsonApiError;
use crate::observability;
use crate::routes::ServerState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub products_added: usize,
}

fn upload_error(detail: String) -> JsonApiError {
    JsonApiError::new(StatusCode::BAD_REQUEST, "Upload Error", Some(detail))
}

#[utoipa::path(
    post, path = "/upload", tag = "upload",
    responses(
        (status = 201, description = "File processed, added count returned"),
        (status = 400, description = "Missing file, wrong extension or malformed JSON"),
        (status = 500, description = "Import Failed")
    )
)]
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), JsonApiError> {
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| upload_error(e.to_string()))?;
            file = Some((filename, data));
            break;
        }
    }

    let Some((filename, data)) = file else {
        return Err(upload_error("no file provided".into()));
    };
    if !filename.to_ascii_lowercase().ends_with(".json") {
        return Err(upload_error("only JSON files are allowed".into()));
    }

    match import_service::import_products(&state.db, &data).await {
        Ok(outcome) => {
            info!(
                file = %filename,
                added = outcome.added,
                skipped = outcome.skipped,
                "processed upload"
            );
            observability::IMPORT_RECORDS_ADDED_TOTAL.inc_by(outcome.added as u64);
            observability::IMPORT_RECORDS_SKIPPED_TOTAL.inc_by(outcome.skipped as u64);
            Ok((
                StatusCode::CREATED,
                Json(UploadResponse {
                    message: "File processed successfully",
                    products_added: outcome.added,
                }),
            ))
        }
        Err(ServiceError::Format(msg)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Format", Some(msg)))
        }
        Err(e) => {
            error!(err = %e, file = %filename, "import failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Import Failed", None))
        }
    }
}
