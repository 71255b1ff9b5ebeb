//! Upload form and search handlers
//!
//! `POST /search`: read upload → validate name → store → annotate → render.
//! A rejected upload re-renders the form and touches neither storage nor
//! the vision service.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use super::ui;
use crate::error::SearchResult;
use crate::storage::UploadRequest;
use crate::validators::{self, ALLOWED_EXTENSIONS};
use crate::AppState;

/// Form field carrying the image
pub const FILE_FIELD: &str = "file";

/// Why an upload never reached storage
#[derive(Debug)]
struct Rejection {
    status: StatusCode,
    message: String,
}

impl Rejection {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn render(self) -> Response {
        (self.status, ui::upload_form(Some(&self.message))).into_response()
    }
}

/// GET / and GET /search
pub async fn index() -> Html<String> {
    ui::upload_form(None)
}

/// POST /search
pub async fn search(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> SearchResult<Response> {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(rejection) => {
            info!(reason = %rejection.message, "Upload rejected");
            return Ok(rejection.render());
        }
    };

    if !validators::is_allowed(&upload.file_name) {
        info!(file_name = %upload.file_name, "Upload rejected: extension not allowed");
        return Ok(Rejection::new(
            StatusCode::OK,
            format!(
                "\"{}\" is not a supported image. Allowed types: {}",
                upload.file_name,
                ALLOWED_EXTENSIONS.join(", ")
            ),
        )
        .render());
    }

    let asset = state.storage.store(&upload).await?;
    info!(
        file_name = %asset.file_name,
        bytes = upload.bytes.len(),
        "Upload accepted"
    );

    let result = state.annotator.annotate(&asset.path).await?;

    Ok(ui::search_results(&asset, &result).into_response())
}

/// Pull the `file` field out of the multipart body
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadRequest, Rejection> {
    let mut multipart = multipart.map_err(|e| Rejection::new(e.status(), e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Rejection::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(Rejection::new(StatusCode::OK, "No file selected"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Rejection::new(e.status(), e.body_text()))?;

        return Ok(UploadRequest {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(Rejection::new(StatusCode::OK, "No file selected"))
}
