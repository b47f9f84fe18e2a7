//! Video upload handler.

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use reel_models::{is_plain_filename, UploadResponse};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Multipart field carrying the video.
const FILE_FIELD: &str = "file";

/// Reduce a client-supplied filename to a bare name inside the upload dir.
///
/// Returns `None` for names that are empty or would escape the directory.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    let last = Path::new(last).file_name()?.to_str()?;
    if is_plain_filename(last) && !last.starts_with('.') {
        Some(last.to_string())
    } else {
        None
    }
}

/// Stream one multipart field into `out`, returning the bytes written.
async fn write_field<W>(field: &mut Field<'_>, out: &mut W) -> ApiResult<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(format!("Upload interrupted: {}", e)))?
    {
        out.write_all(&chunk)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;
        written += chunk.len() as u64;
    }
    out.flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;
    Ok(written)
}

/// Store an uploaded video under the upload directory.
///
/// The stored filename doubles as the `video_id`.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let filename = sanitize_filename(&raw_name)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid filename: {:?}", raw_name)))?;

        let upload_dir = &state.config.upload_dir;
        tokio::fs::create_dir_all(upload_dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create upload dir: {}", e)))?;

        let path = upload_dir.join(&filename);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create file: {}", e)))?;

        let written = match write_field(&mut field, &mut file).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %remove_err, "Failed to remove partial upload");
                }
                return Err(e);
            }
        };

        metrics::record_upload(written);
        info!(video_id = %filename, bytes = written, "Video uploaded");

        return Ok(Json(UploadResponse {
            video_id: filename,
            path: path.to_string_lossy().into_owned(),
        }));
    }

    Err(ApiError::bad_request(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}
