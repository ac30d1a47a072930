//! Audio file upload, listing and deletion
//!
//! Validation happens before any write: non-audio content and files over
//! 50 MB are rejected without touching the disk. Deleting a file is not
//! coordinated with sessions referencing it; such sessions keep a
//! dangling URL.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use tracing::{info, warn};

use crate::api::ApiError;
use crate::storage::{self, AudioFile};
use crate::{AppState, MAX_AUDIO_BYTES};
use anneval_common::Error;

/// GET /api/audio
pub async fn list_audio_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<AudioFile>>, ApiError> {
    let files = storage::list_files(&state.audio_dir).await?;
    Ok(Json(files))
}

/// POST /api/audio (multipart, field "file")
pub async fn upload_audio_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidInput("Upload is missing a file name".to_string()))?;

        let declared_type = field.content_type().map(str::to_string);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidInput(format!("Failed to read upload: {}", e)))?;

        if bytes.len() > MAX_AUDIO_BYTES {
            return Err(Error::InvalidInput(format!(
                "File exceeds the 50 MB limit ({} bytes)",
                bytes.len()
            ))
            .into());
        }

        if !is_audio(declared_type.as_deref(), &bytes) {
            return Err(Error::InvalidInput(
                "Only audio files can be uploaded".to_string(),
            )
            .into());
        }

        let stored_name = storage::generate_file_name(&original_name);
        storage::save_file(&state.audio_dir, &stored_name, &bytes).await?;
        info!(
            "Uploaded audio file {} ({} bytes) as {}",
            original_name,
            bytes.len(),
            stored_name
        );

        let files = storage::list_files(&state.audio_dir).await?;
        let file = files
            .into_iter()
            .find(|f| f.name == stored_name)
            .ok_or_else(|| Error::Internal("Uploaded file not found after write".to_string()))?;

        return Ok(Json(file));
    }

    Err(Error::InvalidInput("No file field in upload".to_string()).into())
}

/// DELETE /api/audio/:name
pub async fn delete_audio_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    storage::delete_file(&state.audio_dir, &name).await?;
    warn!("Deleted audio file {} (sessions referencing it now dangle)", name);

    Ok(Json(serde_json::json!({ "deleted": name })))
}

/// Audio check: the declared content type, or content sniffing when the
/// declaration is absent or generic.
fn is_audio(declared_type: Option<&str>, bytes: &[u8]) -> bool {
    if let Some(mime) = declared_type {
        if mime.starts_with("audio/") {
            return true;
        }
        // Browsers send some audio containers as video/* (e.g. mp4/m4a)
        if mime == "application/octet-stream" || mime.starts_with("video/") {
            return sniff_audio(bytes);
        }
        return false;
    }

    sniff_audio(bytes)
}

fn sniff_audio(bytes: &[u8]) -> bool {
    infer::get(bytes)
        .map(|kind| kind.matcher_type() == infer::MatcherType::Audio)
        .unwrap_or(false)
}
