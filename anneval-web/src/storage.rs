//! Audio file store
//!
//! Uploaded announcement recordings live as plain files under the root
//! folder's audio-files directory and are served under /audio/{name}.
//! Deleting a file is independent of sessions: a session referencing a
//! deleted file keeps a dangling URL.

use anneval_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One stored audio file as listed on the admin page
#[derive(Debug, Clone, Serialize)]
pub struct AudioFile {
    pub name: String,
    /// Public address the session row stores
    pub url: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Generate a stored file name: `{unix_millis}-{random}.{ext}`.
///
/// Keeps upload names from colliding and strips whatever the client called
/// the file; only the extension survives.
pub fn generate_file_name(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_ascii_lowercase();

    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), &random[..12], ext)
}

/// Reject file names that could escape the audio directory
pub fn validate_file_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name.len() < 255
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !name.contains("..");

    if ok {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Invalid file name: {}", name)))
    }
}

/// Write an uploaded file to the audio directory, returning its stored name
pub async fn save_file(audio_dir: &Path, stored_name: &str, bytes: &[u8]) -> Result<()> {
    let path = audio_dir.join(stored_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// List stored audio files, newest first
pub async fn list_files(audio_dir: &Path) -> Result<Vec<AudioFile>> {
    let mut files = Vec::new();

    let mut entries = tokio::fs::read_dir(audio_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue, // skip non-UTF-8 names
        };

        let created_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        files.push(AudioFile {
            url: format!("/audio/{}", name),
            name,
            size: metadata.len(),
            created_at,
        });
    }

    files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(files)
}

/// Delete a stored audio file by name
pub async fn delete_file(audio_dir: &Path, name: &str) -> Result<()> {
    validate_file_name(name)?;

    let path: PathBuf = audio_dir.join(name);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::NotFound(format!("Audio file: {}", name)))
        }
        Err(e) => Err(e.into()),
    }
}
