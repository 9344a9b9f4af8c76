use actix_web::{error::BlockingError, web};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;
use walkdir::WalkDir;

/// Public URL prefix under which the media directory is served.
pub const MEDIA_URL_PREFIX: &str = "/media/";

pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
pub const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm"];
pub const PDF_TYPES: &[&str] = &["application/pdf"];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File system error: {0}")]
    Io(#[from] io::Error),
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
    #[error("No safe extension for content type '{0}'")]
    UnsupportedType(String),
}

/// A file received from a form, held in memory until validation passes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_one_of(&self, allowed: &[&str]) -> bool {
        allowed.contains(&self.content_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub public_url: String,
    pub file_name: String,
}

/// Maps a validated MIME type to a file extension. Not configurable on purpose.
pub fn mime_to_safe_extension(mime_type: &str) -> Option<&'static str> {
    let map: BTreeMap<&str, &str> = [
        ("application/pdf", "pdf"),
        ("image/gif", "gif"),
        ("image/jpeg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
        ("video/mp4", "mp4"),
        ("video/webm", "webm"),
    ].iter().cloned().collect();

    map.get(mime_type).cloned()
}

/// Resolves a `/media/...` URL to a path inside the media root.
/// Anything outside the root, or not a media URL at all, yields `None`.
pub fn url_to_path(media_root: &Path, public_url: &str) -> Option<PathBuf> {
    let relative = public_url.strip_prefix(MEDIA_URL_PREFIX)?;
    let relative = Path::new(relative);
    if relative.as_os_str().is_empty()
        || !relative.components().all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(media_root.join(relative))
}

/// Every regular file under the media root with the public URL it is served at.
/// Unreadable entries are logged and skipped.
pub fn list_stored_files(media_root: &Path) -> Vec<(PathBuf, String)> {
    let mut files = Vec::new();
    for entry in WalkDir::new(media_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable media entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(media_root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let url = format!("{}{}", MEDIA_URL_PREFIX, segments.join("/"));
        files.push((entry.into_path(), url));
    }
    files
}

/// Writes the file under `<media_root>/<prefix>/<uuid>.<ext>` and returns its public URL.
pub async fn upload_file(media_root: &Path, prefix: &str, file: UploadedFile) -> Result<StoredFile, StorageError> {
    let extension = mime_to_safe_extension(&file.content_type)
        .ok_or_else(|| StorageError::UnsupportedType(file.content_type.clone()))?;

    let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
    let directory = media_root.join(prefix);
    let final_path = directory.join(&stored_name);

    let UploadedFile { file_name, bytes, .. } = file;
    web::block(move || {
        fs::create_dir_all(&directory)?;
        fs::write(&final_path, bytes)
    }).await??;

    let public_url = format!("{}{}/{}", MEDIA_URL_PREFIX, prefix, stored_name);
    log::info!("Stored upload '{}' at {}", file_name, public_url);
    Ok(StoredFile { public_url, file_name })
}

/// Deletes the file behind a media URL. Returns `false` when there was nothing to delete.
pub async fn delete_file_by_url(media_root: &Path, public_url: &str) -> Result<bool, StorageError> {
    let path = match url_to_path(media_root, public_url) {
        Some(path) => path,
        None => return Ok(false),
    };

    let removed = web::block(move || match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }).await??;
    Ok(removed)
}

/// Best-effort delete used for cleanup paths; failures are only logged.
pub async fn discard_file(media_root: &Path, public_url: &str) {
    match delete_file_by_url(media_root, public_url).await {
        Ok(true) => log::info!("Removed stored file {}", public_url),
        Ok(false) => log::warn!("Stored file {} was already missing.", public_url),
        Err(e) => log::error!("Failed to remove stored file {}: {}", public_url, e),
    }
}
