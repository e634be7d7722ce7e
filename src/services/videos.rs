use std::path::{Path, PathBuf};

use axum::{
    extract::multipart::{Field, MultipartError},
    extract::Multipart,
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::{config::Config, models::video::VideoUploadResponse};

/// Multipart field carrying the upload.
pub const VIDEO_FIELD: &str = "video";
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm"];

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("No video file provided")]
    NoFile,
    #[error("File too large. Maximum size is {}MB", .max_bytes / (1024 * 1024))]
    TooLarge { max_bytes: u64 },
    #[error("Invalid file type. Allowed: .mp4, .mov, .avi, .webm")]
    UnsupportedType,
    #[error("Invalid filename")]
    InvalidFilename,
    #[error("Malformed upload: {0}")]
    Malformed(String),
    #[error("Video not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] std::io::Error),
}

impl VideoError {
    fn from_multipart(e: MultipartError, max_bytes: u64) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            VideoError::TooLarge { max_bytes }
        } else {
            VideoError::Malformed(e.body_text())
        }
    }
}

fn has_allowed_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validates the declared name and size of an upload before anything is written.
pub fn validate_upload(file_name: &str, size_bytes: u64, max_bytes: u64) -> Result<(), VideoError> {
    if size_bytes > max_bytes {
        return Err(VideoError::TooLarge { max_bytes });
    }
    if !has_allowed_extension(file_name) {
        return Err(VideoError::UnsupportedType);
    }
    Ok(())
}

/// Validates a requested file name; nothing here touches the filesystem.
pub fn validate_requested_name(name: &str) -> Result<(), VideoError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(VideoError::InvalidFilename);
    }
    if !has_allowed_extension(name) {
        return Err(VideoError::UnsupportedType);
    }
    Ok(())
}

/// Reduces a client-supplied file name to a safe single path segment that
/// `validate_requested_name` will later accept.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let mut name: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    while name.contains("..") {
        name = name.replace("..", ".");
    }
    name
}

/// `<unix millis>_<name>`: ordered by upload time, unique per name within a millisecond.
pub fn stored_name(original: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", now.timestamp_millis(), sanitize_file_name(original))
}

pub fn public_url(base_url: &str, stored_name: &str) -> String {
    format!("{}/api/videos/{}", base_url.trim_end_matches('/'), stored_name)
}

/// Inclusive byte range from a single-range `Range` header.
pub fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }
    let range = range.strip_prefix("bytes=")?;
    let mut parts = range.split('-');
    let start: u64 = parts.next()?.parse().ok()?;
    let end: u64 = parts
        .next()
        .and_then(|e| e.parse().ok())
        .unwrap_or(file_size - 1);
    if start > end || end >= file_size {
        return None;
    }
    Some((start, end))
}

/// Bytes to serve for a video request.
pub struct VideoContent {
    pub body: Vec<u8>,
    pub file_size: u64,
    pub range: Option<(u64, u64)>,
    pub content_type: &'static str,
}

pub struct VideoService;

impl VideoService {
    /// Streams the `video` field to disk, enforcing the size ceiling while reading.
    pub async fn upload(
        config: &Config,
        mut multipart: Multipart,
        now: DateTime<Utc>,
    ) -> Result<VideoUploadResponse, VideoError> {
        let max_bytes = config.video_max_bytes;

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| VideoError::from_multipart(e, max_bytes))?
        {
            if field.name() != Some(VIDEO_FIELD) {
                continue;
            }

            let original = field.file_name().ok_or(VideoError::NoFile)?.to_string();
            validate_upload(&original, 0, max_bytes)?;

            let dir = PathBuf::from(&config.video_dir);
            tokio::fs::create_dir_all(&dir).await?;

            let (filename, path, mut file) = create_unique(&dir, &original, now).await?;

            let written = match copy_field(&mut field, &mut file, &original, max_bytes).await {
                Ok(written) => written,
                Err(e) => {
                    drop(file);
                    discard(&path).await;
                    return Err(e);
                }
            };

            tracing::info!("stored video {} ({} bytes)", filename, written);

            return Ok(VideoUploadResponse {
                video_url: public_url(&config.public_base_url, &filename),
                filename,
                size_bytes: written,
                message: "Video uploaded successfully".into(),
            });
        }

        Err(VideoError::NoFile)
    }

    /// Resolves a stored video, honouring a single byte range when one is requested.
    pub async fn open(config: &Config, name: &str, range: Option<&str>) -> Result<VideoContent, VideoError> {
        validate_requested_name(name)?;

        let path = PathBuf::from(&config.video_dir).join(name);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) if m.is_file() => m,
            _ => return Err(VideoError::NotFound),
        };
        let file_size = metadata.len();

        let content_type = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or("application/octet-stream");

        if let Some((start, end)) = range.and_then(|r| parse_range(r, file_size)) {
            let mut file = tokio::fs::File::open(&path).await?;
            file.seek(std::io::SeekFrom::Start(start)).await?;
            let mut body = vec![0u8; (end - start + 1) as usize];
            file.read_exact(&mut body).await?;

            return Ok(VideoContent {
                body,
                file_size,
                range: Some((start, end)),
                content_type,
            });
        }

        let body = tokio::fs::read(&path).await?;
        Ok(VideoContent {
            body,
            file_size,
            range: None,
            content_type,
        })
    }
}

/// Attempts before giving up on finding a free name for one upload.
const NAME_ATTEMPTS: u32 = 16;

/// Opens a new file for the upload without replacing one that already exists.
async fn create_unique(
    dir: &Path,
    original: &str,
    now: DateTime<Utc>,
) -> Result<(String, PathBuf, tokio::fs::File), VideoError> {
    for attempt in 0..NAME_ATTEMPTS {
        let filename = if attempt == 0 {
            stored_name(original, now)
        } else {
            format!(
                "{}_{}_{}",
                now.timestamp_millis(),
                attempt,
                sanitize_file_name(original)
            )
        };
        let path = dir.join(&filename);

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((filename, path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(VideoError::Storage(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no free name for {original}"),
    )))
}

/// Copies one multipart field into `file`, enforcing the size ceiling. Returns bytes written.
async fn copy_field(
    field: &mut Field<'_>,
    file: &mut tokio::fs::File,
    original: &str,
    max_bytes: u64,
) -> Result<u64, VideoError> {
    let mut written: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| VideoError::from_multipart(e, max_bytes))?
    {
        written += chunk.len() as u64;
        validate_upload(original, written, max_bytes)?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(written)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("could not remove partial upload {}: {}", path.display(), e);
    }
}
