use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    pub video_url: String,
    pub filename: String,
    pub size_bytes: u64,
    pub message: String,
}

/// `?download=1` (or `true`/`yes`) asks for an attachment disposition.
#[derive(Debug, Default, Deserialize)]
pub struct ServeVideoQuery {
    pub download: Option<String>,
}

impl ServeVideoQuery {
    pub fn wants_download(&self) -> bool {
        matches!(
            self.download.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        )
    }
}
