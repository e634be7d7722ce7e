use std::env;

pub const DEFAULT_VIDEO_MAX_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub video_dir: String,
    pub video_max_bytes: u64,
    pub public_base_url: String,
    /// Exact origin to allow; every origin is allowed when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()?;

        Ok(Self {
            database_url: database_url()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            video_dir: env::var("VIDEO_DIR").unwrap_or_else(|_| "/var/uploads/videos".into()),
            video_max_bytes: match env::var("VIDEO_MAX_BYTES") {
                Ok(v) => v.parse()?,
                Err(_) => DEFAULT_VIDEO_MAX_BYTES,
            },
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
        })
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the discrete `DB_*` variables.
fn database_url() -> anyhow::Result<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        if !url.is_empty() {
            return Ok(url);
        }
    }

    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
    let user = env::var("DB_USER").unwrap_or_else(|_| "postgres".into());
    let password = env::var("DB_PASSWORD").unwrap_or_default();
    let name = required("DB_NAME")?;

    Ok(compose_database_url(&user, &password, &host, &port, &name))
}

fn compose_database_url(user: &str, password: &str, host: &str, port: &str, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}")
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {} (or DATABASE_URL)", key))
}
