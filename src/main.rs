use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use birthday_fund_api::{app, config::Config, db, AppState, SERVICE_NAME};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        info!("no .env file loaded ({}), using process environment", e);
    }

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    tokio::fs::create_dir_all(&config.video_dir).await?;
    info!("Video storage at {}", config.video_dir);

    let state = AppState {
        db: pool,
        config: config.clone(),
    };
    let app = app::router(state)?;

    let addr = format!("{}:{}", config.host, config.port);
    info!("{} listening on {}", SERVICE_NAME, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
