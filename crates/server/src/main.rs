use anyhow::Context;
use axum::http::HeaderValue;
use db::DBService;
use server::{Deployment, routes};
use services::services::{config::Config, crm_sync::CrmSyncService};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let db = DBService::new(&config.database_url)
        .await
        .context("initializing database")?;
    let events = CrmSyncService::spawn(config.crm_webhook_url.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let deployment = Deployment::new(db, config, events);

    let cors = match deployment.config().cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>().context("parsing CORS_ORIGIN")?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    let app = routes::router(&deployment)
        .with_state(deployment)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
