use frs_tracker::airtable::RemoteStore;
use frs_tracker::config::{RemoteConfig, TrackerConfig};
use frs_tracker::handlers::initial_load;
use frs_tracker::{load_data, resolve_data_path, router, AppState};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let config = TrackerConfig::default();
    let remote = RemoteConfig::from_env().map(|remote_config| RemoteStore::new(&remote_config));
    if remote.is_none() {
        info!("no record-store credentials in environment; running local-only");
    }

    let data = load_data(&data_path).await;
    let state = AppState::new(config, data_path, data, remote);

    initial_load(&state).await;

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
