mod camera;
mod config_manager;
mod handlers;
mod routes;
mod state;
mod translate;
mod vision;
mod websocket;
mod workflow;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config_manager::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snaplate_backend=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - try multiple paths
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.jsonld".to_string()),
        Some("conf.yaml".to_string()),
        exe_dir.join("conf.jsonld").to_str().map(|s| s.to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path);
                config = Some(cfg);
                break;
            }
            Err(e) => {
                debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    let config = config.unwrap_or_else(|| {
        warn!("No config file found (tried {:?}), using defaults", config_paths);
        Config::default()
    });

    let addr = config.system_config.bind_addr()?;
    let app_state = AppState::new(config)?;
    let app = routes::build_app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
