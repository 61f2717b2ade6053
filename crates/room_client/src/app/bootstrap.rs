use std::path::{Path, PathBuf};

use room_engine::{ConfigError, EngineConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV_VAR: &str = "ROOMKIT_CONFIG";

pub(crate) struct AppWiring {
    pub(crate) config: EngineConfig,
    pub(crate) script_path: PathBuf,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("usage: room_client <script.json>")]
    MissingScriptPath,
    #[error("config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Room Client Startup ===");

    let script_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(BootstrapError::MissingScriptPath)?;
    let config = match std::env::var_os(CONFIG_ENV_VAR) {
        Some(raw) => load_config(Path::new(&raw))?,
        None => EngineConfig::default(),
    };
    info!(
        script = %script_path.display(),
        min_zoom = config.min_zoom,
        max_zoom = config.max_zoom,
        max_stack_z = config.max_stack_z,
        "client_configured"
    );

    Ok(AppWiring {
        config,
        script_path,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_config(path: &Path) -> Result<EngineConfig, BootstrapError> {
    EngineConfig::load(path).map_err(|source| BootstrapError::Config {
        path: path.to_path_buf(),
        source,
    })
}
