use ns_bridge::config::Settings;
use ns_bridge::mcp;
use ns_bridge::tools::AppState;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Existing environment variables take precedence over the file.
    let dotenv = dotenvy::dotenv();
    let settings = Settings::from_env()?;

    // Logs go to stderr; stdout belongs to the stdio transport.
    let default_level = if settings.is_development() {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to load .env"),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %settings.environment,
        base_url = %settings.ns_api_base_url,
        "starting ns-bridge"
    );

    let listen_addr = settings.listen_addr;
    let state = AppState::new(settings)?;

    match listen_addr {
        Some(addr) => mcp::serve_http(state, addr).await?,
        None => mcp::run_stdio(state).await?,
    }

    Ok(())
}
