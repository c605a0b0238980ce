use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use resume_extract::config::Config;
use resume_extract::routes::build_router;
use resume_extract::state::AppState;
use resume_extract::store::file::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    resume_extract::init_tracing();

    info!("Starting extraction API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Serving {} and {}",
        config.json_output_path.display(),
        config.pdf_path.display()
    );

    let state = AppState {
        artifact: FileStore::new(config.json_output_path.clone()),
        pdf_path: config.pdf_path.clone(),
        public_base_url: config.public_base_url.clone(),
    };

    // The front end is served from a different origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
