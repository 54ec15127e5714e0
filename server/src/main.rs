//! Reads configuration, opens the store, and serves the GraphQL API.
//!
//! Run from repo root: `cargo run -p petstore-server`
//! Set `STORE=memory` to run without PostgreSQL.

use petstore_graphql::{app_router, open_store, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("petstore_graphql=info,petstore_server=info")
            }),
        )
        .init();

    let store = open_store(&settings).await?;
    let state = AppState::new(store);

    if let Some(path) = &settings.schema_file {
        tokio::fs::write(path, state.schema.sdl()).await?;
        tracing::info!(path = %path.display(), "wrote schema");
    }

    let app = app_router(state, &settings);
    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("server running on http://localhost:{}/graphql", port);
    axum::serve(listener, app).await?;
    Ok(())
}
