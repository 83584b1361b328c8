//! The pantry server binary.
//!
//! ```text
//! RUST_LOG=debug PANTRY_ADDR=127.0.0.1:8080 cargo run
//!
//! curl -X POST localhost:8080/recipes \
//!      -d '{"name":"Tomato Soup","ingredients":[{"name":"tomato"}]}'
//! curl localhost:8080/recipes/tomato-soup
//! ```

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use pantry::{Config, Error, MemStore, RecipeStore, Server, app};

#[tokio::main]
async fn main() -> Result<(), Error> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    info!("initializing recipe store");
    let store: Arc<dyn RecipeStore> = Arc::new(MemStore::new());

    Server::bind(config.addr).serve(app(store)).await
}
