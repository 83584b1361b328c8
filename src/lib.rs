//! # pantry
//!
//! A small HTTP resource server for recipes, kept in memory for the life of
//! the process.
//!
//! ## The pieces
//!
//! - [`RecipeStore`] — keyed CRUD over [`Recipe`] values. [`MemStore`] is the
//!   implementation: one `HashMap` behind one `RwLock`.
//! - [`Dispatcher`] — matches method + path against a fixed rule table,
//!   decodes bodies, makes one store call and maps the outcome to a status.
//! - [`Router`] and [`Server`] — matchit radix trees for the fixed routes,
//!   hyper underneath, graceful shutdown on SIGTERM / Ctrl-C.
//!
//! ## Endpoints
//!
//! | Method | Path | Result |
//! |---|---|---|
//! | `GET` | `/recipes` | `200`, `{id: recipe, …}` |
//! | `POST` | `/recipes` | `201`, `location: /recipes/{id}` |
//! | `GET` | `/recipes/{id}` | `200`, the recipe |
//! | `PUT` | `/recipes/{id}` | `200`, replaces an existing recipe |
//! | `DELETE` | `/recipes/{id}` | `200` |
//!
//! Ids are slugs of the recipe name: `"Tomato Soup"` is stored under
//! `tomato-soup`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pantry::{Dispatcher, MemStore, Method, RecipeStore, Router, Server, health};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pantry::Error> {
//!     let store: Arc<dyn RecipeStore> = Arc::new(MemStore::new());
//!
//!     let app = Router::new()
//!         .on(Method::Get, "/", health::home)
//!         .fallback(Dispatcher::new(store).into_handler());
//!
//!     Server::bind(([127, 0, 0, 1], 8080).into()).serve(app).await
//! }
//! ```

mod config;
mod dispatch;
mod error;
mod handler;
mod method;
mod model;
mod request;
mod response;
mod router;
mod server;
mod slug;
mod status;
mod store;

pub mod health;

use std::sync::Arc;

pub use config::Config;
pub use dispatch::{ApiError, COLLECTION, Dispatcher, Reply, Route};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use model::{Ingredient, Recipe};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use slug::{is_valid_id, slugify};
pub use status::Status;
pub use store::{MemStore, RecipeStore, StoreError};

/// The full application: home page, health checks, and the recipe dispatcher as
/// the fallback for everything else.
pub fn app(store: Arc<dyn RecipeStore>) -> Router {
    Router::new()
        .on(Method::Get, "/", health::home)
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz", health::readiness(Arc::clone(&store)))
        .fallback(Dispatcher::new(store).into_handler())
}
