//! Recipe request dispatch.
//!
//! Three steps per request, none of them stateful:
//!
//! 1. [`Route::resolve`] matches method + path against a fixed rule table and
//!    pulls out the id. Ids are checked against the id grammar here, so a
//!    malformed id is an unmatched route and never becomes a store lookup.
//! 2. [`Dispatcher::dispatch`] decodes the body where the route needs one and
//!    makes exactly one [`RecipeStore`] call.
//! 3. [`Reply`] and [`ApiError`] turn the outcome into a [`Response`].
//!
//! | Method | Path | Route |
//! |---|---|---|
//! | `GET` | `/recipes` | [`Route::List`] |
//! | `POST` | `/recipes` | [`Route::Create`] |
//! | `GET` | `/recipes/{id}` | [`Route::Get`] |
//! | `PUT` | `/recipes/{id}` | [`Route::Update`] |
//! | `DELETE` | `/recipes/{id}` | [`Route::Remove`] |

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::handler::Handler;
use crate::method::Method;
use crate::model::Recipe;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::slug::{is_valid_id, slugify};
use crate::status::Status;
use crate::store::{RecipeStore, StoreError};

/// Path of the recipe collection.
pub const COLLECTION: &str = "/recipes";

// ── Route table ───────────────────────────────────────────────────────────────

/// A matched recipe route, borrowing its id from the request path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Route<'a> {
    List,
    Create,
    Get(&'a str),
    Update(&'a str),
    Remove(&'a str),
}

impl<'a> Route<'a> {
    /// Matches `method` and `path` against the rule table.
    ///
    /// `/recipes` and `/recipes/` both name the collection. An item path has
    /// exactly one segment after the collection and that segment must be a
    /// valid id. Everything else is `None`.
    pub fn resolve(method: Method, path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix(COLLECTION)?;
        let id = match rest {
            "" | "/" => None,
            _ => Some(rest.strip_prefix('/').filter(|id| is_valid_id(id))?),
        };

        match (method, id) {
            (Method::Get, None) => Some(Self::List),
            (Method::Post, None) => Some(Self::Create),
            (Method::Get, Some(id)) => Some(Self::Get(id)),
            (Method::Put, Some(id)) => Some(Self::Update(id)),
            (Method::Delete, Some(id)) => Some(Self::Remove(id)),
            _ => None,
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// A successful dispatch.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Listed(HashMap<String, Recipe>),
    Found(Recipe),
    Created { id: String },
    Updated,
    Removed,
}

/// Every way a dispatch can fail, as the client will see it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The body did not decode into a recipe, or no id can be derived from it.
    #[error("{0}")]
    BadRequest(String),

    #[error("404 page not found")]
    RouteNotFound,

    /// The route matched but the store has no such id.
    #[error(transparent)]
    NotFound(StoreError),

    /// Detail stays in the logs; the client gets a fixed message.
    #[error("internal server error")]
    Internal(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::BadRequest(_) => Status::BadRequest,
            Self::RouteNotFound | Self::NotFound(_) => Status::NotFound,
            Self::Internal(_) => Status::InternalServerError,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::NotFound(e),
            other => Self::Internal(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::BadRequest(format!("invalid recipe: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            error!(error = %source, "recipe store failure");
        }
        Json::with_status(self.status(), json!({ "error": self.to_string() })).into_response()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Self::Listed(recipes) => Json::new(recipes).into_response(),
            Self::Found(recipe) => Json::new(recipe).into_response(),
            Self::Created { id } => {
                let location = format!("{COLLECTION}/{id}");
                Json::with_status(Status::Created, json!({ "status": "success", "id": id }))
                    .header("location", &location)
                    .into_response()
            }
            Self::Updated | Self::Removed => Json::new(json!({ "status": "success" })).into_response(),
        }
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Routes recipe requests into a [`RecipeStore`].
///
/// Holds nothing but the store handle, so clones are cheap and every clone
/// talks to the same store.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn RecipeStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Resolves one request and performs its single store call.
    ///
    /// # Errors
    ///
    /// [`ApiError::RouteNotFound`] when nothing in the rule table matches,
    /// [`ApiError::BadRequest`] when a create or update body does not decode,
    /// and [`ApiError::NotFound`] / [`ApiError::Internal`] from the store.
    pub fn dispatch(&self, method: Method, path: &str, body: &[u8]) -> Result<Reply, ApiError> {
        let route = Route::resolve(method, path).ok_or(ApiError::RouteNotFound)?;
        debug!(?route, "resolved");

        match route {
            Route::List => Ok(Reply::Listed(self.store.list()?)),
            Route::Create => {
                let recipe = decode(body)?;
                let id = slugify(&recipe.name);
                if id.is_empty() {
                    return Err(ApiError::BadRequest(format!(
                        "recipe name {:?} does not produce a usable id",
                        recipe.name
                    )));
                }
                self.store.add(&id, recipe)?;
                Ok(Reply::Created { id })
            }
            Route::Get(id) => Ok(Reply::Found(self.store.get(id)?)),
            Route::Update(id) => {
                let recipe = decode(body)?;
                self.store.update(id, recipe)?;
                Ok(Reply::Updated)
            }
            Route::Remove(id) => {
                self.store.remove(id)?;
                Ok(Reply::Removed)
            }
        }
    }

    /// Dispatches a transport request and renders the outcome.
    pub async fn handle(&self, req: Request) -> Response {
        let outcome = self.dispatch(req.method(), req.path(), req.body());
        if let Err(e @ ApiError::BadRequest(_)) = &outcome {
            warn!(method = %req.method(), path = req.path(), "rejected: {e}");
        }
        outcome.into_response()
    }

    /// Wraps the dispatcher as a router handler, typically the
    /// [`Router::fallback`](crate::Router::fallback).
    pub fn into_handler(self) -> impl Handler {
        move |req: Request| {
            let dispatcher = self.clone();
            async move { dispatcher.handle(req).await }
        }
    }
}

fn decode(body: &[u8]) -> Result<Recipe, ApiError> {
    Ok(serde_json::from_slice(body)?)
}
