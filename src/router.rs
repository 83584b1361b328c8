//! Radix-tree request router with a fallback.
//!
//! Fixed routes (home page, health checks) live in one matchit tree per method.
//! Anything the trees do not match goes to the fallback handler, which is
//! where the recipe [`Dispatcher`](crate::Dispatcher) sits with its own rule
//! table.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Registrations chain:
///
/// ```rust,no_run
/// # use pantry::{health, Method, Router};
/// Router::new()
///     .on(Method::Get, "/", health::home)
///     .on(Method::Get, "/healthz", health::liveness);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallback: Option<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), fallback: None }
    }

    /// Register a handler for an exact method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Handler for every request no registered route matches.
    ///
    /// Without one, unmatched requests get a bare `404`.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    /// Routes one request to its handler and awaits the response.
    pub async fn handle(&self, req: Request) -> Response {
        match self.lookup(req.method, &req.path) {
            Some(handler) => handler.call(req).await,
            None => match &self.fallback {
                Some(fallback) => fallback.call(req).await,
                None => {
                    debug!(method = %req.method, path = %req.path, "no route");
                    Response::status(Status::NotFound)
                }
            },
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Option<BoxedHandler> {
        let tree = self.routes.get(&method)?;
        tree.at(path).ok().map(|matched| Arc::clone(matched.value))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
