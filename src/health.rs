//! Home page and health-check handlers.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store serve reads? Failure → pulled from load-balancer. |

use std::sync::Arc;

use tracing::warn;

use crate::handler::Handler;
use crate::store::{RecipeStore, StoreError};
use crate::{Request, Response, Status};

/// `GET /`.
pub async fn home(_req: Request) -> Response {
    Response::text("This is my home page")
}

/// Always `200 OK` with body `"ok"`. No dependencies on purpose: if the
/// process can answer HTTP at all, it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` while the store answers a lookup,
/// `503 Service Unavailable` once it stops doing so.
///
/// The lookup is for the empty id, which no recipe can have, so a healthy
/// store answers `NotFound` without copying anything.
pub fn readiness(store: Arc<dyn RecipeStore>) -> impl Handler {
    move |_req: Request| {
        let store = Arc::clone(&store);
        async move {
            match store.get("") {
                Ok(_) | Err(StoreError::NotFound { .. }) => Response::text("ready"),
                Err(e) => {
                    warn!("readiness check failed: {e}");
                    Response::status(Status::ServiceUnavailable)
                }
            }
        }
    }
}
