use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pantry::{
    ApiError, Dispatcher, Ingredient, MemStore, Method, Recipe, RecipeStore, Reply, Request,
    Status, StoreError,
};
use serde_json::{Value, json};

/// Forwards to a [`MemStore`] and counts every call that reaches it.
#[derive(Default)]
struct CountingStore {
    inner: MemStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl RecipeStore for CountingStore {
    fn add(&self, id: &str, recipe: Recipe) -> Result<(), StoreError> {
        self.hit();
        self.inner.add(id, recipe)
    }

    fn get(&self, id: &str) -> Result<Recipe, StoreError> {
        self.hit();
        self.inner.get(id)
    }

    fn list(&self) -> Result<HashMap<String, Recipe>, StoreError> {
        self.hit();
        self.inner.list()
    }

    fn update(&self, id: &str, recipe: Recipe) -> Result<(), StoreError> {
        self.hit();
        self.inner.update(id, recipe)
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.hit();
        self.inner.remove(id)
    }
}

/// A store whose every call fails with a non-`NotFound` error.
struct BrokenStore;

impl RecipeStore for BrokenStore {
    fn add(&self, _: &str, _: Recipe) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn get(&self, _: &str) -> Result<Recipe, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn list(&self) -> Result<HashMap<String, Recipe>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn update(&self, _: &str, _: Recipe) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn remove(&self, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }
}

const SOUP: &str = r#"{"name":"Tomato Soup","ingredients":[{"name":"tomato"}]}"#;

fn setup() -> (Arc<CountingStore>, Dispatcher) {
    let store = Arc::new(CountingStore::default());
    let dispatcher = Dispatcher::new(store.clone());
    (store, dispatcher)
}

async fn call(dispatcher: &Dispatcher, method: Method, path: &str, body: &str) -> (Status, Value) {
    let res = dispatcher
        .handle(Request::new(method, path.to_owned(), body.to_owned()))
        .await;
    let body = if res.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(res.body()).unwrap()
    };
    (res.status_code(), body)
}

#[tokio::test]
async fn list_on_empty_store() {
    let (_, dispatcher) = setup();

    let (status, body) = call(&dispatcher, Method::Get, "/recipes", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn create_stores_under_slug() {
    let (store, dispatcher) = setup();

    let res = dispatcher
        .handle(Request::new(Method::Post, "/recipes", SOUP))
        .await;
    assert_eq!(res.status_code(), Status::Created);
    assert_eq!(res.header("location"), Some("/recipes/tomato-soup"));

    let body: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body, json!({"status": "success", "id": "tomato-soup"}));

    assert_eq!(
        store.inner.get("tomato-soup").unwrap(),
        Recipe::new("Tomato Soup", [Ingredient::new("tomato")])
    );
}

#[tokio::test]
async fn full_lifecycle() {
    let (_, dispatcher) = setup();

    call(&dispatcher, Method::Post, "/recipes", SOUP).await;

    let (status, body) = call(&dispatcher, Method::Get, "/recipes/tomato-soup", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, serde_json::from_str::<Value>(SOUP).unwrap());

    let (status, body) = call(&dispatcher, Method::Get, "/recipes", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["tomato-soup"]["name"], "Tomato Soup");

    let updated = r#"{"name":"Tomato Soup","ingredients":[{"name":"tomato"},{"name":"basil"}]}"#;
    let (status, body) = call(&dispatcher, Method::Put, "/recipes/tomato-soup", updated).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({"status": "success"}));

    let (_, body) = call(&dispatcher, Method::Get, "/recipes/tomato-soup", "").await;
    assert_eq!(body["ingredients"], json!([{"name": "tomato"}, {"name": "basil"}]));

    let (status, _) = call(&dispatcher, Method::Delete, "/recipes/tomato-soup", "").await;
    assert_eq!(status, Status::Ok);

    let (status, _) = call(&dispatcher, Method::Get, "/recipes/tomato-soup", "").await;
    assert_eq!(status, Status::NotFound);
}

#[tokio::test]
async fn missing_ids_are_404_with_store_message() {
    let (_, dispatcher) = setup();

    let (status, body) = call(&dispatcher, Method::Get, "/recipes/does-not-exist", "").await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body, json!({"error": "recipe `does-not-exist` not found"}));

    let (status, _) = call(&dispatcher, Method::Delete, "/recipes/does-not-exist", "").await;
    assert_eq!(status, Status::NotFound);
}

#[tokio::test]
async fn update_of_missing_id_does_not_create() {
    let (store, dispatcher) = setup();

    let (status, _) = call(&dispatcher, Method::Put, "/recipes/tomato-soup", SOUP).await;
    assert_eq!(status, Status::NotFound);
    assert!(store.inner.list().unwrap().is_empty());
}

#[tokio::test]
async fn update_keeps_the_original_id() {
    let (store, dispatcher) = setup();
    call(&dispatcher, Method::Post, "/recipes", SOUP).await;

    let renamed = r#"{"name":"Gazpacho","ingredients":[]}"#;
    let (status, _) = call(&dispatcher, Method::Put, "/recipes/tomato-soup", renamed).await;
    assert_eq!(status, Status::Ok);

    let all = store.inner.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["tomato-soup"].name, "Gazpacho");
}

#[tokio::test]
async fn invalid_json_is_400_and_never_reaches_store() {
    let (store, dispatcher) = setup();

    for body in ["{not json", r#"{"name":"Soup"}"#, r#"{"name":1,"ingredients":[]}"#, ""] {
        let (status, payload) = call(&dispatcher, Method::Post, "/recipes", body).await;
        assert_eq!(status, Status::BadRequest, "{body}");
        assert!(payload["error"].as_str().unwrap().starts_with("invalid recipe"));
    }

    let (status, _) = call(&dispatcher, Method::Put, "/recipes/tomato-soup", "[]").await;
    assert_eq!(status, Status::BadRequest);

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn name_without_slug_is_400() {
    let (store, dispatcher) = setup();

    let (status, _) =
        call(&dispatcher, Method::Post, "/recipes", r#"{"name":"!!!","ingredients":[]}"#).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn non_latin_names_are_transliterated() {
    let (store, dispatcher) = setup();

    let res = dispatcher
        .handle(Request::new(
            Method::Post,
            "/recipes",
            r#"{"name":"Борщ","ingredients":[{"name":"свёкла"}]}"#,
        ))
        .await;
    assert_eq!(res.status_code(), Status::Created);
    assert_eq!(res.header("location"), Some("/recipes/borshch"));
    assert_eq!(store.inner.get("borshch").unwrap().name, "Борщ");

    let (status, body) = call(&dispatcher, Method::Get, "/recipes/borshch", "").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["ingredients"], json!([{"name": "свёкла"}]));

    let (status, body) =
        call(&dispatcher, Method::Post, "/recipes", r#"{"name":"Crème Brûlée","ingredients":[]}"#).await;
    assert_eq!(status, Status::Created);
    assert_eq!(body["id"], "creme-brulee");
}

#[tokio::test]
async fn unmatched_routes_never_reach_store() {
    let (store, dispatcher) = setup();

    for (method, path) in [
        (Method::Get, "/recipes/Invalid_ID!"),
        (Method::Put, "/recipes/Invalid_ID!"),
        (Method::Delete, "/recipes/tomato--soup"),
        (Method::Patch, "/recipes/tomato-soup"),
        (Method::Post, "/recipes/tomato-soup"),
        (Method::Delete, "/recipes"),
        (Method::Get, "/ingredients"),
    ] {
        let err = dispatcher.dispatch(method, path, SOUP.as_bytes()).unwrap_err();
        assert!(matches!(err, ApiError::RouteNotFound), "{method} {path}");

        let (status, _) = call(&dispatcher, method, path, SOUP).await;
        assert_eq!(status, Status::NotFound);
    }

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn store_failures_are_500_without_detail() {
    let dispatcher = Dispatcher::new(Arc::new(BrokenStore));

    for (method, path, body) in [
        (Method::Get, "/recipes", ""),
        (Method::Post, "/recipes", SOUP),
        (Method::Get, "/recipes/tomato-soup", ""),
        (Method::Put, "/recipes/tomato-soup", SOUP),
        (Method::Delete, "/recipes/tomato-soup", ""),
    ] {
        let (status, payload) = call(&dispatcher, method, path, body).await;
        assert_eq!(status, Status::InternalServerError, "{method} {path}");
        assert_eq!(payload, json!({"error": "internal server error"}));
    }
}

#[test]
fn dispatch_returns_typed_replies() {
    let (_, dispatcher) = setup();

    let created = dispatcher.dispatch(Method::Post, "/recipes", SOUP.as_bytes()).unwrap();
    assert_eq!(created, Reply::Created { id: "tomato-soup".to_owned() });

    let found = dispatcher.dispatch(Method::Get, "/recipes/tomato-soup", b"").unwrap();
    assert_eq!(found, Reply::Found(Recipe::new("Tomato Soup", [Ingredient::new("tomato")])));

    let removed = dispatcher.dispatch(Method::Delete, "/recipes/tomato-soup", b"").unwrap();
    assert_eq!(removed, Reply::Removed);
}

#[tokio::test]
async fn posting_the_same_name_twice_overwrites() {
    let (store, dispatcher) = setup();

    call(&dispatcher, Method::Post, "/recipes", SOUP).await;
    let again = r#"{"name":"tomato soup","ingredients":[{"name":"cream"}]}"#;
    let (status, _) = call(&dispatcher, Method::Post, "/recipes", again).await;
    assert_eq!(status, Status::Created);

    let all = store.inner.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["tomato-soup"].ingredients, vec![Ingredient::new("cream")]);
}
