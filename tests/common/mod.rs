#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gatehouse::router::init_router;
use gatehouse::routes;
use gatehouse::state::{AppState, build_app_state};
use gatehouse_auth::create_access_token;
use gatehouse_core::OperationRegistry;
use gatehouse_db::memory::MemoryStores;

/// The application over in-memory stores, with handles for seeding and
/// inspection.
pub struct TestApp {
    pub router: Router,
    pub stores: Arc<MemoryStores>,
    pub state: AppState,
}

/// Builds the full application exactly as `main` does, but over
/// [`MemoryStores`]. Must run inside a tokio runtime: state construction
/// spawns the audit workers.
pub fn test_app() -> TestApp {
    let stores = Arc::new(MemoryStores::new());
    test_app_with(stores)
}

pub fn test_app_with(stores: Arc<MemoryStores>) -> TestApp {
    test_app_with_specs(stores, routes::collect())
}

/// Like [`test_app_with`], but over an explicit route list. Suites append
/// routes here to exercise chain shapes the stock routes never declare.
pub fn test_app_with_specs(stores: Arc<MemoryStores>, specs: Vec<routes::RouteSpec>) -> TestApp {
    let entries: Vec<_> = specs
        .iter()
        .map(|spec| spec.entry().expect("route operation must parse"))
        .collect();
    let registry = Arc::new(OperationRegistry::build(&entries).expect("registry must build"));

    let state = build_app_state(
        registry,
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
    );
    let router = init_router(state.clone(), specs).expect("router must build");

    TestApp {
        router,
        stores,
        state,
    }
}

impl TestApp {
    /// A valid access token for a seeded user.
    pub fn token_for(&self, user_id: i64, username: &str) -> String {
        create_access_token(user_id, username, &self.state.jwt_config)
            .expect("token creation must succeed")
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
