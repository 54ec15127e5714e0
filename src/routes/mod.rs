//! HTTP routes: common probes plus the GraphQL endpoint.

mod common;
mod graphql;

pub use common::common_routes_with_ready;
pub use graphql::graphql_routes;

use crate::config::Settings;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application router.
pub fn app_router(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(graphql_routes(state, settings.playground))
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use rstest::{fixture, rstest};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn settings(playground: bool) -> Settings {
        let mut settings = Settings::from_lookup(|_| None).expect("default settings");
        settings.playground = playground;
        settings.max_body_bytes = 4096;
        settings
    }

    #[fixture]
    fn router() -> Router {
        app_router(AppState::new(Arc::new(MemoryStore::default())), &settings(true))
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn graphql_request(query: &str) -> Request<Body> {
        let body = json!({ "query": query }).to_string();
        Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .expect("request")
    }

    #[rstest]
    #[case("/health", json!({ "status": "ok" }))]
    #[case("/ready", json!({ "status": "ok", "database": "ok" }))]
    #[tokio::test]
    async fn probes_report_ok(router: Router, #[case] uri: &str, #[case] expected: Value) {
        let res = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn graphql_endpoint_executes_mutations(router: Router) {
        let res = router
            .oneshot(graphql_request(r#"mutation { createOwner(data: { name: "Ada" }) { id name pets { id } } }"#))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            json!({ "data": { "createOwner": { "id": 1, "name": "Ada", "pets": [] } } })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn graphql_errors_carry_code(router: Router) {
        let res = router
            .oneshot(graphql_request(r#"mutation { updatePet(id: 12, data: { name: "Rex" }) { id } }"#))
            .await
            .expect("response");
        let body = body_json(res).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
        assert_eq!(body["errors"][0]["message"], "Pet not found");
    }

    #[rstest]
    #[tokio::test]
    async fn schema_is_exported(router: Router) {
        let res = router
            .oneshot(Request::builder().uri("/schema.graphql").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let sdl = String::from_utf8(bytes.to_vec()).expect("utf-8");
        assert!(sdl.contains("createPet("));
        assert!(sdl.contains("input CreatePetInput"));
    }

    #[tokio::test]
    async fn playground_can_be_disabled() {
        let state = AppState::new(Arc::new(MemoryStore::default()));
        let enabled = app_router(state.clone(), &settings(true))
            .oneshot(Request::builder().uri("/graphql").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(enabled.status(), StatusCode::OK);

        let disabled = app_router(state, &settings(false))
            .oneshot(Request::builder().uri("/graphql").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(disabled.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[rstest]
    #[tokio::test]
    async fn oversized_bodies_are_rejected(router: Router) {
        let query = format!("{{ owners {{ id }} }} #{}", "x".repeat(8192));
        let res = router.oneshot(graphql_request(&query)).await.expect("response");
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
