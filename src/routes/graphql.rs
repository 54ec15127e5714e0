//! GraphQL endpoint, optional GraphiQL page, and SDL export.

use crate::state::AppState;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post_service},
    Router,
};

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn sdl(State(state): State<AppState>) -> String {
    state.schema.sdl()
}

/// POST /graphql, GET /graphql (GraphiQL, when enabled), GET /schema.graphql.
pub fn graphql_routes(state: AppState, playground: bool) -> Router {
    let endpoint = GraphQL::new(state.schema.clone());
    let graphql = if playground {
        get(graphiql).post_service(endpoint)
    } else {
        post_service(endpoint)
    };
    Router::new()
        .route("/graphql", graphql)
        .route("/schema.graphql", get(sdl))
        .with_state(state)
}
