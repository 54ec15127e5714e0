//! Pet registry: a GraphQL CRUD backend for pets and their owners on PostgreSQL.

pub mod config;
pub mod error;
pub mod graphql;
pub mod migration;
pub mod model;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Settings, StoreKind};
pub use error::{AppError, ConfigError};
pub use graphql::{schema, AppSchema};
pub use migration::ensure_tables;
pub use routes::{app_router, common_routes_with_ready, graphql_routes};
pub use service::{OwnerService, PetService};
pub use state::AppState;
pub use store::{ensure_database_exists, open_store, MemoryStore, PgStore, Store};
