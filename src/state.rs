//! Shared application state for all routes.

use crate::graphql::{self, AppSchema};
use crate::service::{OwnerService, PetService};
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub schema: AppSchema,
}

impl AppState {
    /// Wire both services over `store` and build the schema around them.
    pub fn new(store: Arc<dyn Store>) -> Self {
        let schema = graphql::schema(OwnerService::new(store.clone()), PetService::new(store.clone()));
        Self { store, schema }
    }
}
