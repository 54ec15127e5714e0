use async_graphql::{Context, ErrorExtensions};

use crate::error::AppError;
use crate::service::{OwnerService, PetService};

pub trait ContextExt {
    fn owner_service(&self) -> &OwnerService;
    fn pet_service(&self) -> &PetService;
}

impl ContextExt for Context<'_> {
    fn owner_service(&self) -> &OwnerService {
        self.data_unchecked()
    }

    fn pet_service(&self) -> &PetService {
        self.data_unchecked()
    }
}

pub trait ResultExt<T> {
    /// Convert a service error into a GraphQL error carrying `extensions.code`.
    fn extend_gql(self) -> async_graphql::Result<T>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn extend_gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}
