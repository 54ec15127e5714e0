//! Owner CRUD.

use super::RequestValidator;
use crate::error::AppError;
use crate::model::{NewOwner, Owner, OwnerChanges};
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct OwnerService {
    store: Arc<dyn Store>,
}

impl OwnerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persist a new owner; it starts with no pets.
    pub async fn create(&self, input: NewOwner) -> Result<Owner, AppError> {
        RequestValidator::new_owner(&input)?;
        let owner = self.store.insert_owner(&input).await?;
        tracing::info!(owner_id = owner.id, "owner created");
        Ok(owner)
    }

    pub async fn find_all(&self) -> Result<Vec<Owner>, AppError> {
        self.store.list_owners().await
    }

    pub async fn find_one(&self, id: i32) -> Result<Option<Owner>, AppError> {
        self.store.find_owner(id).await
    }

    /// Apply the provided fields, then reload. Fails with `NotFound` when no such owner exists.
    pub async fn update(&self, id: i32, changes: OwnerChanges) -> Result<Owner, AppError> {
        RequestValidator::owner_changes(&changes)?;
        if !changes.is_empty() {
            self.store.update_owner(id, &changes).await?;
        }
        let owner = self.find_one(id).await?.ok_or(AppError::NotFound("Owner"))?;
        tracing::info!(owner_id = id, "owner updated");
        Ok(owner)
    }

    /// Returns false when nothing matched. Pets of the owner are kept and lose their owner.
    pub async fn remove(&self, id: i32) -> Result<bool, AppError> {
        let deleted = self.store.delete_owner(id).await?;
        if deleted {
            tracing::info!(owner_id = id, "owner deleted");
        }
        Ok(deleted)
    }
}
