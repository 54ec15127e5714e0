//! Pet CRUD. Creation checks that a referenced owner exists.

use super::RequestValidator;
use crate::error::AppError;
use crate::model::{NewPet, Pet, PetChanges};
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct PetService {
    store: Arc<dyn Store>,
}

impl PetService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persist a new pet, linked to `owner_id` when given. Fails with `NotFound` and writes
    /// nothing if that owner does not exist.
    pub async fn create(&self, input: NewPet) -> Result<Pet, AppError> {
        RequestValidator::new_pet(&input)?;
        if let Some(owner_id) = input.owner_id {
            if !self.store.owner_exists(owner_id).await? {
                return Err(AppError::NotFound("Owner"));
            }
        }
        let pet = self.store.insert_pet(&input).await?;
        tracing::info!(pet_id = pet.id, owner_id = ?input.owner_id, "pet created");
        Ok(pet)
    }

    pub async fn find_all(&self) -> Result<Vec<Pet>, AppError> {
        self.store.list_pets().await
    }

    pub async fn find_one(&self, id: i32) -> Result<Option<Pet>, AppError> {
        self.store.find_pet(id).await
    }

    /// Apply the provided fields, then reload. The owner link is left as is.
    pub async fn update(&self, id: i32, changes: PetChanges) -> Result<Pet, AppError> {
        RequestValidator::pet_changes(&changes)?;
        if !changes.is_empty() {
            self.store.update_pet(id, &changes).await?;
        }
        let pet = self.find_one(id).await?.ok_or(AppError::NotFound("Pet"))?;
        tracing::info!(pet_id = id, "pet updated");
        Ok(pet)
    }

    pub async fn remove(&self, id: i32) -> Result<bool, AppError> {
        let deleted = self.store.delete_pet(id).await?;
        if deleted {
            tracing::info!(pet_id = id, "pet deleted");
        }
        Ok(deleted)
    }
}
