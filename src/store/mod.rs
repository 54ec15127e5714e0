//! Persistence collaborator: the `Store` trait, its row types, and the two implementations.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::{Settings, StoreKind};
use crate::error::AppError;
use crate::model::{NewOwner, NewPet, Owner, OwnerChanges, Pet, PetChanges};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// CRUD primitives over owners and pets. Reads eagerly load one level of relations.
/// Deleting an owner clears the owner reference of its pets.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_owners(&self) -> Result<Vec<Owner>, AppError>;
    async fn find_owner(&self, id: i32) -> Result<Option<Owner>, AppError>;
    async fn owner_exists(&self, id: i32) -> Result<bool, AppError>;
    /// Returns the stored owner, with no pets.
    async fn insert_owner(&self, owner: &NewOwner) -> Result<Owner, AppError>;
    /// Applies only the set fields; a missing row is not an error.
    async fn update_owner(&self, id: i32, changes: &OwnerChanges) -> Result<(), AppError>;
    /// Returns whether a row was deleted.
    async fn delete_owner(&self, id: i32) -> Result<bool, AppError>;

    async fn list_pets(&self) -> Result<Vec<Pet>, AppError>;
    async fn find_pet(&self, id: i32) -> Result<Option<Pet>, AppError>;
    /// Returns the stored pet with its owner loaded.
    async fn insert_pet(&self, pet: &NewPet) -> Result<Pet, AppError>;
    async fn update_pet(&self, id: i32, changes: &PetChanges) -> Result<(), AppError>;
    async fn delete_pet(&self, id: i32) -> Result<bool, AppError>;
}

/// Open the store selected by `settings`: Postgres (creating the database and tables when
/// missing) or the in-process store.
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn Store>, AppError> {
    match settings.store {
        StoreKind::Postgres => {
            let options = settings.database.connect_options()?;
            ensure_database_exists(&options).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .connect_with(options)
                .await?;
            crate::migration::ensure_tables(&pool).await?;
            tracing::info!(
                host = %settings.database.host,
                database = %settings.database.database,
                "connected to postgres"
            );
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

/// Row of `owners`, also the JSON shape of a `row_to_json` include.
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub(crate) struct OwnerRecord {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
}

/// Row of `pets`, also the JSON shape of a `json_agg` include.
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub(crate) struct PetRecord {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub age: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<i32>,
}

impl OwnerRecord {
    /// `pets` is `None` when the relation was not loaded.
    pub(crate) fn into_owner(self, pets: Option<Vec<PetRecord>>) -> Owner {
        Owner {
            id: self.id,
            name: self.name,
            email: self.email,
            pets: pets.map(|pets| pets.into_iter().map(|p| p.into_pet(None)).collect()),
        }
    }
}

impl PetRecord {
    pub(crate) fn into_pet(self, owner: Option<OwnerRecord>) -> Pet {
        Pet {
            id: self.id,
            name: self.name,
            species: self.species,
            age: self.age,
            description: self.description,
            created_at: self.created_at,
            owner: owner.map(|o| Box::new(o.into_owner(None))),
        }
    }
}
