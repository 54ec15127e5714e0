//! In-process store with the same semantics as the PostgreSQL schema: serial ids that are never
//! reused, and `ON DELETE SET NULL` for a pet's owner.

use super::{OwnerRecord, PetRecord, Store};
use crate::error::AppError;
use crate::model::{NewOwner, NewPet, Owner, OwnerChanges, Pet, PetChanges};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    owners: BTreeMap<i32, OwnerRecord>,
    pets: BTreeMap<i32, PetRecord>,
    last_owner_id: i32,
    last_pet_id: i32,
}

impl Tables {
    fn owner_with_pets(&self, owner: &OwnerRecord) -> Owner {
        let pets = self
            .pets
            .values()
            .filter(|p| p.owner_id == Some(owner.id))
            .cloned()
            .collect();
        owner.clone().into_owner(Some(pets))
    }

    fn pet_with_owner(&self, pet: &PetRecord) -> Pet {
        let owner = pet.owner_id.and_then(|id| self.owners.get(&id)).cloned();
        pet.clone().into_pet(owner)
    }
}

/// Every primitive runs under one lock, so each is atomic like a single SQL statement.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables.read().map_err(|_| AppError::Internal("store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables.write().map_err(|_| AppError::Internal("store lock poisoned"))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, AppError> {
        let tables = self.read()?;
        Ok(tables.owners.values().map(|o| tables.owner_with_pets(o)).collect())
    }

    async fn find_owner(&self, id: i32) -> Result<Option<Owner>, AppError> {
        let tables = self.read()?;
        Ok(tables.owners.get(&id).map(|o| tables.owner_with_pets(o)))
    }

    async fn owner_exists(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.read()?.owners.contains_key(&id))
    }

    async fn insert_owner(&self, owner: &NewOwner) -> Result<Owner, AppError> {
        let mut tables = self.write()?;
        tables.last_owner_id += 1;
        let record = OwnerRecord {
            id: tables.last_owner_id,
            name: owner.name.clone(),
            email: owner.email.clone(),
        };
        tables.owners.insert(record.id, record.clone());
        Ok(record.into_owner(Some(Vec::new())))
    }

    async fn update_owner(&self, id: i32, changes: &OwnerChanges) -> Result<(), AppError> {
        let mut tables = self.write()?;
        if let Some(owner) = tables.owners.get_mut(&id) {
            if let Some(name) = &changes.name {
                owner.name = name.clone();
            }
            if let Some(email) = &changes.email {
                owner.email = email.clone();
            }
        }
        Ok(())
    }

    async fn delete_owner(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if tables.owners.remove(&id).is_none() {
            return Ok(false);
        }
        for pet in tables.pets.values_mut() {
            if pet.owner_id == Some(id) {
                pet.owner_id = None;
            }
        }
        Ok(true)
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, AppError> {
        let tables = self.read()?;
        Ok(tables.pets.values().map(|p| tables.pet_with_owner(p)).collect())
    }

    async fn find_pet(&self, id: i32) -> Result<Option<Pet>, AppError> {
        let tables = self.read()?;
        Ok(tables.pets.get(&id).map(|p| tables.pet_with_owner(p)))
    }

    async fn insert_pet(&self, pet: &NewPet) -> Result<Pet, AppError> {
        let mut tables = self.write()?;
        // Foreign key on owner_id.
        if let Some(owner_id) = pet.owner_id {
            if !tables.owners.contains_key(&owner_id) {
                return Err(AppError::NotFound("Owner"));
            }
        }
        tables.last_pet_id += 1;
        let record = PetRecord {
            id: tables.last_pet_id,
            name: pet.name.clone(),
            species: pet.species.clone(),
            age: pet.age,
            description: pet.description.clone(),
            created_at: Utc::now(),
            owner_id: pet.owner_id,
        };
        tables.pets.insert(record.id, record.clone());
        Ok(tables.pet_with_owner(&record))
    }

    async fn update_pet(&self, id: i32, changes: &PetChanges) -> Result<(), AppError> {
        let mut tables = self.write()?;
        if let Some(pet) = tables.pets.get_mut(&id) {
            if let Some(name) = &changes.name {
                pet.name = name.clone();
            }
            if let Some(species) = &changes.species {
                pet.species = species.clone();
            }
            if let Some(age) = changes.age {
                pet.age = age;
            }
            if let Some(description) = &changes.description {
                pet.description = description.clone();
            }
        }
        Ok(())
    }

    async fn delete_pet(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.write()?.pets.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::default()
    }

    fn new_pet(name: &str, owner_id: Option<i32>) -> NewPet {
        NewPet {
            name: name.into(),
            species: "cat".into(),
            owner_id,
            ..NewPet::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_owner_clears_pet_reference(store: MemoryStore) -> Result<(), AppError> {
        let owner = store.insert_owner(&NewOwner { name: "Ada".into(), email: None }).await?;
        let pet = store.insert_pet(&new_pet("Tom", Some(owner.id))).await?;
        assert_eq!(pet.owner.as_ref().map(|o| o.id), Some(owner.id));
        assert_eq!(pet.owner.as_ref().and_then(|o| o.pets.as_ref()), None);

        assert!(store.delete_owner(owner.id).await?);

        let pet = store.find_pet(pet.id).await?.expect("pet survives owner deletion");
        assert!(pet.owner.is_none());
        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_not_reused(store: MemoryStore) -> Result<(), AppError> {
        let first = store.insert_pet(&new_pet("Tom", None)).await?;
        assert!(store.delete_pet(first.id).await?);
        let second = store.insert_pet(&new_pet("Jerry", None)).await?;
        assert!(second.id > first.id);
        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn owner_pets_are_ordered_and_carry_no_owner(store: MemoryStore) -> Result<(), AppError> {
        let owner = store.insert_owner(&NewOwner { name: "Ada".into(), email: None }).await?;
        store.insert_pet(&new_pet("Tom", Some(owner.id))).await?;
        store.insert_pet(&new_pet("Stray", None)).await?;
        store.insert_pet(&new_pet("Felix", Some(owner.id))).await?;

        let owner = store.find_owner(owner.id).await?.expect("owner exists");
        let pets = owner.pets.expect("pets loaded");
        let names: Vec<_> = pets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Tom", "Felix"]);
        assert!(pets.iter().all(|p| p.owner.is_none()));
        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_dangling_owner(store: MemoryStore) {
        let err = store.insert_pet(&new_pet("Tom", Some(42))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Owner")));
        assert!(store.list_pets().await.expect("list pets").is_empty());
    }
}
