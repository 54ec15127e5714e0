//! GraphQL object and input types, mapped to and from the domain records.

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};

use crate::model;

#[derive(SimpleObject, Clone)]
pub struct Owner {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    /// Null when the owner is reached through a pet.
    pub pets: Option<Vec<Pet>>,
}

impl From<model::Owner> for Owner {
    fn from(value: model::Owner) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            pets: value.pets.map(|pets| pets.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Pet {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub age: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner: Option<Box<Owner>>,
}

impl From<model::Pet> for Pet {
    fn from(value: model::Pet) -> Self {
        Self {
            id: value.id,
            name: value.name,
            species: value.species,
            age: value.age,
            description: value.description,
            created_at: value.created_at,
            owner: value.owner.map(|o| Box::new((*o).into())),
        }
    }
}

#[derive(InputObject)]
pub struct CreateOwnerInput {
    pub name: String,
    pub email: Option<String>,
}

impl From<CreateOwnerInput> for model::NewOwner {
    fn from(value: CreateOwnerInput) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

/// Omitted fields are left unchanged; `email: null` clears the email.
#[derive(InputObject)]
pub struct UpdateOwnerInput {
    pub name: Option<String>,
    pub email: MaybeUndefined<String>,
}

impl From<UpdateOwnerInput> for model::OwnerChanges {
    fn from(value: UpdateOwnerInput) -> Self {
        Self {
            name: value.name,
            email: patch(value.email),
        }
    }
}

#[derive(InputObject)]
pub struct CreatePetInput {
    pub name: String,
    pub species: String,
    pub age: Option<i32>,
    pub description: Option<String>,
    pub owner_id: Option<i32>,
}

impl From<CreatePetInput> for model::NewPet {
    fn from(value: CreatePetInput) -> Self {
        Self {
            name: value.name,
            species: value.species,
            age: value.age,
            description: value.description,
            owner_id: value.owner_id,
        }
    }
}

/// Omitted fields are left unchanged; `null` clears `age` or `description`. The owner cannot be
/// changed here.
#[derive(InputObject)]
pub struct UpdatePetInput {
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: MaybeUndefined<i32>,
    pub description: MaybeUndefined<String>,
}

impl From<UpdatePetInput> for model::PetChanges {
    fn from(value: UpdatePetInput) -> Self {
        Self {
            name: value.name,
            species: value.species,
            age: patch(value.age),
            description: patch(value.description),
        }
    }
}

fn patch<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(v) => Some(Some(v)),
    }
}
