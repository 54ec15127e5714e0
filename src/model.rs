//! Domain records returned by the services and the payloads they accept.

use chrono::{DateTime, Utc};

/// An owner with its pets eagerly loaded. Nested pets carry no owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    /// `None` when the relation was not loaded, as for the owner nested in a pet.
    pub pets: Option<Vec<Pet>>,
}

/// A pet with its owner eagerly loaded. A nested owner has its pets unloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub age: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner: Option<Box<Owner>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewOwner {
    pub name: String,
    pub email: Option<String>,
}

/// Partial owner update. `None` leaves a column unchanged; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct OwnerChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
}

impl OwnerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub age: Option<i32>,
    pub description: Option<String>,
    pub owner_id: Option<i32>,
}

/// Partial pet update. The owner is not reassignable here.
#[derive(Debug, Clone, Default)]
pub struct PetChanges {
    pub name: Option<String>,
    pub species: Option<String>,
    pub age: Option<Option<i32>>,
    pub description: Option<Option<String>>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.species.is_none() && self.age.is_none() && self.description.is_none()
    }
}
