use async_graphql::{Context, Object, Result};

use super::ext::{ContextExt, ResultExt};
use super::models::{CreatePetInput, Pet, UpdatePetInput};

#[derive(Default)]
pub struct PetQuery;

#[Object]
impl PetQuery {
    /// Every pet with its owner.
    async fn pets(&self, ctx: &Context<'_>) -> Result<Vec<Pet>> {
        let pets = ctx.pet_service().find_all().await.extend_gql()?;
        Ok(pets.into_iter().map(Into::into).collect())
    }

    /// The pet with this id, or null.
    async fn pet(&self, ctx: &Context<'_>, #[graphql(desc = "The id of the pet.")] id: i32) -> Result<Option<Pet>> {
        let pet = ctx.pet_service().find_one(id).await.extend_gql()?;
        Ok(pet.map(Into::into))
    }
}

#[derive(Default)]
pub struct PetMutation;

#[Object]
impl PetMutation {
    /// Fails with NOT_FOUND if `ownerId` does not reference an existing owner.
    async fn create_pet(&self, ctx: &Context<'_>, data: CreatePetInput) -> Result<Pet> {
        let pet = ctx.pet_service().create(data.into()).await.extend_gql()?;
        Ok(pet.into())
    }

    async fn update_pet(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the pet.")] id: i32,
        data: UpdatePetInput,
    ) -> Result<Pet> {
        let pet = ctx.pet_service().update(id, data.into()).await.extend_gql()?;
        Ok(pet.into())
    }

    async fn delete_pet(&self, ctx: &Context<'_>, #[graphql(desc = "The id of the pet.")] id: i32) -> Result<bool> {
        ctx.pet_service().remove(id).await.extend_gql()
    }
}
