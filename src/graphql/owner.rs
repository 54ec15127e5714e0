use async_graphql::{Context, Object, Result};

use super::ext::{ContextExt, ResultExt};
use super::models::{CreateOwnerInput, Owner, UpdateOwnerInput};

#[derive(Default)]
pub struct OwnerQuery;

#[Object]
impl OwnerQuery {
    /// Every owner with its pets.
    async fn owners(&self, ctx: &Context<'_>) -> Result<Vec<Owner>> {
        let owners = ctx.owner_service().find_all().await.extend_gql()?;
        Ok(owners.into_iter().map(Into::into).collect())
    }

    /// The owner with this id, or null.
    async fn owner(&self, ctx: &Context<'_>, #[graphql(desc = "The id of the owner.")] id: i32) -> Result<Option<Owner>> {
        let owner = ctx.owner_service().find_one(id).await.extend_gql()?;
        Ok(owner.map(Into::into))
    }
}

#[derive(Default)]
pub struct OwnerMutation;

#[Object]
impl OwnerMutation {
    async fn create_owner(&self, ctx: &Context<'_>, data: CreateOwnerInput) -> Result<Owner> {
        let owner = ctx.owner_service().create(data.into()).await.extend_gql()?;
        Ok(owner.into())
    }

    async fn update_owner(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "The id of the owner.")] id: i32,
        data: UpdateOwnerInput,
    ) -> Result<Owner> {
        let owner = ctx.owner_service().update(id, data.into()).await.extend_gql()?;
        Ok(owner.into())
    }

    /// True if an owner was deleted. Its pets are kept without an owner.
    async fn delete_owner(&self, ctx: &Context<'_>, #[graphql(desc = "The id of the owner.")] id: i32) -> Result<bool> {
        ctx.owner_service().remove(id).await.extend_gql()
    }
}
