//! GraphQL API surface: owner and pet resolvers merged into one schema.

use async_graphql::{extensions, EmptySubscription, MergedObject, Schema};

use crate::service::{OwnerService, PetService};

mod ext;
pub mod models;
mod owner;
mod pet;

pub use owner::{OwnerMutation, OwnerQuery};
pub use pet::{PetMutation, PetQuery};

#[derive(MergedObject, Default)]
pub struct Query(OwnerQuery, PetQuery);

#[derive(MergedObject, Default)]
pub struct Mutation(OwnerMutation, PetMutation);

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn schema(owners: OwnerService, pets: PetService) -> AppSchema {
    Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(owners)
        .data(pets)
        .extension(extensions::Tracing)
        .limit_depth(10)
        .limit_complexity(200)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};
    use async_graphql::Response;
    use rstest::{fixture, rstest};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[fixture]
    fn app_schema() -> AppSchema {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::default());
        schema(OwnerService::new(store.clone()), PetService::new(store))
    }

    async fn run(schema: &AppSchema, query: &str) -> Value {
        let res = schema.execute(query).await;
        assert!(res.errors.is_empty(), "unexpected errors: {:?}", res.errors);
        res.data.into_json().expect("data is json")
    }

    fn error_code(res: &Response) -> Option<String> {
        let ext = res.errors.first()?.extensions.as_ref()?;
        match ext.get("code")? {
            async_graphql::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_owner_then_query_by_id(app_schema: AppSchema) {
        let created = run(
            &app_schema,
            r#"mutation { createOwner(data: { name: "Ada", email: "ada@example.com" }) { id } }"#,
        )
        .await;
        let id = created["createOwner"]["id"].as_i64().expect("id");

        let found = run(
            &app_schema,
            &format!("{{ owner(id: {id}) {{ id name email pets {{ id }} }} }}"),
        )
        .await;
        assert_eq!(
            found,
            json!({ "owner": { "id": id, "name": "Ada", "email": "ada@example.com", "pets": [] } })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn missing_owner_is_null(app_schema: AppSchema) {
        let found = run(&app_schema, "{ owner(id: 41) { id } pet(id: 41) { id } }").await;
        assert_eq!(found, json!({ "owner": null, "pet": null }));
    }

    #[rstest]
    #[tokio::test]
    async fn create_pet_with_unknown_owner_is_not_found(app_schema: AppSchema) {
        let res = app_schema
            .execute(r#"mutation { createPet(data: { name: "Rex", species: "dog", ownerId: 9 }) { id } }"#)
            .await;
        assert_eq!(error_code(&res).as_deref(), Some("NOT_FOUND"));
        assert_eq!(res.errors[0].message, "Owner not found");

        let pets = run(&app_schema, "{ pets { id } }").await;
        assert_eq!(pets, json!({ "pets": [] }));
    }

    #[rstest]
    #[tokio::test]
    async fn pet_and_owner_are_eagerly_loaded(app_schema: AppSchema) {
        run(&app_schema, r#"mutation { createOwner(data: { name: "Ada" }) { id } }"#).await;
        let created = run(
            &app_schema,
            r#"mutation { createPet(data: { name: "Rex", species: "dog", age: 3, ownerId: 1 }) {
                id name createdAt owner { id name }
            } }"#,
        )
        .await;
        assert_eq!(created["createPet"]["owner"], json!({ "id": 1, "name": "Ada" }));
        assert!(created["createPet"]["createdAt"].is_string());

        let owners = run(&app_schema, "{ owners { name pets { name owner { id } } } }").await;
        assert_eq!(
            owners,
            json!({ "owners": [{ "name": "Ada", "pets": [{ "name": "Rex", "owner": null }] }] })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn owner_nested_in_a_pet_has_unloaded_pets(app_schema: AppSchema) {
        run(&app_schema, r#"mutation { createOwner(data: { name: "Ada" }) { id } }"#).await;
        run(
            &app_schema,
            r#"mutation { createPet(data: { name: "Rex", species: "dog", ownerId: 1 }) { id } }"#,
        )
        .await;

        let pet = run(&app_schema, "{ pet(id: 1) { owner { id pets { id } } } }").await;
        assert_eq!(pet, json!({ "pet": { "owner": { "id": 1, "pets": null } } }));

        let owner = run(&app_schema, "{ owner(id: 1) { pets { id } } }").await;
        assert_eq!(owner, json!({ "owner": { "pets": [{ "id": 1 }] } }));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_owner_keeps_its_pets(app_schema: AppSchema) {
        run(&app_schema, r#"mutation { createOwner(data: { name: "Ada" }) { id } }"#).await;
        run(
            &app_schema,
            r#"mutation { createPet(data: { name: "Rex", species: "dog", ownerId: 1 }) { id } }"#,
        )
        .await;

        let deleted = run(&app_schema, "mutation { deleteOwner(id: 1) }").await;
        assert_eq!(deleted, json!({ "deleteOwner": true }));

        let pet = run(&app_schema, "{ pet(id: 1) { name owner { id } } }").await;
        assert_eq!(pet, json!({ "pet": { "name": "Rex", "owner": null } }));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_ids_returns_false(app_schema: AppSchema) {
        let res = run(&app_schema, "mutation { deleteOwner(id: 5) deletePet(id: 5) }").await;
        assert_eq!(res, json!({ "deleteOwner": false, "deletePet": false }));
    }

    #[rstest]
    #[case(r#"mutation { updateOwner(id: 3, data: { name: "X" }) { id } }"#)]
    #[case(r#"mutation { updatePet(id: 3, data: { name: "X" }) { id } }"#)]
    #[tokio::test]
    async fn updating_missing_records_is_not_found(app_schema: AppSchema, #[case] query: &str) {
        let res = app_schema.execute(query).await;
        assert_eq!(error_code(&res).as_deref(), Some("NOT_FOUND"));
    }

    #[rstest]
    #[tokio::test]
    async fn partial_pet_update(app_schema: AppSchema) {
        run(
            &app_schema,
            r#"mutation { createPet(data: { name: "Rex", species: "dog", age: 3, description: "loud" }) { id } }"#,
        )
        .await;

        let updated = run(
            &app_schema,
            r#"mutation { updatePet(id: 1, data: { description: "quiet" }) { name species age description } }"#,
        )
        .await;
        assert_eq!(
            updated,
            json!({ "updatePet": { "name": "Rex", "species": "dog", "age": 3, "description": "quiet" } })
        );

        let cleared = run(
            &app_schema,
            "mutation { updatePet(id: 1, data: { age: null }) { age description } }",
        )
        .await;
        assert_eq!(cleared, json!({ "updatePet": { "age": null, "description": "quiet" } }));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_email_is_a_validation_error(app_schema: AppSchema) {
        let res = app_schema
            .execute(r#"mutation { createOwner(data: { name: "Ada", email: "nope" }) { id } }"#)
            .await;
        assert_eq!(error_code(&res).as_deref(), Some("VALIDATION_ERROR"));
        let owners = run(&app_schema, "{ owners { id } }").await;
        assert_eq!(owners, json!({ "owners": [] }));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_required_field_is_rejected_by_the_schema(app_schema: AppSchema) {
        let res = app_schema
            .execute(r#"mutation { createPet(data: { name: "Rex" }) { id } }"#)
            .await;
        assert!(!res.errors.is_empty());
        let pets = run(&app_schema, "{ pets { id } }").await;
        assert_eq!(pets, json!({ "pets": [] }));
    }

    #[rstest]
    fn sdl_exposes_operations(app_schema: AppSchema) {
        let sdl = app_schema.sdl();
        for field in ["owners", "owner(", "createOwner(", "updateOwner(", "deleteOwner(", "pets", "pet(", "createPet(", "updatePet(", "deletePet("] {
            assert!(sdl.contains(field), "missing {field} in schema");
        }
        let update_pet_input = sdl
            .split("input UpdatePetInput")
            .nth(1)
            .and_then(|rest| rest.split('}').next())
            .expect("UpdatePetInput in schema");
        assert!(!update_pet_input.contains("ownerId"));
    }
}
