//! PostgreSQL store. Reads load relations in a single statement via json subqueries.

use super::{OwnerRecord, PetRecord, Store};
use crate::error::AppError;
use crate::model::{NewOwner, NewPet, Owner, OwnerChanges, Pet, PetChanges};
use crate::sql::{self, IncludeDirection, IncludeSelect, PgBindValue, QueryBuf, OWNERS, PETS};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool};

#[derive(sqlx::FromRow)]
struct OwnerWithPetsRow {
    #[sqlx(flatten)]
    owner: OwnerRecord,
    pets: Json<Vec<PetRecord>>,
}

#[derive(sqlx::FromRow)]
struct PetWithOwnerRow {
    #[sqlx(flatten)]
    pet: PetRecord,
    owner: Option<Json<OwnerRecord>>,
}

const OWNER_PETS: IncludeSelect<'static> = IncludeSelect {
    name: "pets",
    direction: IncludeDirection::ToMany,
    related: &PETS,
    our_key: "id",
    their_key: "owner_id",
};

const PET_OWNER: IncludeSelect<'static> = IncludeSelect {
    name: "owner",
    direction: IncludeDirection::ToOne,
    related: &OWNERS,
    our_key: "owner_id",
    their_key: "id",
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_owners(&self, q: &QueryBuf) -> Result<Vec<Owner>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, OwnerWithPetsRow>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|r| r.owner.into_owner(Some(r.pets.0))).collect())
    }

    async fn fetch_pets(&self, q: &QueryBuf) -> Result<Vec<Pet>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, PetWithOwnerRow>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|r| r.pet.into_pet(r.owner.map(|o| o.0)))
            .collect())
    }

    async fn insert_returning_id(&self, q: &QueryBuf) -> Result<i32, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i32>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let res = query.execute(&self.pool).await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, AppError> {
        self.fetch_owners(&sql::select_with_includes(&OWNERS, &[OWNER_PETS], None))
            .await
    }

    async fn find_owner(&self, id: i32) -> Result<Option<Owner>, AppError> {
        let mut rows = self
            .fetch_owners(&sql::select_with_includes(&OWNERS, &[OWNER_PETS], Some(id)))
            .await?;
        Ok(rows.pop())
    }

    async fn owner_exists(&self, id: i32) -> Result<bool, AppError> {
        let q = sql::exists(&OWNERS, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, bool>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn insert_owner(&self, owner: &NewOwner) -> Result<Owner, AppError> {
        let q = sql::insert(
            &OWNERS,
            vec![
                ("name", PgBindValue::from(owner.name.clone())),
                ("email", PgBindValue::from(owner.email.clone())),
            ],
        );
        let id = self.insert_returning_id(&q).await?;
        Ok(Owner {
            id,
            name: owner.name.clone(),
            email: owner.email.clone(),
            pets: Some(Vec::new()),
        })
    }

    async fn update_owner(&self, id: i32, changes: &OwnerChanges) -> Result<(), AppError> {
        let mut sets = Vec::new();
        if let Some(name) = &changes.name {
            sets.push(("name", PgBindValue::from(name.clone())));
        }
        if let Some(email) = &changes.email {
            sets.push(("email", PgBindValue::from(email.clone())));
        }
        self.execute(&sql::update(&OWNERS, id, sets)).await?;
        Ok(())
    }

    async fn delete_owner(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.execute(&sql::delete(&OWNERS, id)).await? > 0)
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, AppError> {
        self.fetch_pets(&sql::select_with_includes(&PETS, &[PET_OWNER], None))
            .await
    }

    async fn find_pet(&self, id: i32) -> Result<Option<Pet>, AppError> {
        let mut rows = self
            .fetch_pets(&sql::select_with_includes(&PETS, &[PET_OWNER], Some(id)))
            .await?;
        Ok(rows.pop())
    }

    async fn insert_pet(&self, pet: &NewPet) -> Result<Pet, AppError> {
        let q = sql::insert(
            &PETS,
            vec![
                ("name", PgBindValue::from(pet.name.clone())),
                ("species", PgBindValue::from(pet.species.clone())),
                ("age", PgBindValue::from(pet.age)),
                ("description", PgBindValue::from(pet.description.clone())),
                ("owner_id", PgBindValue::from(pet.owner_id)),
            ],
        );
        let id = match self.insert_returning_id(&q).await {
            // The owner was deleted after the service checked it.
            Err(AppError::Db(sqlx::Error::Database(e))) if e.is_foreign_key_violation() => {
                return Err(AppError::NotFound("Owner"));
            }
            other => other?,
        };
        self.find_pet(id)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update_pet(&self, id: i32, changes: &PetChanges) -> Result<(), AppError> {
        let mut sets = Vec::new();
        if let Some(name) = &changes.name {
            sets.push(("name", PgBindValue::from(name.clone())));
        }
        if let Some(species) = &changes.species {
            sets.push(("species", PgBindValue::from(species.clone())));
        }
        if let Some(age) = changes.age {
            sets.push(("age", PgBindValue::from(age)));
        }
        if let Some(description) = &changes.description {
            sets.push(("description", PgBindValue::from(description.clone())));
        }
        self.execute(&sql::update(&PETS, id, sets)).await?;
        Ok(())
    }

    async fn delete_pet(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.execute(&sql::delete(&PETS, id)).await? > 0)
    }
}

/// Ensure the database named in `options` exists; create it if not. Connects to the default
/// `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), AppError> {
    let db_name = match options.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = options.clone().database("postgres").connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
