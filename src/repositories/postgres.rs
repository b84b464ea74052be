use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::client::{DataClient, Privilege};
use crate::database::manager::DatabaseManager;
use crate::database::models::{Example, NewExample, Organization, UpdateExampleInput};

use super::{Backend, ExampleRepository, OrganizationRepository, RepositoryError, RepositoryResult};

const ORGANIZATION_COLUMNS: &str = "id, owner_id, name, created_at, updated_at";
const EXAMPLE_COLUMNS: &str = "id, organization_id, name, value, is_active, created_at, updated_at";

/// Repositories backed by Postgres through a [`DataClient`].
#[derive(Clone)]
pub struct PgBackend {
    manager: DatabaseManager,
}

impl PgBackend {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }
}

impl Backend for PgBackend {
    fn organizations(&self, privilege: Privilege) -> Arc<dyn OrganizationRepository> {
        Arc::new(PgOrganizationRepository::new(DataClient::for_privilege(self.manager.clone(), privilege)))
    }

    fn examples(&self, privilege: Privilege) -> Arc<dyn ExampleRepository> {
        Arc::new(PgExampleRepository::new(DataClient::for_privilege(self.manager.clone(), privilege)))
    }
}

pub struct PgOrganizationRepository {
    client: DataClient,
}

impl PgOrganizationRepository {
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrganizationRepository for PgOrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organization>> {
        let mut tx = self.client.begin().await?;
        let org = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations WHERE id = $1",
            ORGANIZATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(org)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Option<Organization>> {
        let mut tx = self.client.begin().await?;
        let org = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations WHERE owner_id = $1",
            ORGANIZATION_COLUMNS
        ))
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(org)
    }

    async fn create(&self, owner_id: Uuid, name: &str) -> RepositoryResult<Organization> {
        let mut tx = self.client.begin().await?;
        let org = sqlx::query_as::<_, Organization>(&format!(
            "INSERT INTO organizations (owner_id, name) VALUES ($1, $2) RETURNING {}",
            ORGANIZATION_COLUMNS
        ))
        .bind(owner_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(org)
    }

    async fn rename(&self, id: Uuid, name: &str) -> RepositoryResult<Organization> {
        let mut tx = self.client.begin().await?;
        let org = sqlx::query_as::<_, Organization>(&format!(
            "UPDATE organizations SET name = $2 WHERE id = $1 RETURNING {}",
            ORGANIZATION_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::Missing { entity: "organization", id })?;
        tx.commit().await?;
        Ok(org)
    }
}

pub struct PgExampleRepository {
    client: DataClient,
}

impl PgExampleRepository {
    pub fn new(client: DataClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExampleRepository for PgExampleRepository {
    async fn list_active(&self, organization_id: Uuid) -> RepositoryResult<Vec<Example>> {
        let mut tx = self.client.begin().await?;
        let rows = sqlx::query_as::<_, Example>(&format!(
            "SELECT {} FROM examples WHERE organization_id = $1 AND is_active = true ORDER BY created_at DESC",
            EXAMPLE_COLUMNS
        ))
        .bind(organization_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Example>> {
        let mut tx = self.client.begin().await?;
        let row = sqlx::query_as::<_, Example>(&format!("SELECT {} FROM examples WHERE id = $1", EXAMPLE_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn insert(&self, new: &NewExample) -> RepositoryResult<Example> {
        let mut tx = self.client.begin().await?;
        let row = sqlx::query_as::<_, Example>(&format!(
            "INSERT INTO examples (organization_id, name, value) VALUES ($1, $2, $3) RETURNING {}",
            EXAMPLE_COLUMNS
        ))
        .bind(new.organization_id)
        .bind(&new.name)
        .bind(new.value)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, input: &UpdateExampleInput) -> RepositoryResult<Example> {
        let mut tx = self.client.begin().await?;
        let row = sqlx::query_as::<_, Example>(&format!(
            "UPDATE examples SET \
                 name = COALESCE($2, name), \
                 value = COALESCE($3, value), \
                 is_active = COALESCE($4, is_active) \
             WHERE id = $1 RETURNING {}",
            EXAMPLE_COLUMNS
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.value)
        .bind(input.is_active)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::Missing { entity: "example", id })?;
        tx.commit().await?;
        Ok(row)
    }

    async fn deactivate(&self, id: Uuid) -> RepositoryResult<Example> {
        let mut tx = self.client.begin().await?;
        let row = sqlx::query_as::<_, Example>(&format!(
            "UPDATE examples SET is_active = false WHERE id = $1 RETURNING {}",
            EXAMPLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::Missing { entity: "example", id })?;
        tx.commit().await?;
        Ok(row)
    }
}
