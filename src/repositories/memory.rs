//! In-process tables for tests and local demos.
//!
//! Mirrors the storage contract of `sql/schema.sql`: server-assigned ids and
//! timestamps, NUMERIC(12,2) values, one organization per owner, the
//! organization foreign key, and the row-level policy that limits a user
//! to rows of organizations they own.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::client::Privilege;
use crate::database::models::{Example, NewExample, Organization, UpdateExampleInput};

use super::{Backend, ExampleRepository, OrganizationRepository, RepositoryError, RepositoryResult};

const VALUE_SCALE: u32 = 2;
// NUMERIC(12,2) holds at most 10 integer digits
const VALUE_LIMIT: Decimal = Decimal::from_parts(1410065408, 2, 0, false, 0);

#[derive(Default)]
struct Tables {
    organizations: Vec<Organization>,
    examples: Vec<Example>,
}

impl Tables {
    fn can_access(&self, privilege: Privilege, organization_id: Uuid) -> bool {
        match privilege {
            Privilege::Service => true,
            Privilege::User(user_id) => self
                .organizations
                .iter()
                .any(|o| o.id == organization_id && o.owner_id == user_id),
        }
    }
}

/// Shared in-memory store; clones see the same tables.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn organizations(&self, privilege: Privilege) -> Arc<dyn OrganizationRepository> {
        Arc::new(MemoryOrganizationRepository {
            tables: self.tables.clone(),
            privilege,
        })
    }

    fn examples(&self, privilege: Privilege) -> Arc<dyn ExampleRepository> {
        Arc::new(MemoryExampleRepository {
            tables: self.tables.clone(),
            privilege,
        })
    }
}

fn rls_violation(table: &str) -> RepositoryError {
    RepositoryError::Storage(format!(
        "new row violates row-level security policy for table \"{}\"",
        table
    ))
}

fn to_column_scale(value: Decimal) -> RepositoryResult<Decimal> {
    // NUMERIC rounds halves away from zero
    let mut scaled = value.round_dp_with_strategy(VALUE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if scaled.abs() >= VALUE_LIMIT {
        return Err(RepositoryError::Storage("numeric field overflow".to_string()));
    }
    scaled.rescale(VALUE_SCALE);
    Ok(scaled)
}

pub struct MemoryOrganizationRepository {
    tables: Arc<RwLock<Tables>>,
    privilege: Privilege,
}

#[async_trait]
impl OrganizationRepository for MemoryOrganizationRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .iter()
            .find(|o| o.id == id && tables.can_access(self.privilege, o.id))
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Option<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .iter()
            .find(|o| o.owner_id == owner_id && tables.can_access(self.privilege, o.id))
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, name: &str) -> RepositoryResult<Organization> {
        if let Privilege::User(user_id) = self.privilege {
            if user_id != owner_id {
                return Err(rls_violation("organizations"));
            }
        }

        let mut tables = self.tables.write().await;
        if tables.organizations.iter().any(|o| o.owner_id == owner_id) {
            return Err(RepositoryError::Storage(
                "duplicate key value violates unique constraint \"organizations_owner_id_key\"".to_string(),
            ));
        }

        let now = Utc::now();
        let org = Organization {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.organizations.push(org.clone());
        Ok(org)
    }

    async fn rename(&self, id: Uuid, name: &str) -> RepositoryResult<Organization> {
        let mut tables = self.tables.write().await;
        if !tables.can_access(self.privilege, id) {
            return Err(RepositoryError::Missing { entity: "organization", id });
        }
        let org = tables
            .organizations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::Missing { entity: "organization", id })?;
        org.name = name.to_string();
        org.updated_at = Utc::now();
        Ok(org.clone())
    }
}

pub struct MemoryExampleRepository {
    tables: Arc<RwLock<Tables>>,
    privilege: Privilege,
}

#[async_trait]
impl ExampleRepository for MemoryExampleRepository {
    async fn list_active(&self, organization_id: Uuid) -> RepositoryResult<Vec<Example>> {
        let tables = self.tables.read().await;
        if !tables.can_access(self.privilege, organization_id) {
            return Ok(Vec::new());
        }

        // newest insert first on equal timestamps
        let mut rows: Vec<Example> = tables
            .examples
            .iter()
            .rev()
            .filter(|e| e.organization_id == organization_id && e.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Example>> {
        let tables = self.tables.read().await;
        Ok(tables
            .examples
            .iter()
            .find(|e| e.id == id && tables.can_access(self.privilege, e.organization_id))
            .cloned())
    }

    async fn insert(&self, new: &NewExample) -> RepositoryResult<Example> {
        let mut tables = self.tables.write().await;
        if !tables.organizations.iter().any(|o| o.id == new.organization_id) {
            return Err(RepositoryError::Storage(
                "insert or update on table \"examples\" violates foreign key constraint \"examples_organization_id_fkey\""
                    .to_string(),
            ));
        }
        if !tables.can_access(self.privilege, new.organization_id) {
            return Err(rls_violation("examples"));
        }

        let now = Utc::now();
        let row = Example {
            id: Uuid::new_v4(),
            organization_id: new.organization_id,
            name: new.name.clone(),
            value: to_column_scale(new.value)?,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.examples.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, input: &UpdateExampleInput) -> RepositoryResult<Example> {
        let value = input.value.map(to_column_scale).transpose()?;

        let mut tables = self.tables.write().await;
        let Some(index) = tables.examples.iter().position(|e| e.id == id) else {
            return Err(RepositoryError::Missing { entity: "example", id });
        };
        if !tables.can_access(self.privilege, tables.examples[index].organization_id) {
            return Err(RepositoryError::Missing { entity: "example", id });
        }

        let row = &mut tables.examples[index];
        if let Some(name) = &input.name {
            row.name = name.clone();
        }
        if let Some(value) = value {
            row.value = value;
        }
        if let Some(is_active) = input.is_active {
            row.is_active = is_active;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn deactivate(&self, id: Uuid) -> RepositoryResult<Example> {
        let input = UpdateExampleInput {
            is_active: Some(false),
            ..Default::default()
        };
        self.update(id, &input).await
    }
}
