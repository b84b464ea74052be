use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_name, InputShape};

/// Tenant boundary; owns every other domain row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrganizationInput {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
}

impl InputShape for UpdateOrganizationInput {
    const FIELDS: &'static [&'static str] = &["name"];
}

/// Derived view over an organization and its active examples.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSummary {
    pub organization: Organization,
    pub active_examples: usize,
    pub total_value: Decimal,
    pub markup_factor: Decimal,
    pub total_with_markup: Decimal,
}
