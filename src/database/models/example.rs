use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_name, validate_non_negative, validate_positive, InputShape};

/// Stand-in for any organization-owned domain entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Example {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    /// Serialized as a JSON string (`"10.10"`) so every digit and the
    /// scale survive clients that parse numbers as floats. Inputs accept
    /// either a string or a number.
    pub value: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may supply on create. `id`, `is_active` and timestamps
/// are assigned by storage; unknown keys in the payload are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateExampleInput {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[serde(default)]
    #[validate(required(message = "Valor obrigatório"), custom(function = "validate_non_negative"))]
    pub value: Option<Decimal>,

    #[serde(default)]
    #[validate(required(message = "Organização obrigatória"))]
    pub organization_id: Option<Uuid>,
}

impl InputShape for CreateExampleInput {
    const FIELDS: &'static [&'static str] = &["name", "value", "organization_id"];
}

impl CreateExampleInput {
    /// Required fields are checked by validation; `None` means it was skipped.
    pub fn into_new(self) -> Option<NewExample> {
        Some(NewExample {
            organization_id: self.organization_id?,
            name: self.name.trim().to_string(),
            value: self.value?,
        })
    }
}

/// Validated insert values handed to repositories.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExample {
    pub organization_id: Uuid,
    pub name: String,
    pub value: Decimal,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateExampleInput {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    pub value: Option<Decimal>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl InputShape for UpdateExampleInput {
    const FIELDS: &'static [&'static str] = &["name", "value", "is_active"];
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MarkupInput {
    /// Falls back to the configured markup factor when absent
    #[serde(default)]
    #[validate(custom(function = "validate_positive"))]
    pub factor: Option<Decimal>,
}

impl InputShape for MarkupInput {
    const FIELDS: &'static [&'static str] = &["factor"];
}
