use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::{Example, OrganizationSummary, UpdateExampleInput};
use crate::repositories::{ExampleRepository, OrganizationRepository};

use super::ServiceError;

/// Scale of stored monetary values
pub const MONEY_SCALE: u32 = 2;

/// Orchestrates example and organization repositories for derived values.
///
/// Every computation uses `Decimal`, never binary floating point. Operations
/// that read and then write are not atomic: a concurrent writer between the
/// two calls wins or loses without coordination.
pub struct ExampleService {
    examples: Arc<dyn ExampleRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    markup_factor: Decimal,
}

impl ExampleService {
    pub fn new(
        examples: Arc<dyn ExampleRepository>,
        organizations: Arc<dyn OrganizationRepository>,
        markup_factor: Decimal,
    ) -> Self {
        Self {
            examples,
            organizations,
            markup_factor,
        }
    }

    /// `value × factor`, rounded half away from zero to cents.
    pub fn scaled_value(value: Decimal, factor: Decimal) -> Result<Decimal, ServiceError> {
        let product = value
            .checked_mul(factor)
            .ok_or_else(|| ServiceError::InvalidArgument(format!("{} × {} overflows", value, factor)))?;
        Ok(product.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Multiply an example's value by `factor` and persist the result.
    pub async fn apply_markup(&self, id: Uuid, factor: Option<Decimal>) -> Result<Option<Example>, ServiceError> {
        let factor = factor.unwrap_or(self.markup_factor);
        if factor <= Decimal::ZERO {
            return Err(ServiceError::InvalidArgument(format!("factor must be positive, got {}", factor)));
        }

        let Some(example) = self.examples.find_by_id(id).await? else {
            debug!("Markup skipped, example {} not found", id);
            return Ok(None);
        };

        let value = Self::scaled_value(example.value, factor)?;
        let changes = UpdateExampleInput {
            value: Some(value),
            ..Default::default()
        };
        let updated = self.examples.update(id, &changes).await?;

        info!("Applied markup {} to example {}: {} -> {}", factor, id, example.value, updated.value);
        Ok(Some(updated))
    }

    /// Totals over the organization's active examples.
    pub async fn summarize(&self, organization_id: Uuid) -> Result<Option<OrganizationSummary>, ServiceError> {
        let (organization, examples) = futures::try_join!(
            self.organizations.find_by_id(organization_id),
            self.examples.list_active(organization_id),
        )?;

        let Some(organization) = organization else {
            return Ok(None);
        };

        let mut total_value = Decimal::ZERO;
        let mut total_with_markup = Decimal::ZERO;
        for example in &examples {
            total_value = total_value
                .checked_add(example.value)
                .ok_or_else(|| ServiceError::InvalidArgument("total value overflows".to_string()))?;
            // per-row rounding, same as apply_markup would persist
            total_with_markup = total_with_markup
                .checked_add(Self::scaled_value(example.value, self.markup_factor)?)
                .ok_or_else(|| ServiceError::InvalidArgument("total with markup overflows".to_string()))?;
        }

        Ok(Some(OrganizationSummary {
            organization,
            active_examples: examples.len(),
            total_value,
            markup_factor: self.markup_factor,
            total_with_markup,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::client::Privilege;
    use crate::database::models::NewExample;
    use crate::repositories::{Backend, MemoryBackend};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn service(backend: &MemoryBackend) -> ExampleService {
        ExampleService::new(
            backend.examples(Privilege::Service),
            backend.organizations(Privilege::Service),
            dec("1.1"),
        )
    }

    #[test]
    fn scaled_value_is_exact() {
        let scaled = ExampleService::scaled_value(dec("10.10"), dec("1.1")).unwrap();
        assert_eq!(scaled.to_string(), "11.11");

        // binary floating point gives 11.110000000000001 here
        let float = 10.10_f64 * 1.1_f64;
        assert_ne!(float.to_string(), "11.11");
    }

    #[test]
    fn scaled_value_rounds_half_away_from_zero() {
        assert_eq!(ExampleService::scaled_value(dec("0.05"), dec("0.5")).unwrap(), dec("0.03"));
        assert_eq!(ExampleService::scaled_value(dec("0.01"), dec("0.1")).unwrap(), dec("0.00"));
    }

    #[test]
    fn repeated_scaling_does_not_drift() {
        let mut value = dec("0.10");
        for _ in 0..10 {
            value = ExampleService::scaled_value(value, dec("1.0")).unwrap();
        }
        assert_eq!(value, dec("0.10"));
    }

    #[tokio::test]
    async fn apply_markup_persists_scaled_value() {
        let backend = MemoryBackend::new();
        let org = backend
            .organizations(Privilege::Service)
            .create(Uuid::new_v4(), "Acme")
            .await
            .unwrap();
        let row = backend
            .examples(Privilege::Service)
            .insert(&NewExample {
                organization_id: org.id,
                name: "Widget".to_string(),
                value: dec("10.10"),
            })
            .await
            .unwrap();

        let updated = service(&backend).apply_markup(row.id, None).await.unwrap().unwrap();
        assert_eq!(updated.value.to_string(), "11.11");
        assert_eq!(updated.name, "Widget");
    }

    #[tokio::test]
    async fn apply_markup_on_missing_example_is_absent() {
        let backend = MemoryBackend::new();
        let result = service(&backend).apply_markup(Uuid::new_v4(), Some(dec("2"))).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn apply_markup_rejects_non_positive_factor() {
        let backend = MemoryBackend::new();
        let result = service(&backend).apply_markup(Uuid::new_v4(), Some(Decimal::ZERO)).await;
        assert!(matches!(result, Err(ServiceError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn summarize_totals_active_examples_only() {
        let backend = MemoryBackend::new();
        let org = backend
            .organizations(Privilege::Service)
            .create(Uuid::new_v4(), "Acme")
            .await
            .unwrap();
        let repo = backend.examples(Privilege::Service);
        for value in ["10.10", "0.20"] {
            repo.insert(&NewExample {
                organization_id: org.id,
                name: "Item".to_string(),
                value: dec(value),
            })
            .await
            .unwrap();
        }
        let gone = repo
            .insert(&NewExample {
                organization_id: org.id,
                name: "Gone".to_string(),
                value: dec("99"),
            })
            .await
            .unwrap();
        repo.deactivate(gone.id).await.unwrap();

        let summary = service(&backend).summarize(org.id).await.unwrap().unwrap();
        assert_eq!(summary.active_examples, 2);
        assert_eq!(summary.total_value, dec("10.30"));
        assert_eq!(summary.total_with_markup, dec("11.33"));
    }

    #[tokio::test]
    async fn summarize_unknown_organization_is_absent() {
        let backend = MemoryBackend::new();
        assert!(service(&backend).summarize(Uuid::new_v4()).await.unwrap().is_none());
    }
}
