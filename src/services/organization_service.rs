use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::models::Organization;
use crate::repositories::OrganizationRepository;
use crate::validation::validate_name;

use super::ServiceError;

pub struct OrganizationService {
    organizations: Arc<dyn OrganizationRepository>,
}

impl OrganizationService {
    pub fn new(organizations: Arc<dyn OrganizationRepository>) -> Self {
        Self { organizations }
    }

    /// Return the owner's organization, creating it on first registration.
    ///
    /// Replaying the registration event returns the existing row.
    pub async fn provision_for_owner(&self, owner_id: Uuid, name: &str) -> Result<Organization, ServiceError> {
        if let Some(existing) = self.organizations.find_by_owner(owner_id).await? {
            return Ok(existing);
        }

        let name = name.trim();
        validate_name(name).map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let org = self.organizations.create(owner_id, name).await?;
        info!("Provisioned organization {} for owner {}", org.id, owner_id);
        Ok(org)
    }

    /// Display name used when the registration carries none.
    pub fn default_name(email: Option<&str>) -> String {
        match email.and_then(|e| e.split('@').next()).map(str::trim) {
            Some(local) if !local.is_empty() => format!("Organização de {}", local),
            _ => "Minha organização".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::client::Privilege;
    use crate::repositories::{Backend, MemoryBackend};

    #[tokio::test]
    async fn provisioning_is_idempotent() {
        let backend = MemoryBackend::new();
        let service = OrganizationService::new(backend.organizations(Privilege::Service));
        let owner = Uuid::new_v4();

        let first = service.provision_for_owner(owner, "Acme").await.unwrap();
        let second = service.provision_for_owner(owner, "Other name").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Acme");
        assert_eq!(second.owner_id, owner);
    }

    #[tokio::test]
    async fn provisioning_rejects_blank_names() {
        let backend = MemoryBackend::new();
        let service = OrganizationService::new(backend.organizations(Privilege::Service));
        let result = service.provision_for_owner(Uuid::new_v4(), "  ").await;
        assert!(matches!(result, Err(ServiceError::InvalidArgument(_))));
    }

    #[test]
    fn default_name_uses_email_local_part() {
        assert_eq!(OrganizationService::default_name(Some("ana@example.com")), "Organização de ana");
        assert_eq!(OrganizationService::default_name(Some("@example.com")), "Minha organização");
        assert_eq!(OrganizationService::default_name(None), "Minha organização");
    }
}
