use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::database::models::{Organization, OrganizationSummary, UpdateOrganizationInput};
use crate::repositories::RepositoryResult;
use crate::services::{OrganizationService, ServiceError};
use crate::validation::parse_input;

use super::{ActionResult, Actions};

pub const MSG_ORGANIZATION_UPDATE_FAILED: &str = "Erro ao atualizar organização";
pub const MSG_ORGANIZATION_PROVISION_FAILED: &str = "Erro ao criar organização";

fn organization_path(id: Uuid) -> String {
    format!("/organizations/{}", id)
}

impl Actions {
    /// Organization owned by the calling user; `None` for service callers
    pub async fn get_current_organization(&self, ctx: &RequestContext) -> RepositoryResult<Option<Organization>> {
        let Some(user_id) = ctx.user_id() else {
            return Ok(None);
        };
        self.backend
            .organizations(ctx.privilege())
            .find_by_owner(user_id)
            .await
    }

    pub async fn get_organization_summary(
        &self,
        ctx: &RequestContext,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationSummary>, ServiceError> {
        self.example_service(ctx).summarize(organization_id).await
    }

    pub async fn update_organization(&self, ctx: &RequestContext, id: Uuid, payload: Value) -> ActionResult<Organization> {
        let input = match parse_input::<UpdateOrganizationInput>(payload) {
            Ok(input) => input,
            Err(message) => return ActionResult::Failure(message),
        };

        match self
            .backend
            .organizations(ctx.privilege())
            .rename(id, input.name.trim())
            .await
        {
            Ok(org) => {
                info!("Renamed organization {}", org.id);
                self.cache.revalidate_path(&organization_path(org.id)).await;
                ActionResult::Success(org)
            }
            Err(e) => {
                error!("update_organization {} failed: {}", id, e);
                ActionResult::failure(MSG_ORGANIZATION_UPDATE_FAILED)
            }
        }
    }

    /// Registration hook: give a newly registered user their organization.
    ///
    /// Runs with the caller's privilege; webhooks pass a service context.
    pub async fn provision_organization(
        &self,
        ctx: &RequestContext,
        owner_id: Uuid,
        name: &str,
    ) -> ActionResult<Organization> {
        let service = OrganizationService::new(self.backend.organizations(ctx.privilege()));
        match service.provision_for_owner(owner_id, name).await {
            Ok(org) => {
                self.cache.revalidate_path(&organization_path(org.id)).await;
                ActionResult::Success(org)
            }
            Err(e) => {
                error!("provision_organization for {} failed: {}", owner_id, e);
                ActionResult::failure(MSG_ORGANIZATION_PROVISION_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ViewCache;
    use crate::repositories::MemoryBackend;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    fn actions() -> Actions {
        Actions::new(Arc::new(MemoryBackend::new()), ViewCache::new(), Decimal::new(11, 1))
    }

    #[tokio::test]
    async fn provisioned_organization_becomes_current() {
        let actions = actions();
        let owner = Uuid::new_v4();

        let org = actions
            .provision_organization(&RequestContext::service(), owner, "Acme")
            .await
            .into_result()
            .unwrap();

        let current = actions
            .get_current_organization(&RequestContext::user(owner))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, org.id);

        assert!(actions
            .get_current_organization(&RequestContext::service())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn rename_validates_and_enforces_ownership() {
        let actions = actions();
        let owner = Uuid::new_v4();
        let org = actions
            .provision_organization(&RequestContext::service(), owner, "Acme")
            .await
            .into_result()
            .unwrap();

        let result = actions
            .update_organization(&RequestContext::user(owner), org.id, json!({ "name": "" }))
            .await;
        assert_eq!(result, ActionResult::failure("Nome obrigatório"));

        let result = actions
            .update_organization(&RequestContext::user(Uuid::new_v4()), org.id, json!({ "name": "Stolen" }))
            .await;
        assert_eq!(result, ActionResult::failure(MSG_ORGANIZATION_UPDATE_FAILED));

        let renamed = actions
            .update_organization(&RequestContext::user(owner), org.id, json!({ "name": "Acme Ltda" }))
            .await
            .into_result()
            .unwrap();
        assert_eq!(renamed.name, "Acme Ltda");
        assert_eq!(renamed.owner_id, owner);
    }

    #[tokio::test]
    async fn users_cannot_provision_for_someone_else() {
        let actions = actions();
        let result = actions
            .provision_organization(&RequestContext::user(Uuid::new_v4()), Uuid::new_v4(), "Acme")
            .await;
        assert_eq!(result, ActionResult::failure(MSG_ORGANIZATION_PROVISION_FAILED));
    }

    #[tokio::test]
    async fn summary_of_empty_organization() {
        let actions = actions();
        let owner = Uuid::new_v4();
        let org = actions
            .provision_organization(&RequestContext::service(), owner, "Acme")
            .await
            .into_result()
            .unwrap();

        let summary = actions
            .get_organization_summary(&RequestContext::user(owner), org.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.active_examples, 0);
        assert_eq!(summary.total_value, Decimal::ZERO);
    }
}
