use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::cache::{example_path, organization_examples_path};
use crate::context::RequestContext;
use crate::database::models::{CreateExampleInput, Example, MarkupInput, UpdateExampleInput};
use crate::repositories::RepositoryResult;
use crate::services::ExampleService;
use crate::validation::{parse_input, MSG_INVALID_PAYLOAD};

use super::{ActionResult, Actions};

pub const MSG_EXAMPLE_CREATE_FAILED: &str = "Erro ao criar exemplo";
pub const MSG_EXAMPLE_UPDATE_FAILED: &str = "Erro ao atualizar exemplo";
pub const MSG_EXAMPLE_DELETE_FAILED: &str = "Erro ao excluir exemplo";
pub const MSG_MARKUP_FAILED: &str = "Erro ao aplicar reajuste";
pub const MSG_EXAMPLE_NOT_FOUND: &str = "Exemplo não encontrado";

impl Actions {
    pub(super) fn example_service(&self, ctx: &RequestContext) -> ExampleService {
        let privilege = ctx.privilege();
        ExampleService::new(
            self.backend.examples(privilege),
            self.backend.organizations(privilege),
            self.markup_factor,
        )
    }

    async fn revalidate_example(&self, example: &Example) {
        self.cache
            .revalidate_path(&organization_examples_path(example.organization_id))
            .await;
        self.cache.revalidate_path(&example_path(example.id)).await;
    }

    /// Active examples of an organization
    pub async fn get_examples(&self, ctx: &RequestContext, organization_id: Uuid) -> RepositoryResult<Vec<Example>> {
        self.backend
            .examples(ctx.privilege())
            .list_active(organization_id)
            .await
    }

    /// Any example by id, including soft-deleted ones
    pub async fn get_example_by_id(&self, ctx: &RequestContext, id: Uuid) -> RepositoryResult<Option<Example>> {
        self.backend.examples(ctx.privilege()).find_by_id(id).await
    }

    pub async fn create_example(&self, ctx: &RequestContext, payload: Value) -> ActionResult<Example> {
        let input = match parse_input::<CreateExampleInput>(payload) {
            Ok(input) => input,
            Err(message) => return ActionResult::Failure(message),
        };
        let Some(new) = input.into_new() else {
            return ActionResult::failure(MSG_INVALID_PAYLOAD);
        };

        match self.backend.examples(ctx.privilege()).insert(&new).await {
            Ok(example) => {
                info!("Created example {} in organization {}", example.id, example.organization_id);
                self.revalidate_example(&example).await;
                ActionResult::Success(example)
            }
            Err(e) => {
                error!("create_example failed: {}", e);
                ActionResult::failure(MSG_EXAMPLE_CREATE_FAILED)
            }
        }
    }

    pub async fn update_example(&self, ctx: &RequestContext, id: Uuid, payload: Value) -> ActionResult<Example> {
        let mut input = match parse_input::<UpdateExampleInput>(payload) {
            Ok(input) => input,
            Err(message) => return ActionResult::Failure(message),
        };
        input.name = input.name.map(|name| name.trim().to_string());

        match self.backend.examples(ctx.privilege()).update(id, &input).await {
            Ok(example) => {
                info!("Updated example {}", example.id);
                self.revalidate_example(&example).await;
                ActionResult::Success(example)
            }
            Err(e) => {
                error!("update_example {} failed: {}", id, e);
                ActionResult::failure(MSG_EXAMPLE_UPDATE_FAILED)
            }
        }
    }

    /// Soft delete; the row stays readable by id with `is_active = false`
    pub async fn delete_example(&self, ctx: &RequestContext, id: Uuid) -> ActionResult<Example> {
        match self.backend.examples(ctx.privilege()).deactivate(id).await {
            Ok(example) => {
                info!("Deactivated example {}", example.id);
                self.revalidate_example(&example).await;
                ActionResult::Success(example)
            }
            Err(e) => {
                error!("delete_example {} failed: {}", id, e);
                ActionResult::failure(MSG_EXAMPLE_DELETE_FAILED)
            }
        }
    }

    /// Multiply the stored value by `factor` (or the configured default)
    pub async fn apply_example_markup(&self, ctx: &RequestContext, id: Uuid, payload: Value) -> ActionResult<Example> {
        let input = match parse_input::<MarkupInput>(payload) {
            Ok(input) => input,
            Err(message) => return ActionResult::Failure(message),
        };

        match self.example_service(ctx).apply_markup(id, input.factor).await {
            Ok(Some(example)) => {
                self.revalidate_example(&example).await;
                ActionResult::Success(example)
            }
            Ok(None) => ActionResult::failure(MSG_EXAMPLE_NOT_FOUND),
            Err(e) => {
                error!("apply_example_markup {} failed: {}", id, e);
                ActionResult::failure(MSG_MARKUP_FAILED)
            }
        }
    }
}
