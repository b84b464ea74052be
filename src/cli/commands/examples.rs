use anyhow::Context;
use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::cli::utils::{output_action, output_data, output_empty_collection};
use crate::cli::OutputFormat;
use crate::context::RequestContext;
use crate::database::models::Example;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum ExampleCommands {
    #[command(about = "List active examples")]
    List {
        #[arg(long, help = "Organization ID (defaults to the user's organization)")]
        org: Option<Uuid>,
    },

    #[command(about = "Show one example, including inactive ones")]
    Get {
        #[arg(help = "Example ID")]
        id: Uuid,
    },

    #[command(about = "Create an example")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Exact decimal value, e.g. 10.10")]
        value: Decimal,
        #[arg(long, help = "Organization ID (defaults to the user's organization)")]
        org: Option<Uuid>,
    },

    #[command(about = "Update the given fields of an example")]
    Update {
        #[arg(help = "Example ID")]
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        value: Option<Decimal>,
        #[arg(long)]
        active: Option<bool>,
    },

    #[command(about = "Deactivate an example (soft delete)")]
    Delete {
        #[arg(help = "Example ID")]
        id: Uuid,
    },

    #[command(about = "Multiply an example's value by a factor")]
    Markup {
        #[arg(help = "Example ID")]
        id: Uuid,
        #[arg(long, help = "Factor (defaults to APP_MARKUP_FACTOR)")]
        factor: Option<Decimal>,
    },
}

fn describe(example: &Example) -> String {
    format!(
        "{}  {:<30} {:>14}  {}",
        example.id,
        example.name,
        example.value,
        if example.is_active { "active" } else { "inactive" }
    )
}

/// Explicit `--org`, else the organization owned by `--user`
pub(crate) async fn resolve_org(state: &AppState, ctx: &RequestContext, org: Option<Uuid>) -> anyhow::Result<Uuid> {
    if let Some(org) = org {
        return Ok(org);
    }
    let current = state.actions.get_current_organization(ctx).await?;
    current
        .map(|o| o.id)
        .context("no organization given; pass --org or --user of an organization owner")
}

pub async fn handle(cmd: ExampleCommands, state: &AppState, ctx: RequestContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let actions = &state.actions;

    match cmd {
        ExampleCommands::List { org } => {
            let org = resolve_org(state, &ctx, org).await?;
            let examples = actions.get_examples(&ctx, org).await?;
            if examples.is_empty() {
                return output_empty_collection(output_format, "data", "No active examples");
            }
            output_data(output_format, &examples, |rows| {
                rows.iter().map(describe).collect::<Vec<_>>().join("\n")
            })
        }
        ExampleCommands::Get { id } => {
            let example = actions
                .get_example_by_id(&ctx, id)
                .await?
                .with_context(|| format!("example {} not found", id))?;
            output_data(output_format, &example, describe)
        }
        ExampleCommands::Create { name, value, org } => {
            let org = resolve_org(state, &ctx, org).await?;
            // decimals travel as strings to keep every digit
            let payload = json!({ "name": name, "value": value.to_string(), "organization_id": org });
            let result = actions.create_example(&ctx, payload).await;
            output_action(output_format, "Exemplo criado", result, describe)
        }
        ExampleCommands::Update { id, name, value, active } => {
            let mut payload = Map::new();
            if let Some(name) = name {
                payload.insert("name".into(), Value::String(name));
            }
            if let Some(value) = value {
                payload.insert("value".into(), Value::String(value.to_string()));
            }
            if let Some(active) = active {
                payload.insert("is_active".into(), Value::Bool(active));
            }
            let result = actions.update_example(&ctx, id, Value::Object(payload)).await;
            output_action(output_format, "Exemplo atualizado", result, describe)
        }
        ExampleCommands::Delete { id } => {
            let result = actions.delete_example(&ctx, id).await;
            output_action(output_format, "Exemplo excluído", result, describe)
        }
        ExampleCommands::Markup { id, factor } => {
            let payload = match factor {
                Some(factor) => json!({ "factor": factor.to_string() }),
                None => json!({}),
            };
            let result = actions.apply_example_markup(&ctx, id, payload).await;
            output_action(output_format, "Reajuste aplicado", result, describe)
        }
    }
}
