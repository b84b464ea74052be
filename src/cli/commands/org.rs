use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::commands::examples::resolve_org;
use crate::cli::utils::{output_action, output_data};
use crate::cli::OutputFormat;
use crate::context::RequestContext;
use crate::database::models::Organization;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum OrgCommands {
    #[command(about = "Show the organization owned by --user")]
    Show,

    #[command(about = "Totals over active examples")]
    Summary {
        #[arg(long, help = "Organization ID (defaults to the user's organization)")]
        org: Option<Uuid>,
    },

    #[command(about = "Rename an organization")]
    Rename {
        #[arg(help = "New display name")]
        name: String,
        #[arg(long, help = "Organization ID (defaults to the user's organization)")]
        org: Option<Uuid>,
    },
}

fn describe(org: &Organization) -> String {
    format!("{}  {}  (owner {})", org.id, org.name, org.owner_id)
}

pub async fn handle(cmd: OrgCommands, state: &AppState, ctx: RequestContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let actions = &state.actions;

    match cmd {
        OrgCommands::Show => {
            let org = actions
                .get_current_organization(&ctx)
                .await?
                .context("no organization for this user; pass --user of a registered owner")?;
            output_data(output_format, &org, describe)
        }
        OrgCommands::Summary { org } => {
            let org = resolve_org(state, &ctx, org).await?;
            let summary = actions
                .get_organization_summary(&ctx, org)
                .await?
                .with_context(|| format!("organization {} not found", org))?;
            output_data(output_format, &summary, |s| {
                format!(
                    "{}\nActive examples: {}\nTotal value: {}\nTotal with markup ×{}: {}",
                    describe(&s.organization),
                    s.active_examples,
                    s.total_value,
                    s.markup_factor,
                    s.total_with_markup
                )
            })
        }
        OrgCommands::Rename { name, org } => {
            let org = resolve_org(state, &ctx, org).await?;
            let result = actions.update_organization(&ctx, org, json!({ "name": name })).await;
            output_action(output_format, "Organização atualizada", result, describe)
        }
    }
}
