pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::context::RequestContext;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Scaffold CLI - run actions in process against the configured storage")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Act as this user (row-level policies apply); elevated when omitted")]
    pub user: Option<Uuid>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Example records of an organization")]
    Examples {
        #[command(subcommand)]
        cmd: commands::examples::ExampleCommands,
    },

    #[command(about = "Organization of the current user")]
    Org {
        #[command(subcommand)]
        cmd: commands::org::OrgCommands,
    },

    #[command(about = "Development tokens")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

impl Cli {
    pub fn context(&self) -> RequestContext {
        match self.user {
            Some(user_id) => RequestContext::user(user_id),
            None => RequestContext::service(),
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = cli.context();
    let config = config::config()?.clone();

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &config, ctx, output_format),
        Commands::Examples { cmd } => {
            let state = AppState::from_config(config)?;
            commands::examples::handle(cmd, &state, ctx, output_format).await
        }
        Commands::Org { cmd } => {
            let state = AppState::from_config(config)?;
            commands::org::handle(cmd, &state, ctx, output_format).await
        }
    }
}
