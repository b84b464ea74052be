use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::context::RequestContext;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a bearer token for --user, signed with APP_JWT_SECRET")]
    Token {
        #[arg(long, default_value_t = 24, help = "Token lifetime in hours")]
        hours: i64,
    },
}

pub fn handle(cmd: AuthCommands, config: &AppConfig, ctx: RequestContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token { hours } => {
            let user_id = ctx.user_id().context("--user is required to mint a token")?;
            let token = generate_jwt(&config.security.jwt_secret, &Claims::new(user_id, hours))?;
            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "user_id": user_id, "token": token, "expires_in_hours": hours }))?
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}
