use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use platform_authz::{Action, Subject, is_permitted};
use platform_obs::{ObsConfig, init_tracing};
use uuid::Uuid;

use server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "memberhub-server", version, about = "MemberHub bookings & membership gateway")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP gateway.
    Serve(ServeCommand),
    /// Mint a signed development token.
    #[command(name = "token:mint")]
    TokenMint(TokenMintCommand),
    /// Evaluate the permission table from the shell.
    #[command(name = "authz:check")]
    AuthzCheck(AuthzCheckCommand),
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[derive(Args, Debug)]
struct TokenMintCommand {
    #[arg(long, help = "Subject user id; random when omitted")]
    user: Option<Uuid>,
    #[arg(long)]
    role: String,
    #[arg(long, help = "Override the configured token lifetime")]
    ttl_minutes: Option<i64>,
}

#[derive(Args, Debug)]
struct AuthzCheckCommand {
    role: String,
    action: String,
    subject: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::TokenMint(cmd) => mint_token(cmd),
        Command::AuthzCheck(cmd) => check_permission(cmd),
    }
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let state = AppState { config };
    http::serve(ServeConfig::new(cmd.host, cmd.port), state).await
}

fn mint_token(cmd: TokenMintCommand) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(ttl) = cmd.ttl_minutes {
        config.auth.token_ttl_minutes = ttl;
    }
    let user = cmd.user.unwrap_or_else(Uuid::new_v4);
    let token = platform_authn::issue_token(user, &cmd.role, &config.auth)?;
    println!("{token}");
    Ok(())
}

fn check_permission(cmd: AuthzCheckCommand) -> Result<()> {
    let action =
        Action::from_str(&cmd.action).ok_or_else(|| anyhow!("unknown action: {}", cmd.action))?;
    let subject = Subject::from_str(&cmd.subject)
        .ok_or_else(|| anyhow!("unknown subject: {}", cmd.subject))?;
    if is_permitted(&cmd.role, action, subject) {
        println!("allow");
        Ok(())
    } else {
        println!("deny");
        std::process::exit(2);
    }
}
