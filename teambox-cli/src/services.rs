pub mod auth;
pub mod billing;
pub mod chat;
pub mod files;
pub mod integrations;
pub mod team;

use anyhow::Result;
use log::debug;
use teambox_api::api::BackendClient;
use teambox_api::ApiError;

use crate::cli::{Args, Command};
use crate::settings::{self, Settings};

pub async fn run(args: Args) -> Result<()> {
    let stored = settings::load_settings()?;

    match args.command.clone() {
        Command::Auth { command } => auth::run(&args, &stored, command).await,
        Command::Team { command } => team::run(&args, &stored, command).await,
        Command::Chat { command } => chat::run(&args, &stored, command).await,
        Command::Files { command } => files::run(&args, &stored, command).await,
        Command::Billing { command } => billing::run(&args, &stored, command).await,
        Command::Slack { command } => integrations::run_slack(&args, &stored, command).await,
        Command::Whatsapp { command } => integrations::run_whatsapp(&args, &stored, command).await,
    }
}

pub(crate) fn require_api_url(args: &Args) -> Result<&str> {
    if args.api_url.is_empty() {
        anyhow::bail!("no API URL configured, pass --api-url or set api_url in config.toml");
    }
    Ok(&args.api_url)
}

/// Client for endpoints reachable before login.
pub(crate) fn anonymous_client(args: &Args) -> Result<BackendClient> {
    Ok(BackendClient::new(require_api_url(args)?, None))
}

pub(crate) fn authed_client(args: &Args, stored: &Settings) -> Result<BackendClient> {
    let api_url = require_api_url(args)?;
    let token = stored
        .id_token
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("not logged in, run `teambox auth login` first"))?;
    Ok(BackendClient::new(api_url, Some(token)))
}

pub(crate) fn local_user(stored: &Settings) -> Result<(String, String)> {
    let user_id = stored
        .user_id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("not logged in, run `teambox auth login` first"))?;
    let user_name = stored.user_name.clone().unwrap_or_else(|| user_id.clone());
    Ok((user_id, user_name))
}

/// Backend messages are surfaced verbatim, transport failures generically;
/// the full error is kept in the debug log.
pub(crate) fn friendly(e: ApiError) -> anyhow::Error {
    debug!("api call failed: {:?}", e);
    anyhow::anyhow!(e.user_message())
}
