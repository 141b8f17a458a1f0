use anyhow::Result;
use inquire::{Password, Text};
use owo_colors::OwoColorize;
use teambox_api::api::{AuthApi, IdentityClient, TeamApi};
use teambox_api::models::{AcceptInviteRequest, SignUpRequest};

use crate::cli::{Args, AuthCommand};
use crate::services::{anonymous_client, friendly};
use crate::settings::{write_settings, Settings};

pub async fn run(args: &Args, stored: &Settings, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Signup {
            email,
            name,
            company,
        } => signup(args, stored, email, name, company).await,
        AuthCommand::Login { email } => login(args, stored, email).await,
        AuthCommand::AcceptInvite { code } => accept_invite(args, stored, code).await,
        AuthCommand::Logout => logout(stored),
    }
}

async fn signup(
    args: &Args,
    stored: &Settings,
    email: String,
    name: String,
    company: String,
) -> Result<()> {
    let client = anonymous_client(args)?;
    let password = Password::new("Choose a password:").prompt()?;

    let request = SignUpRequest {
        email,
        password,
        name: name.clone(),
        company_name: company,
    };
    let custom_token = client.sign_up(&request).await.map_err(friendly)?;

    establish_session(args, stored, &custom_token, &name).await?;
    println!("{} account created", "✓".bright_green());
    Ok(())
}

async fn login(args: &Args, stored: &Settings, email: String) -> Result<()> {
    let client = anonymous_client(args)?;
    let password = Password::new("Password:").without_confirmation().prompt()?;

    let custom_token = client.log_in(&email, &password).await.map_err(friendly)?;

    // Display name falls back to the mailbox part of the address.
    let name = email.split('@').next().unwrap_or(&email).to_string();
    establish_session(args, stored, &custom_token, &name).await?;
    println!("{} logged in as {}", "✓".bright_green(), email.bright_cyan());
    Ok(())
}

async fn accept_invite(args: &Args, stored: &Settings, code: String) -> Result<()> {
    let client = anonymous_client(args)?;

    let check = client.check_invitation(&code).await.map_err(friendly)?;
    println!(
        "Invitation for {} to join {} as {}",
        check.email.bright_cyan(),
        check.company_name.bright_cyan(),
        check.role
    );

    let name = Text::new("Your display name:").prompt()?;
    let password = Password::new("Choose a password:").prompt()?;

    let request = AcceptInviteRequest {
        code,
        name: name.clone(),
        password,
    };
    let custom_token = client.accept_invite(&request).await.map_err(friendly)?;

    establish_session(args, stored, &custom_token, &name).await?;
    println!(
        "{} joined {}",
        "✓".bright_green(),
        check.company_name.bright_cyan()
    );
    Ok(())
}

/// Exchange the backend's custom token for a session and persist it.
async fn establish_session(
    args: &Args,
    stored: &Settings,
    custom_token: &str,
    name: &str,
) -> Result<()> {
    if args.identity_url.is_empty() {
        anyhow::bail!("no identity URL configured, pass --identity-url or set identity_url in config.toml");
    }

    let identity = IdentityClient::new(&args.identity_url);
    let session = identity
        .exchange_custom_token(custom_token)
        .await
        .map_err(friendly)?;

    let mut updated = stored.clone();
    updated.api_url = Some(args.api_url.clone());
    updated.socket_url = (!args.socket_url.is_empty()).then(|| args.socket_url.clone());
    updated.identity_url = Some(args.identity_url.clone());
    updated.id_token = Some(session.id_token);
    updated.user_id = Some(session.user_id);
    updated.user_name = Some(name.to_string());
    write_settings(&updated)
}

fn logout(stored: &Settings) -> Result<()> {
    let mut updated = stored.clone();
    updated.id_token = None;
    updated.user_id = None;
    updated.user_name = None;
    write_settings(&updated)?;

    println!("{} logged out", "✓".bright_green());
    Ok(())
}
