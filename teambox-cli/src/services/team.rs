use anyhow::Result;
use comfy_table::Table;
use owo_colors::OwoColorize;
use teambox_api::api::TeamApi;

use crate::cli::{Args, TeamCommand};
use crate::services::{authed_client, friendly};
use crate::settings::Settings;

pub async fn run(args: &Args, stored: &Settings, command: TeamCommand) -> Result<()> {
    let client = authed_client(args, stored)?;

    match command {
        TeamCommand::Invite { email, role } => {
            let invitation = client
                .send_invitation(&email, role.into())
                .await
                .map_err(friendly)?;
            println!(
                "{} invited {} as {}",
                "✓".bright_green(),
                invitation.email.bright_cyan(),
                invitation.role
            );
        }
        TeamCommand::Invitations => {
            let invitations = client.get_invitations().await.map_err(friendly)?;
            if invitations.is_empty() {
                println!("No invitations.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["id", "email", "role", "status", "sent"]);
            for invitation in invitations {
                table.add_row(vec![
                    invitation.id,
                    invitation.email,
                    invitation.role.to_string(),
                    invitation.status.to_string(),
                    invitation
                        .created_at
                        .map(|at| at.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        TeamCommand::Cancel { invitation_id } => {
            client
                .cancel_invitation(&invitation_id)
                .await
                .map_err(friendly)?;
            println!("{} invitation cancelled", "✓".bright_green());
        }
        TeamCommand::Resend { invitation_id } => {
            client
                .resend_invitation(&invitation_id)
                .await
                .map_err(friendly)?;
            println!("{} invitation sent again", "✓".bright_green());
        }
        TeamCommand::Members => {
            let members = client.get_members().await.map_err(friendly)?;

            let mut table = Table::new();
            table.set_header(vec!["id", "name", "email", "role", "active"]);
            for member in members {
                table.add_row(vec![
                    member.id,
                    member.name,
                    member.email,
                    member.role.to_string(),
                    if member.enabled { "✓" } else { "✗" }.to_string(),
                ]);
            }
            println!("{table}");
        }
        TeamCommand::Enable { member_id } => {
            client.enable_member(&member_id).await.map_err(friendly)?;
            println!("{} member enabled", "✓".bright_green());
        }
        TeamCommand::Disable { member_id } => {
            client.disable_member(&member_id).await.map_err(friendly)?;
            println!("{} member disabled", "✓".bright_green());
        }
        TeamCommand::Remove { member_id } => {
            client.remove_member(&member_id).await.map_err(friendly)?;
            println!("{} member removed", "✓".bright_green());
        }
    }

    Ok(())
}
