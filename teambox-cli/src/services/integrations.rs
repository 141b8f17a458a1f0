use anyhow::Result;
use comfy_table::Table;
use inquire::MultiSelect;
use owo_colors::OwoColorize;
use teambox_api::api::{SlackApi, WhatsAppApi};

use crate::cli::{Args, SlackCommand, WhatsappCommand};
use crate::services::{authed_client, friendly};
use crate::settings::Settings;

pub async fn run_slack(args: &Args, stored: &Settings, command: SlackCommand) -> Result<()> {
    let client = authed_client(args, stored)?;

    match command {
        SlackCommand::Connect => {
            let url = client.connect_url().await.map_err(friendly)?;
            println!("Open this URL in your browser to connect Slack:");
            println!("{}", url.bright_cyan());
        }
        SlackCommand::Channels => {
            let channels = client.list_channels().await.map_err(friendly)?;

            let mut table = Table::new();
            table.set_header(vec!["id", "name", "private", "tracked"]);
            for channel in channels {
                table.add_row(vec![
                    channel.id,
                    channel.name,
                    if channel.is_private { "✓" } else { "" }.to_string(),
                    if channel.tracked { "✓" } else { "" }.to_string(),
                ]);
            }
            println!("{table}");
        }
        SlackCommand::Track { channel_ids } => {
            let channel_ids = if channel_ids.is_empty() {
                prompt_channels(&client).await?
            } else {
                channel_ids
            };

            client
                .set_tracked_channels(&channel_ids)
                .await
                .map_err(friendly)?;
            println!(
                "{} tracking {} channels",
                "✓".bright_green(),
                channel_ids.len().to_string().bright_cyan()
            );
        }
        SlackCommand::Messages {
            channel,
            search,
            cursor,
        } => {
            let page = SlackApi::get_messages(&client, &channel, search.as_deref(), cursor.as_deref())
                .await
                .map_err(friendly)?;

            for message in &page.messages {
                println!("{}: {}", message.user_name.bright_cyan(), message.text);
            }
            if let Some(next_cursor) = page.next_cursor {
                println!("{}", format!("more with --cursor {}", next_cursor).dimmed());
            }
        }
    }

    Ok(())
}

struct ChannelPick {
    id: String,
    label: String,
}

impl std::fmt::Display for ChannelPick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

async fn prompt_channels(client: &impl SlackApi) -> Result<Vec<String>> {
    let channels = client.list_channels().await.map_err(friendly)?;
    if channels.is_empty() {
        anyhow::bail!("the workspace has no channels, connect Slack first");
    }

    let default: Vec<usize> = channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| channel.tracked)
        .map(|(index, _)| index)
        .collect();

    let options: Vec<ChannelPick> = channels
        .into_iter()
        .map(|channel| ChannelPick {
            label: format!("#{}", channel.name),
            id: channel.id,
        })
        .collect();

    let selected = MultiSelect::new(
        "Track channels (Space to select, Enter to confirm):",
        options,
    )
    .with_default(&default)
    .with_page_size(20)
    .prompt()?;

    Ok(selected.into_iter().map(|pick| pick.id).collect())
}

pub async fn run_whatsapp(args: &Args, stored: &Settings, command: WhatsappCommand) -> Result<()> {
    let client = authed_client(args, stored)?;

    match command {
        WhatsappCommand::Connect => {
            let connect = client.connect().await.map_err(friendly)?;
            if connect.connected {
                println!("{} WhatsApp is already linked", "✓".bright_green());
            } else if let Some(qr_code) = connect.qr_code {
                println!("Scan this code from WhatsApp on your phone:");
                println!("{}", qr_code);
            } else {
                println!("{} no QR code available yet, try again", "⚠".yellow());
            }
        }
        WhatsappCommand::Status => {
            let status = client.status().await.map_err(friendly)?;
            if status.connected {
                println!(
                    "{} connected as {}",
                    "✓".bright_green(),
                    status.phone_number.unwrap_or_default().bright_cyan()
                );
            } else {
                println!("{} not connected", "✗".bright_red());
            }
        }
        WhatsappCommand::Disconnect => {
            client.disconnect().await.map_err(friendly)?;
            println!("{} session unlinked", "✓".bright_green());
        }
        WhatsappCommand::Messages { search, page } => {
            let result = WhatsAppApi::get_messages(&client, search.as_deref(), page)
                .await
                .map_err(friendly)?;

            for message in &result.messages {
                println!(
                    "[{}] {}: {}",
                    message.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    message.from.bright_cyan(),
                    message.body
                );
            }
            if result.total_pages > 1 {
                println!(
                    "{}",
                    format!("page {} of {}", result.page, result.total_pages).dimmed()
                );
            }
        }
    }

    Ok(())
}
