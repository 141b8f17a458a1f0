use std::fmt;
use std::path::Path;

use anyhow::Result;
use chrono::Local;
use comfy_table::Table;
use inquire::Select;
use owo_colors::OwoColorize;
use teambox_api::api::{BackendClient, ChatApi, StorageApi};
use teambox_api::models::{Attachment, ChatGroup, ChatMessage};
use teambox_api::realtime::Realtime;
use teambox_api::session::{ChatSession, SessionChange};
use teambox_api::timeline::{Timeline, TimelineState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::cli::{Args, ChatCommand};
use crate::services::{authed_client, friendly, local_user};
use crate::settings::Settings;

pub async fn run(args: &Args, stored: &Settings, command: ChatCommand) -> Result<()> {
    match command {
        ChatCommand::Groups => list_groups(args, stored).await,
        ChatCommand::Open { group } => open(args, stored, group).await,
        ChatCommand::Send {
            group,
            message,
            file,
        } => send_once(args, stored, group, message, file.as_deref()).await,
        ChatCommand::AddMembers { group, user_ids } => {
            let client = authed_client(args, stored)?;
            let group = resolve_group(&client, Some(&group)).await?;
            client
                .add_members(&group.id, &user_ids)
                .await
                .map_err(friendly)?;
            println!(
                "{} added {} members to {}",
                "✓".bright_green(),
                user_ids.len(),
                group.name.bright_cyan()
            );
            Ok(())
        }
        ChatCommand::RemoveMember { group, user_id } => {
            let client = authed_client(args, stored)?;
            let group = resolve_group(&client, Some(&group)).await?;
            client
                .remove_member(&group.id, &user_id)
                .await
                .map_err(friendly)?;
            println!(
                "{} removed {} from {}",
                "✓".bright_green(),
                user_id,
                group.name.bright_cyan()
            );
            Ok(())
        }
    }
}

async fn list_groups(args: &Args, stored: &Settings) -> Result<()> {
    let client = authed_client(args, stored)?;
    let groups = client.get_groups().await.map_err(friendly)?;

    let mut table = Table::new();
    table.set_header(vec!["name", "members", "last message"]);
    for group in groups {
        table.add_row(vec![
            group.name,
            group.members.len().to_string(),
            group
                .last_message
                .map(|last| format!("{}: {}", last.sender_name, last.content))
                .unwrap_or_default(),
        ]);
    }
    println!("{table}");

    Ok(())
}

struct GroupPick {
    group: ChatGroup,
}

impl fmt::Display for GroupPick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} members)", self.group.name, self.group.members.len())
    }
}

async fn resolve_group(client: &BackendClient, wanted: Option<&str>) -> Result<ChatGroup> {
    let groups = client.get_groups().await.map_err(friendly)?;
    if groups.is_empty() {
        anyhow::bail!("there are no chat groups yet");
    }

    match wanted {
        Some(name) => groups
            .into_iter()
            .find(|group| group.name == name || group.id == name)
            .ok_or_else(|| anyhow::anyhow!("no group named '{}'", name)),
        None => {
            let options: Vec<GroupPick> = groups
                .into_iter()
                .map(|group| GroupPick { group })
                .collect();
            let picked = Select::new("Open group:", options).prompt()?;
            Ok(picked.group)
        }
    }
}

fn message_line(message: &ChatMessage, local_user_id: &str) -> String {
    let time = message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();

    let sender = if message.sender_id == local_user_id {
        message.sender_name.bright_green().to_string()
    } else {
        message.sender_name.bright_cyan().to_string()
    };

    let mut line = format!("[{}] {}: {}", time.dimmed(), sender, message.content);

    for attachment in &message.attachments {
        line.push_str(&format!(" 📎{}", attachment.name));
    }

    if !message.reactions.is_empty() {
        let summary: Vec<&str> = message
            .reactions
            .iter()
            .map(|reaction| reaction.reaction.as_str())
            .collect();
        line.push_str(&format!(" [{}]", summary.join(" ")));
    }

    line
}

fn render_history(timeline: Option<&Timeline>, local_user_id: &str) {
    let Some(timeline) = timeline else {
        return;
    };

    match timeline.state() {
        TimelineState::Failed => {
            println!(
                "{} could not load messages, type /refresh to retry",
                "✗".bright_red()
            );
        }
        _ => {
            // Newest-first internally, oldest-first on screen.
            let messages: Vec<&ChatMessage> = timeline.messages().collect();
            for message in messages.into_iter().rev() {
                println!("{}", message_line(message, local_user_id));
            }
        }
    }
}

async fn open(args: &Args, stored: &Settings, wanted: Option<String>) -> Result<()> {
    let client = authed_client(args, stored)?;
    let (user_id, user_name) = local_user(stored)?;

    if args.socket_url.is_empty() {
        anyhow::bail!("no socket URL configured, pass --socket-url or set socket_url in config.toml");
    }
    let token = stored.id_token.as_deref().unwrap_or_default();

    let group = resolve_group(&client, wanted.as_deref()).await?;

    let realtime = Realtime::connect(&args.socket_url, token)
        .await
        .map_err(friendly)?;
    let mut events = realtime.subscribe();

    let mut session = ChatSession::new(client, realtime.clone(), &user_id, &user_name);

    println!("— {} —", group.name.bold());
    if let Err(e) = session.open_group(&group.id).await {
        println!("{} {}", "✗".bright_red(), e.user_message());
    }
    render_history(session.timeline(), &user_id);
    println!("{}", "type a message, /refresh to reload, /quit to leave".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => match session.handle_event(&event).await {
                    Ok(SessionChange::MessageArrived) => {
                        if let Some(message) = session.timeline().and_then(|t| t.messages().next()) {
                            println!("{}", message_line(message, &user_id));
                        }
                    }
                    Ok(SessionChange::ReactionsChanged) => {
                        println!("{}", "(reactions updated)".dimmed());
                    }
                    Ok(SessionChange::Refreshed) => {
                        println!("{}", "— reconnected, reloaded history —".dimmed());
                        render_history(session.timeline(), &user_id);
                    }
                    Ok(SessionChange::None) => {}
                    Err(e) => println!("{} {}", "✗".bright_red(), e.user_message()),
                },
                // Fell behind the event buffer; recover like a reconnect.
                Err(RecvError::Lagged(_)) => {
                    if let Err(e) = session.refresh().await {
                        println!("{} {}", "✗".bright_red(), e.user_message());
                    } else {
                        render_history(session.timeline(), &user_id);
                    }
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                if line == "/refresh" {
                    match session.refresh().await {
                        Ok(()) => render_history(session.timeline(), &user_id),
                        Err(e) => println!("{} {}", "✗".bright_red(), e.user_message()),
                    }
                    continue;
                }

                // Optimistic echo before the round-trip; a failure rolls the
                // entry back and the typed line is gone.
                println!(
                    "[{}] {}: {}",
                    Local::now().format("%H:%M").to_string().dimmed(),
                    user_name.bright_green(),
                    line
                );
                if let Err(e) = session.send(line, Vec::new()).await {
                    println!(
                        "{} message not sent: {}",
                        "✗".bright_red(),
                        e.user_message()
                    );
                }
            }
        }
    }

    session.close();
    realtime.close();
    Ok(())
}

async fn send_once(
    args: &Args,
    stored: &Settings,
    group_name: String,
    message: String,
    file: Option<&Path>,
) -> Result<()> {
    let client = authed_client(args, stored)?;
    let group = resolve_group(&client, Some(&group_name)).await?;

    let mut attachments = Vec::new();
    if let Some(path) = file {
        let uploaded = client
            .upload_file(path, "chat-attachments/")
            .await
            .map_err(friendly)?;
        let url = client.download_url(&uploaded.key).await.map_err(friendly)?;
        attachments.push(Attachment {
            name: uploaded.name,
            url,
            mime_type: uploaded.mime_type,
            size: Some(uploaded.size),
        });
    }

    client
        .send_message(&group.id, &message, &attachments)
        .await
        .map_err(friendly)?;
    println!("{} sent to {}", "✓".bright_green(), group.name.bright_cyan());

    Ok(())
}
