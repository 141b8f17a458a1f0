use std::fmt;

use anyhow::Result;
use comfy_table::Table;
use inquire::{Confirm, Select};
use owo_colors::OwoColorize;
use teambox_api::api::StorageApi;
use teambox_api::folders::{FolderTree, TreeNode};
use teambox_api::models::FolderRecord;

use crate::cli::{Args, FilesCommand};
use crate::services::{authed_client, friendly};
use crate::settings::Settings;

pub async fn run(args: &Args, stored: &Settings, command: FilesCommand) -> Result<()> {
    let client = authed_client(args, stored)?;

    match command {
        FilesCommand::Ls { prefix } => {
            let listing = client.list_files(&prefix).await.map_err(friendly)?;

            let mut table = Table::new();
            table.set_header(vec!["", "name", "size", "key"]);
            for folder in listing.folders {
                table.add_row(vec![
                    "dir".to_string(),
                    folder.name,
                    String::new(),
                    folder.key,
                ]);
            }
            for file in listing.files {
                table.add_row(vec![
                    String::new(),
                    file.name,
                    human_size(file.size),
                    file.key,
                ]);
            }
            println!("{table}");
        }
        FilesCommand::Upload { path, to } => {
            let uploaded = client.upload_file(&path, &to).await.map_err(friendly)?;
            println!(
                "{} uploaded {} ({})",
                "✓".bright_green(),
                uploaded.key.bright_cyan(),
                human_size(uploaded.size)
            );
        }
        FilesCommand::Mkdir { name, parent } => {
            let folder = client
                .create_folder(&parent, &name)
                .await
                .map_err(friendly)?;
            println!("{} created {}", "✓".bright_green(), folder.key.bright_cyan());
        }
        FilesCommand::Rm { key } => {
            if !confirm_delete(&key)? {
                return Ok(());
            }
            client.delete_file(&key).await.map_err(friendly)?;
            println!("{} deleted {}", "✓".bright_green(), key);
        }
        FilesCommand::Rmdir { key } => {
            if !confirm_delete(&key)? {
                return Ok(());
            }
            client.delete_folder(&key).await.map_err(friendly)?;
            println!("{} deleted {}", "✓".bright_green(), key);
        }
        FilesCommand::Rename { key, name } => {
            client.rename(&key, &name).await.map_err(friendly)?;
            println!("{} renamed to {}", "✓".bright_green(), name.bright_cyan());
        }
        FilesCommand::Mv { key } => {
            let mut folders = client.get_folders().await.map_err(friendly)?;

            // A folder must not be moved into itself or a descendant, so
            // those destinations are dropped before the tree is built.
            if key.ends_with('/') {
                folders.retain(|folder| !folder.key.starts_with(&key));
            }

            let destination = pick_folder(folders)?;
            client.move_file(&key, &destination).await.map_err(friendly)?;
            println!(
                "{} moved {} to {}",
                "✓".bright_green(),
                key,
                if destination.is_empty() {
                    "Home".to_string()
                } else {
                    destination
                }
                .bright_cyan()
            );
        }
        FilesCommand::Url { key } => {
            let url = client.download_url(&key).await.map_err(friendly)?;
            println!("{}", url);
        }
    }

    Ok(())
}

fn confirm_delete(key: &str) -> Result<bool> {
    let confirmed = Confirm::new(&format!("Delete {}?", key))
        .with_default(false)
        .prompt()?;
    if !confirmed {
        println!("{} nothing deleted", "ℹ".blue());
    }
    Ok(confirmed)
}

struct TreeRow {
    node: TreeNode,
}

impl fmt::Display for TreeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut line = String::new();

        if let Some((own, ancestors)) = self.node.ancestor_is_last.split_last() {
            for last in ancestors {
                line.push_str(if *last { "   " } else { "│  " });
            }
            line.push_str(if *own { "└─ " } else { "├─ " });
        }

        line.push_str(&self.node.record.name);
        if self.node.has_children && !self.node.expanded {
            line.push_str(" ▸");
        }

        write!(f, "{}", line)
    }
}

/// Interactive folder chooser over the lazily-expandable tree. Picking a
/// folder selects it and expands it; picking the selected folder again
/// confirms the choice.
fn pick_folder(records: Vec<FolderRecord>) -> Result<String> {
    let mut tree = FolderTree::new(records);

    loop {
        let options: Vec<TreeRow> = tree
            .visible_nodes()
            .into_iter()
            .map(|node| TreeRow { node })
            .collect();

        let picked = Select::new(
            "Destination folder (pick the same folder again to confirm):",
            options,
        )
        .with_page_size(20)
        .prompt()?;

        let key = picked.node.record.key;
        if !tree.select(&key) {
            return Ok(key);
        }
        tree.expand(&key);
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
