use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use teambox_api::models::MemberRole;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Teambox API base URL
    #[arg(long, env = "TEAMBOX_API_URL", default_value = "")]
    pub api_url: String,

    /// Realtime socket URL
    #[arg(long, env = "TEAMBOX_SOCKET_URL", default_value = "")]
    pub socket_url: String,

    /// Identity provider base URL
    #[arg(long, env = "TEAMBOX_IDENTITY_URL", default_value = "")]
    pub identity_url: String,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign up, log in or accept a team invitation
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Manage members and invitations
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },
    /// Group chat
    Chat {
        #[command(subcommand)]
        command: ChatCommand,
    },
    /// Cloud file storage
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
    /// Plan and payment management
    Billing {
        #[command(subcommand)]
        command: BillingCommand,
    },
    /// Slack workspace integration
    Slack {
        #[command(subcommand)]
        command: SlackCommand,
    },
    /// WhatsApp integration
    Whatsapp {
        #[command(subcommand)]
        command: WhatsappCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Create a new company account
    Signup {
        email: String,
        /// Your display name
        #[arg(long)]
        name: String,
        /// Name of the company to create
        #[arg(long)]
        company: String,
    },
    /// Log in to an existing account
    Login { email: String },
    /// Join a company with an invitation code
    AcceptInvite { code: String },
    /// Forget the stored session
    Logout,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeamCommand {
    /// Invite someone by email
    Invite {
        email: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Member)]
        role: RoleArg,
    },
    /// List pending and past invitations
    Invitations,
    /// Cancel a pending invitation
    Cancel { invitation_id: String },
    /// Send an invitation email again
    Resend { invitation_id: String },
    /// List company members
    Members,
    /// Re-enable a disabled member
    Enable { member_id: String },
    /// Disable a member without removing them
    Disable { member_id: String },
    /// Remove a member from the company
    Remove { member_id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ChatCommand {
    /// List chat groups
    Groups,
    /// Open a group and chat interactively
    Open {
        /// Group name; prompts for a choice when omitted
        group: Option<String>,
    },
    /// Send a single message without opening the group
    Send {
        group: String,
        message: String,
        /// Attach a local file (uploaded to storage first)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Add members to a group
    AddMembers {
        group: String,
        user_ids: Vec<String>,
    },
    /// Remove a member from a group
    RemoveMember { group: String, user_id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FilesCommand {
    /// List folders and files under a prefix
    Ls {
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Upload a local file
    Upload {
        path: PathBuf,
        /// Destination folder prefix
        #[arg(long, default_value = "")]
        to: String,
    },
    /// Create a folder
    Mkdir {
        name: String,
        /// Parent folder prefix
        #[arg(long = "in", default_value = "")]
        parent: String,
    },
    /// Delete a file
    Rm { key: String },
    /// Delete a folder
    Rmdir { key: String },
    /// Rename a file or folder
    Rename { key: String, name: String },
    /// Move a file to another folder, chosen interactively
    Mv { key: String },
    /// Print a download URL
    Url { key: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum BillingCommand {
    /// Show the company plan and status
    Status,
    /// Start a checkout session for a plan
    Checkout { plan: String },
    /// Open the customer portal
    Portal,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SlackCommand {
    /// Connect a Slack workspace
    Connect,
    /// List workspace channels
    Channels,
    /// Choose which channels are tracked; prompts when no ids are given
    Track { channel_ids: Vec<String> },
    /// Show messages from a tracked channel
    Messages {
        channel: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        cursor: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum WhatsappCommand {
    /// Link a WhatsApp session
    Connect,
    /// Show the session status
    Status,
    /// Unlink the session
    Disconnect,
    /// Show synced messages
    Messages {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Member,
}

impl From<RoleArg> for MemberRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => MemberRole::Admin,
            RoleArg::Member => MemberRole::Member,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}
