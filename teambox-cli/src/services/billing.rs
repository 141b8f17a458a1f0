use anyhow::Result;
use owo_colors::OwoColorize;
use teambox_api::api::BillingApi;

use crate::cli::{Args, BillingCommand};
use crate::services::{authed_client, friendly};
use crate::settings::Settings;

pub async fn run(args: &Args, stored: &Settings, command: BillingCommand) -> Result<()> {
    let client = authed_client(args, stored)?;

    match command {
        BillingCommand::Status => {
            let plan = client.company_plan().await.map_err(friendly)?;

            println!("plan:   {}", plan.plan.bright_cyan());
            println!("status: {}", plan.status);
            if let Some(seats) = plan.seats {
                println!("seats:  {}", seats);
            }
            if let Some(renews_at) = plan.renews_at {
                println!("renews: {}", renews_at.format("%Y-%m-%d"));
            }
        }
        BillingCommand::Checkout { plan } => {
            let url = client.checkout_session(&plan).await.map_err(friendly)?;
            println!("Open this URL in your browser to complete checkout:");
            println!("{}", url.bright_cyan());
        }
        BillingCommand::Portal => {
            let url = client.customer_portal().await.map_err(friendly)?;
            println!("Open this URL in your browser to manage billing:");
            println!("{}", url.bright_cyan());
        }
    }

    Ok(())
}
