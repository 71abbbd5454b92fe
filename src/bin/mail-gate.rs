#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for the inbound email gate

use anyhow::Context;
use clap::{Parser, Subcommand};
use mail_gate::{Decision, EmailAddress, FilterConfig, InboundFilter, Notification};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mail-gate")]
#[command(about = "Sender allowlist gate for inbound email webhook events")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one webhook event payload
    Check {
        /// Path to the JSON payload, or `-` for stdin
        payload: PathBuf,
    },

    /// Report whether an address is on the allowlist
    Allowed {
        /// Sender address (bare or `Name <addr>` form)
        address: String,
    },

    /// Run the webhook receiver
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8787")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = FilterConfig::from_env()?;
    let filter = InboundFilter::from_config(config)?;

    match &args.command {
        Command::Check { payload } => {
            cmd_check(&filter, &args, payload).await?;
        }
        Command::Allowed { address } => {
            cmd_allowed(&filter, &args, address)?;
        }
        Command::Serve { bind } => {
            mail_gate::webhook::serve(Arc::new(filter), *bind).await?;
        }
    }

    Ok(())
}

async fn cmd_check(
    filter: &InboundFilter,
    args: &Args,
    payload: &Path,
) -> anyhow::Result<()> {
    let bytes = if payload.as_os_str() == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        tokio::fs::read(payload)
            .await
            .with_context(|| format!("Failed to read {}", payload.display()))?
    };

    let decision = filter.evaluate_json(&bytes);

    if args.json {
        let output = decision.into_output();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_decision(&decision);
    }

    Ok(())
}

fn cmd_allowed(filter: &InboundFilter, args: &Args, raw: &str) -> anyhow::Result<()> {
    let address = EmailAddress::parse(raw)
        .with_context(|| format!("Invalid address '{raw}'"))?;
    let allowed = filter.allowlist().contains(&address);

    if args.json {
        let value = serde_json::json!({
            "address": address.as_str(),
            "allowed": allowed,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if allowed {
        println!("{address}: allowed");
    } else {
        println!("{address}: not allowed");
    }

    Ok(())
}

fn print_decision(decision: &Decision) {
    match decision {
        Decision::Drop(reason) => println!("Dropped: {reason}"),
        Decision::Notify(notification) => print_notification(notification),
    }
}

fn print_notification(n: &Notification) {
    println!("Action:  wake");
    println!("Channel: {}", n.channel);
    println!("To:      {}", n.to);
    println!("Deliver: {}", n.deliver);
    println!("\n--- Text ---\n");
    println!("{}", n.text);
}
