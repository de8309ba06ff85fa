//! CLI module for Herald
//!
//! Provides commands:
//! - `gen-secret`: print a fresh signing secret
//! - `issue`: mint a token for an identity
//! - `verify`: check a token and print its claims
//! - `demo`: walk through register, login and event delivery

use clap::{Parser, Subcommand};

pub mod demo;
pub mod secret;
pub mod token;

/// Herald event bus and token CLI
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Observer event bus and stateless bearer tokens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a random signing secret
    GenSecret,
    /// Issue a token for an already-authenticated identity
    Issue {
        /// Subject to put in the token
        identity: String,
        /// Override the configured lifetime
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
    /// Verify a token (accepts an optional "Bearer " prefix)
    Verify {
        /// Token to check
        token: String,
    },
    /// Run an in-process register/login/verify walkthrough
    Demo {
        /// Username to register
        #[arg(long, default_value = "alice")]
        username: String,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::GenSecret) => secret::run(),
        Some(Commands::Issue { identity, ttl_secs }) => token::issue(&identity, ttl_secs),
        Some(Commands::Verify { token }) => token::verify(&token),
        Some(Commands::Demo { username }) => demo::run(&username).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
