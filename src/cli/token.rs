//! `issue` and `verify` commands

use crate::app::{load_config, App};
use anyhow::{anyhow, Result};
use herald_core::{format_error_for_cli, Error};

/// Turn a library error into a CLI error with its suggestion attached.
fn friendly(error: impl Into<Error>) -> anyhow::Error {
    anyhow!(format_error_for_cli(&error.into()))
}

pub fn issue(identity: &str, ttl_secs: Option<u64>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(ttl) = ttl_secs {
        config.token.ttl_secs = ttl;
    }

    let app = App::from_config(&config).map_err(friendly)?;
    let issued = app.issuer.issue_claims(identity).map_err(friendly)?;

    println!("{}", issued.token);
    eprintln!("expires at {} (unix seconds)", issued.claims.exp);
    Ok(())
}

pub fn verify(token: &str) -> Result<()> {
    let config = load_config()?;
    let app = App::from_config(&config).map_err(friendly)?;

    let verified = app.auth.authenticate(token).map_err(friendly)?;
    println!("{}", serde_json::to_string_pretty(&verified)?);
    Ok(())
}
