//! `demo` command: one process playing both client and server

use crate::app::{load_config, App};
use anyhow::{Context, Result};
use herald_core::event_bus::{USER_LOGGED_IN, USER_LOGIN_FAILED, USER_REGISTERED};
use herald_core::{ChannelObserver, LoggingObserver, SigningSecret};
use std::sync::Arc;
use tracing::warn;

const DEMO_PASSWORD: &str = "correct horse battery staple";

pub async fn run(username: &str) -> Result<()> {
    let mut config = load_config()?;
    if !config.has_secret() {
        warn!("No signing secret configured, using a throwaway one for this demo");
        config.token.secret = Some(SigningSecret::generate().to_base64());
    }
    let app = App::from_config(&config).context("Failed to build services")?;

    // Observers live as long as these Arcs
    let audit = Arc::new(LoggingObserver::new("audit"));
    let (forwarder, mut events) = ChannelObserver::channel();
    let forwarder = Arc::new(forwarder);
    for event_type in [USER_REGISTERED, USER_LOGGED_IN, USER_LOGIN_FAILED] {
        app.bus.subscribe(event_type, &audit)?;
        app.bus.subscribe(event_type, &forwarder)?;
    }

    let printer = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Some(event) = events.recv().await {
            seen += 1;
            println!("event #{}: {} {}", seen, event.event_type, event.payload);
        }
        seen
    });

    app.auth.register(username, DEMO_PASSWORD)?;
    if app.auth.login(username, "wrong password").is_err() {
        println!("login with a wrong password was rejected");
    }
    let issued = app.auth.login(username, DEMO_PASSWORD)?;
    println!("token: {}", issued.token);

    let verified = app.auth.authenticate(&format!("Bearer {}", issued.token))?;
    println!(
        "verified subject '{}' until {}",
        verified.subject,
        verified.expires_at.to_rfc3339()
    );

    // Close the channel so the printer task finishes
    app.bus.unsubscribe_all(&forwarder)?;
    drop(forwarder);
    let seen = printer.await.context("Event printer task failed")?;
    println!("{} events delivered", seen);
    Ok(())
}
