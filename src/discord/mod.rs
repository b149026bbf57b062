//! Discord Gateway lifecycle for the probe.
//!
//! Connects once as a bot, waits for the ready event with an explicit
//! deadline, runs the credential checks inside the ready handler, then shuts
//! the gateway down. The report travels back to the caller through a oneshot
//! channel, so there is no shared mutable state between the handler and the
//! main path. Token is never logged or exposed.

use std::sync::Mutex;
use std::time::Duration;

use serenity::client::{Client, Context, EventHandler};
use serenity::model::gateway::{GatewayIntents, Ready};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::config::Credentials;
use crate::probe::{probe_credentials, ProbeError, ProbeReport};

pub mod session;

use session::GatewaySession;

/// One-shot ready handler: runs the checks, sends the report, closes the
/// shard. The sender is consumed on first use so a gateway reconnect cannot
/// run the checks twice.
struct ReadyProbe {
    guild_id: String,
    channel_id: String,
    report_tx: Mutex<Option<oneshot::Sender<ProbeReport>>>,
}

#[serenity::async_trait]
impl EventHandler for ReadyProbe {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let tx = match self.report_tx.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        let Some(tx) = tx else {
            debug!("Discord: Ready fired again (reconnect), checks already ran");
            return;
        };

        info!("Discord: Bot connected as {} (id: {})", ready.user.name, ready.user.id);

        let session = GatewaySession::new(
            ctx.http.clone(),
            ready.user.tag(),
            ready.user.id,
            ready.guilds.iter().map(|g| g.id).collect(),
        );
        let report = probe_credentials(&session, &self.guild_id, &self.channel_id).await;

        if tx.send(report).is_err() {
            debug!("Discord: Caller gone before the report was sent");
        }

        // Close the session on every path out of the handler so the process
        // does not hang on an idle connection.
        ctx.shard.shutdown_clean();
    }
}

/// Connect to the gateway, wait for ready (bounded by `ready_timeout`), run
/// the checks and return the report. The connection is torn down before this
/// returns, on every path: success, gateway error, deadline, Ctrl-C.
pub async fn connect_and_probe(
    creds: &Credentials,
    ready_timeout: Duration,
) -> Result<ProbeReport, ProbeError> {
    info!("Discord: Connecting to Discord Gateway (discord.com)…");

    // Guild list plus message read scope; enough to resolve guild and
    // channel objects, no privileged intents.
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES;

    let (tx, mut rx) = oneshot::channel();
    let handler = ReadyProbe {
        guild_id: creds.guild_id.clone(),
        channel_id: creds.channel_id.clone(),
        report_tx: Mutex::new(Some(tx)),
    };

    let mut client = Client::builder(&creds.token, intents)
        .event_handler(handler)
        .await
        .map_err(classify_start_error)?;

    let shards = client.shard_manager.clone();
    info!("Discord: Gateway client built, starting connection…");
    let mut gateway = tokio::spawn(async move { client.start().await });

    let report = tokio::select! {
        report = &mut rx => match report {
            Ok(report) => report,
            Err(_) => {
                // Sender dropped without a report: the client ended before
                // the ready event. Classify whatever start() returned.
                return Err(match gateway.await {
                    Ok(Ok(())) => {
                        ProbeError::Connection("gateway closed before the ready event".to_string())
                    }
                    Ok(Err(e)) => classify_start_error(e),
                    Err(e) => ProbeError::Connection(format!("gateway task failed: {}", e)),
                });
            }
        },
        res = &mut gateway => {
            return Err(match res {
                Ok(Ok(())) => {
                    ProbeError::Connection("gateway closed before the ready event".to_string())
                }
                Ok(Err(e)) => classify_start_error(e),
                Err(e) => ProbeError::Connection(format!("gateway task failed: {}", e)),
            });
        }
        _ = tokio::time::sleep(ready_timeout) => {
            error!("Discord: No ready event within {}s, giving up", ready_timeout.as_secs());
            shards.shutdown_all().await;
            let _ = gateway.await;
            return Err(ProbeError::ReadyTimeout(ready_timeout));
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Discord: Interrupted, shutting down gateway");
            shards.shutdown_all().await;
            let _ = gateway.await;
            return Err(ProbeError::Interrupted);
        }
    };

    // The handler already requested a clean shard shutdown; shutdown_all is
    // idempotent. Wait for the gateway task so the connection is down before
    // we hand the report back.
    shards.shutdown_all().await;
    let _ = gateway.await;
    info!("Discord: Gateway shut down");
    Ok(report)
}

/// Map a serenity startup error onto the probe's taxonomy: a rejected token
/// is its own case, everything else surfaces verbatim.
fn classify_start_error(err: serenity::Error) -> ProbeError {
    match &err {
        serenity::Error::Gateway(serenity::gateway::GatewayError::InvalidAuthentication) => {
            ProbeError::AuthRejected
        }
        _ => ProbeError::Connection(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_authentication_maps_to_auth_rejected() {
        let err = serenity::Error::Gateway(serenity::gateway::GatewayError::InvalidAuthentication);
        assert!(matches!(classify_start_error(err), ProbeError::AuthRejected));
    }

    #[test]
    fn other_errors_surface_their_message() {
        let err = serenity::Error::Other("boom");
        match classify_start_error(err) {
            ProbeError::Connection(msg) => assert!(msg.contains("boom")),
            other => panic!("expected Connection, got {:?}", other),
        }
    }
}
