//! The credential check pipeline and its result types.
//!
//! Checks run in strict order: login, guild, channel, permissions. Each step
//! is fail-soft: a malformed id or a miss is recorded as a tagged outcome and
//! reported, later steps that depend on it are skipped, and the pipeline
//! still returns a complete report. The channel lookup is scoped to the
//! resolved guild, so `channel_ok` implies `guild_ok` implies `login_ok`.

use std::num::NonZeroU64;
use std::time::Duration;

use thiserror::Error;

pub mod session;

#[cfg(test)]
pub mod mock_session;

pub use session::{ChannelInfo, ChannelPermissions, DiscordSession, GuildInfo};

use crate::report;

/// Outcome of one id lookup (guild or channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Object resolved; `name` is its display name.
    Found { name: String },
    /// The id string is not a valid Discord snowflake.
    InvalidId,
    /// The id parses but no matching object is visible to the session.
    NotFound,
    /// The lookup itself failed (HTTP error, permissions, ...).
    Failed { reason: String },
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }

    fn name(&self) -> Option<&str> {
        match self {
            LookupOutcome::Found { name } => Some(name),
            _ => None,
        }
    }
}

/// Everything the probe learned during one session, assembled inside the
/// ready handler and returned to the caller as a plain value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    /// Display tag of the bot; set iff login succeeded.
    pub bot_name: Option<String>,
    /// Guild lookup outcome; `None` until attempted.
    pub guild_lookup: Option<LookupOutcome>,
    /// Channel lookup outcome; `None` when skipped (guild not resolved).
    pub channel_lookup: Option<LookupOutcome>,
    /// The bot's own flags in the resolved channel. Informational only.
    pub permissions: Option<ChannelPermissions>,
}

impl ProbeReport {
    pub fn login_ok(&self) -> bool {
        self.bot_name.is_some()
    }

    pub fn guild_ok(&self) -> bool {
        self.guild_lookup.as_ref().is_some_and(LookupOutcome::is_found)
    }

    pub fn channel_ok(&self) -> bool {
        self.channel_lookup.as_ref().is_some_and(LookupOutcome::is_found)
    }

    pub fn guild_name(&self) -> Option<&str> {
        self.guild_lookup.as_ref().and_then(LookupOutcome::name)
    }

    pub fn channel_name(&self) -> Option<&str> {
        self.channel_lookup.as_ref().and_then(LookupOutcome::name)
    }

    pub fn all_valid(&self) -> bool {
        self.login_ok() && self.guild_ok() && self.channel_ok()
    }
}

/// Connection-level failures. Check-level failures never surface here, they
/// live inside the [`ProbeReport`] as [`LookupOutcome`]s.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Discord rejected the token during the gateway handshake.
    #[error("Invalid Discord token")]
    AuthRejected,
    /// Any other transport or session-establishment failure.
    #[error("{0}")]
    Connection(String),
    /// The gateway never delivered a ready event within the deadline.
    #[error("no ready event within {}s", .0.as_secs())]
    ReadyTimeout(Duration),
    /// Ctrl-C before the probe completed.
    #[error("interrupted")]
    Interrupted,
}

/// Parse a Discord snowflake id. Zero is not a valid snowflake.
pub fn parse_snowflake(s: &str) -> Option<NonZeroU64> {
    s.trim().parse().ok()
}

/// Run the check sequence against an authenticated session, printing report
/// sections 2-5 as they complete. Always returns the assembled report; the
/// caller is responsible for closing the session afterwards.
pub async fn probe_credentials(
    session: &dyn DiscordSession,
    guild_id: &str,
    channel_id: &str,
) -> ProbeReport {
    let mut result = ProbeReport {
        bot_name: Some(session.bot_tag()),
        ..ProbeReport::default()
    };
    println!("{}", report::login_section(session.bot_tag().as_str()));

    // Guild check. Channel check only runs when this resolves.
    let mut resolved_guild = None;
    let guild_outcome = match parse_snowflake(guild_id) {
        None => LookupOutcome::InvalidId,
        Some(id) => match session.get_guild(id).await {
            Ok(Some(guild)) => {
                resolved_guild = Some(id);
                LookupOutcome::Found { name: guild.name }
            }
            Ok(None) => LookupOutcome::NotFound,
            Err(reason) => LookupOutcome::Failed { reason },
        },
    };
    println!("{}", report::guild_section(guild_id, &guild_outcome));
    result.guild_lookup = Some(guild_outcome);

    let Some(guild) = resolved_guild else {
        return result;
    };

    // Channel check, scoped to the resolved guild.
    let mut resolved_channel = None;
    let channel_outcome = match parse_snowflake(channel_id) {
        None => LookupOutcome::InvalidId,
        Some(id) => match session.get_guild_channel(guild, id).await {
            Ok(Some(channel)) => {
                resolved_channel = Some(id);
                LookupOutcome::Found { name: channel.name }
            }
            Ok(None) => LookupOutcome::NotFound,
            Err(reason) => LookupOutcome::Failed { reason },
        },
    };
    println!("{}", report::channel_section(channel_id, &channel_outcome));
    result.channel_lookup = Some(channel_outcome);

    // Permission flags for the bot itself in the resolved channel. A failure
    // here is reported inline and does not undo the channel finding.
    if let Some(channel) = resolved_channel {
        match session.get_own_permissions(guild, channel).await {
            Ok(perms) => {
                println!("{}", report::permissions_section(&perms));
                result.permissions = Some(perms);
            }
            Err(reason) => println!("   ✗ Error reading permissions: {}", reason),
        }
    }

    result
}
