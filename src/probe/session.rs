//! Session abstraction over the live Discord connection.
//!
//! This trait allows testing the check pipeline without a real gateway
//! session. The live implementation is in `crate::discord::session`, the
//! mock in `super::mock_session`.

use std::num::NonZeroU64;

/// A resolved guild, reduced to what the report needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildInfo {
    pub id: NonZeroU64,
    pub name: String,
}

/// A resolved guild channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: NonZeroU64,
    pub name: String,
}

/// The bot's own permission flags in a channel. Informational only, these
/// never affect whether the channel check passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPermissions {
    pub read_messages: bool,
    pub send_messages: bool,
    pub read_history: bool,
}

/// An authenticated Discord session, as seen by the check pipeline.
#[async_trait::async_trait]
pub trait DiscordSession: Send + Sync {
    /// Display tag of the authenticated bot identity (e.g. `doctor#0420`).
    fn bot_tag(&self) -> String;

    /// Resolve a guild by id, only among guilds the session is a member of.
    /// `Ok(None)` means the bot is not a member (or the id is wrong).
    async fn get_guild(&self, guild_id: NonZeroU64) -> Result<Option<GuildInfo>, String>;

    /// Resolve a channel by id, scoped to the given guild. A channel that
    /// belongs to a different guild must not match.
    async fn get_guild_channel(
        &self,
        guild_id: NonZeroU64,
        channel_id: NonZeroU64,
    ) -> Result<Option<ChannelInfo>, String>;

    /// Compute the bot's own permission flags in the given channel.
    async fn get_own_permissions(
        &self,
        guild_id: NonZeroU64,
        channel_id: NonZeroU64,
    ) -> Result<ChannelPermissions, String>;
}
