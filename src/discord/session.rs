//! Live `DiscordSession` backed by the gateway's ready payload and the REST
//! API.
//!
//! Membership is taken from the guild list delivered with the ready event
//! (the cache feature is off), so an id the bot is not a member of resolves
//! to not-found without a REST round trip. Names and permissions come from
//! the HTTP API.

use std::collections::HashSet;
use std::num::NonZeroU64;
use std::sync::Arc;

use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::model::permissions::Permissions;

use crate::probe::{ChannelInfo, ChannelPermissions, DiscordSession, GuildInfo};

pub struct GatewaySession {
    http: Arc<Http>,
    bot_tag: String,
    bot_id: UserId,
    /// Guild ids from the ready payload, i.e. guilds the bot is a member of.
    member_guilds: HashSet<GuildId>,
}

impl GatewaySession {
    pub fn new(
        http: Arc<Http>,
        bot_tag: String,
        bot_id: UserId,
        member_guilds: HashSet<GuildId>,
    ) -> Self {
        Self { http, bot_tag, bot_id, member_guilds }
    }

    async fn find_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<serenity::model::channel::GuildChannel>, String> {
        let channels = self
            .http
            .get_channels(guild_id)
            .await
            .map_err(|e| e.to_string())?;
        Ok(channels.into_iter().find(|c| c.id == channel_id))
    }
}

#[async_trait::async_trait]
impl DiscordSession for GatewaySession {
    fn bot_tag(&self) -> String {
        self.bot_tag.clone()
    }

    async fn get_guild(&self, guild_id: NonZeroU64) -> Result<Option<GuildInfo>, String> {
        let id = GuildId::new(guild_id.get());
        if !self.member_guilds.contains(&id) {
            // Not in the ready payload: the bot is not a member (or the id
            // is wrong). Plain not-found, not an API error.
            return Ok(None);
        }
        let guild = self.http.get_guild(id).await.map_err(|e| e.to_string())?;
        Ok(Some(GuildInfo { id: guild_id, name: guild.name }))
    }

    async fn get_guild_channel(
        &self,
        guild_id: NonZeroU64,
        channel_id: NonZeroU64,
    ) -> Result<Option<ChannelInfo>, String> {
        // Listing the guild's channels scopes the lookup: a channel id from
        // another guild simply is not in the list.
        let channel = self
            .find_channel(GuildId::new(guild_id.get()), ChannelId::new(channel_id.get()))
            .await?;
        Ok(channel.map(|c| ChannelInfo { id: channel_id, name: c.name }))
    }

    async fn get_own_permissions(
        &self,
        guild_id: NonZeroU64,
        channel_id: NonZeroU64,
    ) -> Result<ChannelPermissions, String> {
        let gid = GuildId::new(guild_id.get());
        let guild = self.http.get_guild(gid).await.map_err(|e| e.to_string())?;
        let channel = self
            .find_channel(gid, ChannelId::new(channel_id.get()))
            .await?
            .ok_or_else(|| "channel no longer visible".to_string())?;
        let member = self
            .http
            .get_member(gid, self.bot_id)
            .await
            .map_err(|e| e.to_string())?;
        let perms = guild.user_permissions_in(&channel, &member);
        Ok(ChannelPermissions {
            read_messages: perms.contains(Permissions::VIEW_CHANNEL),
            send_messages: perms.contains(Permissions::SEND_MESSAGES),
            read_history: perms.contains(Permissions::READ_MESSAGE_HISTORY),
        })
    }
}
