//! Mock Discord session for testing the check pipeline without a gateway.
//!
//! Built up with `with_*` methods to describe a scenario; records how often
//! each lookup was called so tests can assert that skipped steps really make
//! zero session calls.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::session::{ChannelInfo, ChannelPermissions, DiscordSession, GuildInfo};

pub struct MockDiscordSession {
    bot_tag: String,
    guilds: Vec<GuildInfo>,
    /// (owning guild id, channel)
    channels: Vec<(NonZeroU64, ChannelInfo)>,
    permissions: Result<ChannelPermissions, String>,
    /// When set, every lookup fails with this reason.
    failure: Option<String>,
    guild_calls: AtomicUsize,
    channel_calls: AtomicUsize,
    permission_calls: AtomicUsize,
}

fn id(n: u64) -> NonZeroU64 {
    NonZeroU64::new(n).expect("mock ids must be non-zero")
}

impl MockDiscordSession {
    pub fn new(bot_tag: &str) -> Self {
        Self {
            bot_tag: bot_tag.to_string(),
            guilds: Vec::new(),
            channels: Vec::new(),
            permissions: Ok(ChannelPermissions {
                read_messages: true,
                send_messages: true,
                read_history: true,
            }),
            failure: None,
            guild_calls: AtomicUsize::new(0),
            channel_calls: AtomicUsize::new(0),
            permission_calls: AtomicUsize::new(0),
        }
    }

    /// Add a guild the session is a member of.
    pub fn with_guild(mut self, guild_id: u64, name: &str) -> Self {
        self.guilds.push(GuildInfo { id: id(guild_id), name: name.to_string() });
        self
    }

    /// Add a channel under the given guild.
    pub fn with_channel(mut self, guild_id: u64, channel_id: u64, name: &str) -> Self {
        self.channels
            .push((id(guild_id), ChannelInfo { id: id(channel_id), name: name.to_string() }));
        self
    }

    pub fn with_permissions(mut self, read: bool, send: bool, history: bool) -> Self {
        self.permissions = Ok(ChannelPermissions {
            read_messages: read,
            send_messages: send,
            read_history: history,
        });
        self
    }

    /// Make the permission read fail while lookups still succeed.
    pub fn with_failing_permissions(mut self, reason: &str) -> Self {
        self.permissions = Err(reason.to_string());
        self
    }

    /// Make every lookup fail (simulated transport/API error).
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    pub fn guild_calls(&self) -> usize {
        self.guild_calls.load(Ordering::Relaxed)
    }

    pub fn channel_calls(&self) -> usize {
        self.channel_calls.load(Ordering::Relaxed)
    }

    pub fn permission_calls(&self) -> usize {
        self.permission_calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl DiscordSession for MockDiscordSession {
    fn bot_tag(&self) -> String {
        self.bot_tag.clone()
    }

    async fn get_guild(&self, guild_id: NonZeroU64) -> Result<Option<GuildInfo>, String> {
        self.guild_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(reason) = &self.failure {
            return Err(reason.clone());
        }
        Ok(self.guilds.iter().find(|g| g.id == guild_id).cloned())
    }

    async fn get_guild_channel(
        &self,
        guild_id: NonZeroU64,
        channel_id: NonZeroU64,
    ) -> Result<Option<ChannelInfo>, String> {
        self.channel_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(reason) = &self.failure {
            return Err(reason.clone());
        }
        Ok(self
            .channels
            .iter()
            .find(|(owner, c)| *owner == guild_id && c.id == channel_id)
            .map(|(_, c)| c.clone()))
    }

    async fn get_own_permissions(
        &self,
        _guild_id: NonZeroU64,
        _channel_id: NonZeroU64,
    ) -> Result<ChannelPermissions, String> {
        self.permission_calls.fetch_add(1, Ordering::Relaxed);
        self.permissions.clone()
    }
}
