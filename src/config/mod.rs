//! Credential loading for the probe.
//!
//! Three values are read from the process environment, optionally populated
//! beforehand from a `.env` file (auto-detected in the working directory) or
//! an explicit `--env-file` path. Ids stay as strings here; they are parsed
//! inside the check pipeline so a malformed id fails that one check instead
//! of the whole run. The token is never logged or printed.

use std::fmt;
use std::path::Path;

use anyhow::Context;

/// Environment variable holding the bot token.
pub const ENV_TOKEN: &str = "DISCORD_TOKEN";
/// Environment variable holding the guild (server) id.
pub const ENV_GUILD_ID: &str = "DISCORD_GUILD_ID";
/// Environment variable holding the channel id.
pub const ENV_CHANNEL_ID: &str = "DISCORD_CHANNEL_ID";

/// The three credential values, trimmed, all guaranteed non-empty.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub guild_id: String,
    pub channel_id: String,
}

// Token is redacted: only its length is shown.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &format!("<{} chars>", self.token.chars().count()))
            .field("guild_id", &self.guild_id)
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl Credentials {
    /// Read the three variables through `lookup`. Empty or whitespace-only
    /// values count as missing. On failure returns the variable names that
    /// were missing, in declaration order.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Vec<&'static str>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| -> String {
            let value = lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();
            if value.is_empty() {
                missing.push(name);
            }
            value
        };

        let token = get(ENV_TOKEN);
        let guild_id = get(ENV_GUILD_ID);
        let channel_id = get(ENV_CHANNEL_ID);

        if missing.is_empty() {
            Ok(Self { token, guild_id, channel_id })
        } else {
            Err(missing)
        }
    }

    /// Read the three variables from the process environment.
    pub fn from_env() -> Result<Self, Vec<&'static str>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Populate the process environment from a `.env` file.
///
/// With an explicit path the file must be readable; without one, a `.env` in
/// the working directory is loaded when present and silently skipped when
/// not. Variables already set in the environment win (dotenv semantics).
pub fn load_env_file(explicit: Option<&Path>) -> anyhow::Result<()> {
    match explicit {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("reading env file {}", path.display()))?;
            tracing::debug!("Loaded env file {}", path.display());
        }
        None => match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded {}", path.display()),
            Err(e) if e.not_found() => tracing::debug!("No .env file found, using process env"),
            Err(e) => return Err(e).context("reading .env"),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn all_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_TOKEN, " T "),
            (ENV_GUILD_ID, "111"),
            (ENV_CHANNEL_ID, "222"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "T"); // trimmed
        assert_eq!(creds.guild_id, "111");
        assert_eq!(creds.channel_id, "222");
    }

    #[test]
    fn every_missing_subset_is_reported_exactly() {
        let all = [ENV_TOKEN, ENV_GUILD_ID, ENV_CHANNEL_ID];
        for mask in 0u8..7 {
            let present: Vec<(&str, &str)> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, name)| (*name, "x"))
                .collect();
            let expected_missing: Vec<&str> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) == 0)
                .map(|(_, name)| *name)
                .collect();
            let err = Credentials::from_lookup(lookup_from(&present)).unwrap_err();
            assert_eq!(err, expected_missing, "mask {:#05b}", mask);
        }
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (ENV_TOKEN, "   "),
            (ENV_GUILD_ID, "111"),
            (ENV_CHANNEL_ID, "222"),
        ]))
        .unwrap_err();
        assert_eq!(err, vec![ENV_TOKEN]);
    }

    #[test]
    fn debug_never_reveals_token() {
        let creds = Credentials {
            token: "super-secret-token".to_string(),
            guild_id: "111".to_string(),
            channel_id: "222".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("18 chars"));
    }
}
