//! Console rendering for the credential report.
//!
//! Pure string builders, one per section of the printed report, so the exact
//! wording can be unit-tested. Sections carry their own leading blank line;
//! callers print them with `println!`.

use crate::probe::{ChannelPermissions, LookupOutcome, ProbeReport};

const BANNER_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(BANNER_WIDTH)
}

fn check(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn yes_no(ok: bool) -> &'static str {
    if ok {
        "✓ Yes"
    } else {
        "✗ No"
    }
}

/// Title between two 60-char rules.
pub fn banner(title: &str) -> String {
    format!("{}\n{}\n{}", rule(), title, rule())
}

/// Section 1: which of the three variables were found.
pub fn env_section(token: bool, guild_id: bool, channel_id: bool) -> String {
    let found = |ok: bool| if ok { "✓ Found" } else { "✗ Not found" };
    format!(
        "\n1. Checking if credentials are loaded from .env:\n   \
         - Token: {}\n   \
         - Guild ID: {}\n   \
         - Channel ID: {}",
        found(token),
        found(guild_id),
        found(channel_id)
    )
}

/// Printed instead of connecting when section 1 found anything missing.
pub fn missing_abort() -> String {
    "\n❌ Missing credentials. Please check your .env file.".to_string()
}

/// Section 2: login succeeded as the given bot tag.
pub fn login_section(bot_tag: &str) -> String {
    format!("\n2. Testing Discord Token:\n   ✓ Successfully logged in as: {}", bot_tag)
}

/// Section 3: guild lookup outcome.
pub fn guild_section(guild_id: &str, outcome: &LookupOutcome) -> String {
    let body = match outcome {
        LookupOutcome::Found { name } => format!("   ✓ Guild found: {}", name),
        LookupOutcome::InvalidId => "   ✗ Invalid guild ID format".to_string(),
        LookupOutcome::NotFound => {
            "   ✗ Guild not found\n   Note: Make sure the bot is a member of this guild"
                .to_string()
        }
        LookupOutcome::Failed { reason } => format!("   ✗ Error accessing guild: {}", reason),
    };
    format!("\n3. Testing Guild ID ({}):\n{}", guild_id, body)
}

/// Section 4: channel lookup outcome.
pub fn channel_section(channel_id: &str, outcome: &LookupOutcome) -> String {
    let body = match outcome {
        LookupOutcome::Found { name } => format!("   ✓ Channel found: #{}", name),
        LookupOutcome::InvalidId => "   ✗ Invalid channel ID format".to_string(),
        LookupOutcome::NotFound => {
            "   ✗ Channel not found in guild\n   \
             Note: Make sure the channel ID belongs to the specified guild"
                .to_string()
        }
        LookupOutcome::Failed { reason } => format!("   ✗ Error accessing channel: {}", reason),
    };
    format!("\n4. Testing Channel ID ({}):\n{}", channel_id, body)
}

/// Section 5: the bot's own permission flags in the channel.
pub fn permissions_section(perms: &ChannelPermissions) -> String {
    format!(
        "\n5. Channel Permissions:\n   \
         - Read Messages: {}\n   \
         - Send Messages: {}\n   \
         - Read Message History: {}",
        check(perms.read_messages),
        check(perms.send_messages),
        check(perms.read_history)
    )
}

/// Final summary block with the overall verdict.
pub fn summary(report: &ProbeReport) -> String {
    let verdict = if report.all_valid() {
        "✅ All credentials are valid and working!"
    } else {
        "⚠️  Some credentials need attention. See details above."
    };
    format!(
        "\n{}\nToken Valid: {}\nGuild Access: {}\nChannel Access: {}\n\n{}",
        banner("TEST SUMMARY"),
        yes_no(report.login_ok()),
        yes_no(report.guild_ok()),
        yes_no(report.channel_ok()),
        verdict
    )
}
