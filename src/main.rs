use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use discord_doctor::config::{self, Credentials};
use discord_doctor::probe::{ProbeError, ProbeReport};
use discord_doctor::{discord, report};

#[derive(Parser, Debug)]
#[command(name = "discord_doctor")]
#[command(about = "Check Discord bot credentials (token, guild id, channel id)", long_about = None)]
struct Args {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load environment variables from this file instead of auto-detecting .env
    #[arg(long = "env-file", value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Seconds to wait for the gateway ready event
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 30)]
    timeout: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set verbosity level (0-3)
    let verbosity = if args.verbose > 3 { 3 } else { args.verbose };
    discord_doctor::init_tracing(verbosity);

    // Preflight: an explicit --env-file must be readable; a missing .env is fine.
    if let Err(e) = config::load_env_file(args.env_file.as_deref()) {
        eprintln!("❌ {:#}", e);
        return ExitCode::from(2);
    }

    println!("{}", report::banner("DISCORD CREDENTIALS TEST"));
    println!("Started: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));

    let creds = match Credentials::from_env() {
        Ok(creds) => {
            println!("{}", report::env_section(true, true, true));
            creds
        }
        Err(missing) => {
            // Abort before any connection attempt.
            println!(
                "{}",
                report::env_section(
                    !missing.contains(&config::ENV_TOKEN),
                    !missing.contains(&config::ENV_GUILD_ID),
                    !missing.contains(&config::ENV_CHANNEL_ID),
                )
            );
            println!("{}", report::missing_abort());
            return ExitCode::from(2);
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to build tokio runtime: {}", e);
            return ExitCode::from(2);
        }
    };

    println!("\nConnecting to Discord...");
    let started = Instant::now();
    let outcome =
        rt.block_on(discord::connect_and_probe(&creds, Duration::from_secs(args.timeout)));

    // Connection-level failures leave an empty report: no check passed.
    let result = match outcome {
        Ok(result) => result,
        Err(ProbeError::AuthRejected) => {
            println!("\n❌ Failed to login: Invalid Discord token");
            println!("   Please check if the token is correct and not expired");
            ProbeReport::default()
        }
        Err(ProbeError::ReadyTimeout(t)) => {
            println!("\n❌ Timed out: no ready event within {}s", t.as_secs());
            ProbeReport::default()
        }
        Err(ProbeError::Interrupted) => {
            println!("\n❌ Interrupted before the checks completed");
            ProbeReport::default()
        }
        Err(ProbeError::Connection(msg)) => {
            println!("\n❌ Unexpected error: {}", msg);
            ProbeReport::default()
        }
    };

    println!("{}", report::summary(&result));
    println!("\nElapsed: {:.1}s", started.elapsed().as_secs_f64());

    if result.all_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
