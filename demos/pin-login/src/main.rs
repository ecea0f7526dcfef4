//! PIN Login Demo
//!
//! Walks through out-of-band authorization from a terminal:
//! 1. First run prints an authorization URL and exits
//! 2. Open it, approve the app, and note the PIN
//! 3. Run again with `--pin <PIN>` to finish
//! 4. Later runs reuse the stored access token
//!
//! Run with:
//!   TWITTER_API_KEY=... TWITTER_API_KEY_SECRET=... cargo run -p twitter-pin-login
//!   cargo run -p twitter-pin-login -- --pin 1234567

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use twitter_oob_auth::{
    AuthConfig, AuthError, AuthPhase, Authenticator, CredentialStore, InitOutcome,
};

/// Out-of-band (PIN) Twitter authorization
#[derive(Parser, Debug)]
#[command(name = "twitter-pin-login")]
#[command(about = "Authorize a Twitter account with the PIN flow and keep the tokens on disk")]
struct Args {
    /// Application API key
    #[arg(long, env = "TWITTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Application API key secret
    #[arg(long, env = "TWITTER_API_KEY_SECRET", hide_env_values = true)]
    api_key_secret: Option<String>,

    /// PIN shown after approving the application
    #[arg(long, env = "TWITTER_PIN")]
    pin: Option<String>,

    /// State file
    #[arg(long, env = "TWITTER_STATE_PATH", default_value = twitter_oob_auth::auth::DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Start or resume authorization (default)
    Login,
    /// Show the stored authorization phase
    Status,
    /// Delete the stored authorization
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("twitter_oob_auth=info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Some(Command::Status) => status(&args.state),
        Some(Command::Reset) => reset(&args.state),
        Some(Command::Login) | None => login(args).await,
    }
}

async fn login(args: Args) -> anyhow::Result<()> {
    let builder = AuthConfig::builder()
        .api_key(args.api_key.unwrap_or_default())
        .api_key_secret(args.api_key_secret.unwrap_or_default())
        .state_path(args.state);
    let config = match args.pin {
        Some(pin) => builder.verifier(pin).build(),
        None => builder.build(),
    };

    let mut auth = Authenticator::new(config).context("invalid configuration")?;

    match auth.initialize().await {
        Ok(InitOutcome::NeedsAuthorization(url)) => {
            println!("To authorize this application:");
            println!("  1. Open {url}");
            println!("  2. Sign in and approve access");
            println!("  3. Run again with --pin <PIN>");
        }
        Ok(InitOutcome::Ready(session)) => {
            println!("✓ Authenticated as {}", session.principal_label());
            auth.save_state().context("could not save authorization state")?;
            println!("  State: {}", auth.store().path().display());
        }
        Err(AuthError::MissingVerifier) => {
            println!("Authorization is pending. Run again with --pin <PIN>,");
            println!("or `reset` to request a new authorization URL.");
        }
        Err(e @ AuthError::Verification(_)) => {
            eprintln!("{e}");
            eprintln!("Run `twitter-pin-login reset` and authorize again.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn status(path: &std::path::Path) -> anyhow::Result<()> {
    let store = CredentialStore::new(path);
    let state = store.load()?;

    let description = match state.phase() {
        AuthPhase::Empty => "Not authorized",
        AuthPhase::PendingVerification => "Waiting for PIN",
        AuthPhase::Finalized => "Authorized",
    };
    println!("Status: {description}");
    println!("State file: {}", store.path().display());
    Ok(())
}

fn reset(path: &std::path::Path) -> anyhow::Result<()> {
    CredentialStore::new(path).delete()?;
    println!("✓ Authorization state removed");
    Ok(())
}
