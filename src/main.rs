//! jwtgate CLI - issue and inspect bearer tokens
//!
//! Uses the same provider a service would, so tokens printed here are
//! accepted by any jwtgate interceptor configured with the same secret.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jwtgate_auth::{Identity, JwtConfig, TokenProvider};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// jwtgate - stateless bearer tokens
#[derive(Parser, Debug)]
#[command(name = "jwtgate")]
#[command(about = "jwtgate - issue and verify signed bearer tokens")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    jwt: JwtArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct JwtArgs {
    /// Base64-encoded signing secret (at least 32 bytes decoded)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, global = true)]
    secret: Option<String>,

    /// Access token validity in minutes
    #[arg(long, env = "JWT_ACCESS_TOKEN_EXPIRE", default_value = "30", global = true)]
    access_token_expire: i64,

    /// Refresh token validity in minutes
    #[arg(long, env = "JWT_REFRESH_TOKEN_EXPIRE", default_value = "10080", global = true)]
    refresh_token_expire: i64,
}

impl JwtArgs {
    fn provider(&self) -> Result<TokenProvider> {
        let secret = self
            .secret
            .clone()
            .context("A signing secret is required (--secret or JWT_SECRET)")?;

        let config = JwtConfig {
            secret,
            access_token_expire: self.access_token_expire,
            refresh_token_expire: self.refresh_token_expire,
        };
        debug!("Building token provider from {:?}", config);

        config
            .build_provider()
            .context("Invalid token configuration")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue an access/refresh token pair for a subject
    #[command(long_about = r#"
Issue an access token and a refresh token for a subject and print both
as JSON.

EXAMPLES:
  jwtgate issue --id user-42 --authority USER --authority ADMIN

ENVIRONMENT VARIABLES:
  JWT_SECRET                Base64-encoded signing secret
  JWT_ACCESS_TOKEN_EXPIRE   Access token validity (minutes)
  JWT_REFRESH_TOKEN_EXPIRE  Refresh token validity (minutes)
    "#)]
    Issue {
        /// Subject identifier
        #[arg(long)]
        id: String,

        /// Authority granted to the subject (repeatable)
        #[arg(long = "authority")]
        authorities: Vec<String>,
    },

    /// Verify a token and print the identity it carries
    Verify {
        /// Token to verify
        token: String,
    },

    /// Exchange a refresh token for a new token pair
    Refresh {
        /// Refresh token
        token: String,
    },

    /// Verify a token and print its header
    Header {
        /// Token to inspect
        token: String,
    },
}

/// Setup logging with the specified log level
fn setup_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let provider = cli.jwt.provider()?;

    match cli.command {
        Commands::Issue { id, authorities } => {
            let identity = Identity::new(id, authorities);
            let access_token = provider
                .create_access_token(&identity)
                .context("Failed to create access token")?;
            let refresh_token = provider
                .create_refresh_token(&identity)
                .context("Failed to create refresh token")?;

            info!("Issued tokens for subject '{}'", identity.id);
            println!(
                "{}",
                serde_json::to_string_pretty(&jwtgate_auth::TokenPair {
                    access_token,
                    refresh_token,
                })?
            );
        }
        Commands::Verify { token } => {
            let identity = provider
                .get_authentication(&token)
                .context("Token rejected")?;
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Commands::Refresh { token } => {
            let pair = provider.refresh(&token).context("Refresh rejected")?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Commands::Header { token } => {
            let header = provider.header(&token).context("Token rejected")?;
            println!("{}", serde_json::to_string_pretty(&header)?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    run(cli)
}
