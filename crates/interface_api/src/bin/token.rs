//! Mints a session token for local development.
//!
//! ```bash
//! TOKEN=$(cargo run -q --bin conversations-token)
//! curl -H "Authorization: Bearer $TOKEN" localhost:8080/conversations
//! ```
//!
//! The secret and lifetime come from the same configuration as the server.

use anyhow::{Context, Result};
use clap::Parser;
use core_kernel::UserId;
use interface_api::{auth, config::ApiConfig};

#[derive(Debug, Parser)]
#[command(
    name = "conversations-token",
    about = "Mint a session token for the conversations server"
)]
struct Args {
    /// User UUID to put in the `sub` claim; a fresh one is generated when omitted.
    #[arg(long)]
    user: Option<String>,

    /// Token lifetime in seconds; defaults to `APP_JWT_EXPIRATION_SECS`.
    #[arg(long)]
    expires_in: Option<u64>,

    /// Print a `Cookie` header value instead of the bare token.
    #[arg(long, default_value_t = false)]
    cookie: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = ApiConfig::from_env().context("invalid configuration")?;

    let user = match args.user {
        Some(raw) => raw
            .parse::<UserId>()
            .with_context(|| format!("not a user id: {raw}"))?,
        None => UserId::new(),
    };
    let expires_in = args.expires_in.unwrap_or(config.jwt_expiration_secs);

    let token = auth::create_token(user, &config.jwt_secret, expires_in)?;

    eprintln!("user: {}", user.as_uuid());
    if args.cookie {
        println!("{}={}", auth::SESSION_COOKIE, token);
    } else {
        println!("{token}");
    }
    Ok(())
}
