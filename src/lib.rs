//! Spotify Web API client core with a small CLI on top.
//!
//! The heart of the crate is [`spotify::Client`]: a request executor that
//! applies Spotify's success contract, waits out rate limiting when asked to,
//! decodes error bodies into [`spotify::ServiceError`] and walks paged
//! results in place. A handful of endpoint wrappers and the `sporlapi` binary
//! sit on top of it.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `logging` - Diagnostic subscriber setup
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```no_run
//! use sporlapi::{config, spotify::{Client, Pageable}, types::{Artist, SearchType}};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     config::load_env().await?;
//!     let transport = config::authorized_transport(&config::access_token()?)?;
//!     let client = Client::new(transport, config::ClientConfig::from_env()?);
//!
//!     let cancel = CancellationToken::new();
//!     let mut page = client
//!         .search::<Artist>(&cancel, "tove lo", SearchType::Artist, 10)
//!         .await?;
//!     while page.has_next() {
//!         client.next_page(&cancel, &mut page).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod spotify;
pub mod types;

/// Prints a status line with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// ```ignore
/// info!("You follow {} artists", page.total);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
///
/// ```ignore
/// success!("Created playlist {}", playlist.name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line with a red exclamation mark and exits with code 1.
///
/// Only for failures the CLI cannot recover from; the library itself never
/// exits and returns [`spotify::Error`] instead.
///
/// ```ignore
/// error!("Failed to create playlist. Err: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
