//! # CLI Module
//!
//! User-facing commands of the `sporlapi` binary. Each command drives one
//! endpoint wrapper of [`crate::spotify::Client`], prints the result as a
//! table and, where the result is paged, walks further pages on request.
//!
//! ```text
//! main.rs (clap, Ctrl-C → CancellationToken)
//!     ↓
//! CLI commands (tables, spinner, status macros)
//!     ↓
//! spotify::Client (executor, retry, page walker)
//! ```
//!
//! ## Error presentation
//!
//! Failures end the process through the [`error!`](crate::error) macro with
//! exit code 1. A cancelled call exits with 130, the conventional code for
//! an interrupt. A rate-limit failure also tells the user when the service
//! will accept requests again.
//!
//! ## Usage
//!
//! ```bash
//! sporlapi search "tove lo" --type artist
//! sporlapi following --limit 50 --pages 3
//! sporlapi albums 4NHQUGzhtTLFvgF5SZesLK --pages 2
//! sporlapi playlist create my-user "Weekly Picks" --description "new stuff"
//! sporlapi playlist add 3cEYpjA9oz9GiPac4AsH4n spotify:track:4iV5W9uYEdYUVa79Axb7Rh
//! sporlapi --auto-retry transfer 74ASZWbe4lXaubB36ztrGX --play
//! ```

use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::{
    error,
    spotify::{Client, Error, Pageable},
    warning,
};

mod artists;
mod player;
mod playlist;
mod search;

pub use artists::{albums, following};
pub use player::transfer;
pub use playlist::{add_tracks, create_playlist};
pub use search::search;

const EXIT_CANCELLED: i32 = 130;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Prints the current page with `show`, then up to `pages - 1` further ones.
async fn walk<P, F>(
    client: &Client,
    cancel: &CancellationToken,
    page: &mut P,
    pages: u32,
    mut show: F,
) -> Result<(), Error>
where
    P: Pageable,
    F: FnMut(&mut P),
{
    show(page);

    for _ in 1..pages {
        if !page.has_next() {
            break;
        }
        let pb = spinner("Fetching next page...");
        let fetched = client.next_page(cancel, page).await;
        pb.finish_and_clear();
        fetched?;
        show(page);
    }

    Ok(())
}

fn fail(context: &str, err: Error) -> ! {
    match &err {
        Error::Cancelled => {
            warning!("{}: cancelled", context);
            std::process::exit(EXIT_CANCELLED);
        }
        Error::Service(e) if e.status() == StatusCode::TOO_MANY_REQUESTS => {
            if let Some(at) = e.retry_after() {
                warning!(
                    "Rate limited until {}. Consider --auto-retry.",
                    at.with_timezone(&Local).format("%H:%M:%S")
                );
            }
            error!("{}. Err: {}", context, err)
        }
        _ => error!("{}. Err: {}", context, err),
    }
}
