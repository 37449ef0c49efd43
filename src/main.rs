use std::time::Duration;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio_util::sync::CancellationToken;

use sporlapi::{
    cli,
    config::{self, ClientConfig},
    error, logging,
    spotify::Client,
    types::SearchType,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Wait out rate limiting instead of failing
    #[clap(long, global = true)]
    auto_retry: bool,

    /// Longest single back-off to accept, in seconds
    #[clap(long, global = true)]
    max_retry_secs: Option<u64>,

    /// Preferred language for localized fields (Accept-Language)
    #[clap(long, global = true)]
    language: Option<String>,

    /// Log requests and retries to stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search the catalog
    Search(SearchOptions),

    /// List an artist's albums
    Albums(AlbumsOptions),

    /// List followed artists
    Following(PagingOptions),

    /// Create playlists and add tracks
    #[command(subcommand)]
    Playlist(PlaylistCommand),

    /// Transfer playback to another device
    Transfer(TransferOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PagingOptions {
    /// Items per page (1-50)
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,

    /// Number of pages to show
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub query: String,

    /// Kind of result to search for
    #[clap(long = "type", value_enum, default_value_t = SearchType::Track)]
    pub kind: SearchType,

    #[clap(flatten)]
    pub paging: PagingOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    /// Spotify ID of the artist
    pub artist_id: String,

    #[clap(flatten)]
    pub paging: PagingOptions,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistCommand {
    /// Create an empty playlist
    Create {
        /// Spotify user ID of the owner
        user_id: String,
        name: String,
        #[clap(long)]
        public: bool,
        #[clap(long)]
        description: Option<String>,
    },

    /// Add tracks by URI
    Add {
        playlist_id: String,
        #[clap(required = true)]
        uris: Vec<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct TransferOptions {
    pub device_id: String,

    /// Start playback on the new device
    #[clap(long)]
    pub play: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(e) => error!("Cannot set up Spotify client. Err: {}", e),
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Command::Search(opt) => {
            cli::search(
                &client,
                &cancel,
                &opt.query,
                opt.kind,
                opt.paging.limit,
                opt.paging.pages,
            )
            .await
        }
        Command::Albums(opt) => {
            cli::albums(
                &client,
                &cancel,
                &opt.artist_id,
                opt.paging.limit,
                opt.paging.pages,
            )
            .await
        }
        Command::Following(opt) => cli::following(&client, &cancel, opt.limit, opt.pages).await,
        Command::Playlist(PlaylistCommand::Create {
            user_id,
            name,
            public,
            description,
        }) => {
            cli::create_playlist(
                &client,
                &cancel,
                &user_id,
                &name,
                public,
                description.as_deref(),
            )
            .await
        }
        Command::Playlist(PlaylistCommand::Add { playlist_id, uris }) => {
            cli::add_tracks(&client, &cancel, &playlist_id, &uris).await
        }
        Command::Transfer(opt) => cli::transfer(&client, &cancel, &opt.device_id, opt.play).await,
        Command::Completions(_) => {}
    }
}

fn build_client(cli: &Cli) -> Result<Client, config::ConfigError> {
    let mut settings = ClientConfig::from_env()?;
    if cli.auto_retry {
        settings = settings.with_auto_retry(true);
    }
    if let Some(secs) = cli.max_retry_secs {
        settings = settings.with_max_retry_duration(Duration::from_secs(secs));
    }
    if let Some(language) = &cli.language {
        settings = settings.with_accept_language(language.clone());
    }

    let transport = config::authorized_transport(&config::access_token()?)?;
    Ok(Client::new(transport, settings))
}
