mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marquee_api::backend::BackendClient;
use marquee_api::tmdb::TmdbClient;
use marquee_api::traits::PreferenceList;
use marquee_core::config::AppConfig;
use marquee_core::error::MarqueeError;
use marquee_core::notice::NoticeKind;
use marquee_core::view::LoadState;
use marquee_runtime::{DetailSession, ToggleError};

const DEFAULT_FILTER: &str = "marquee=info,marquee_api=info,marquee_runtime=info";

#[derive(Parser)]
#[command(name = "marquee", about = "Movie details with your favorites and watch-later list")]
struct Cli {
    /// Config file to use instead of the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a movie's details.
    Show { id: u64 },
    /// Add a movie to favorites, or remove it with --off.
    Favorite {
        id: u64,
        #[arg(long)]
        off: bool,
    },
    /// Add a movie to watch later, or remove it with --off.
    WatchLater {
        id: u64,
        #[arg(long)]
        off: bool,
    },
    /// Flip the favorite flag.
    ToggleFavorite { id: u64 },
    /// Flip the watch-later flag.
    ToggleWatchLater { id: u64 },
}

impl Command {
    fn movie_id(&self) -> u64 {
        match self {
            Self::Show { id }
            | Self::Favorite { id, .. }
            | Self::WatchLater { id, .. }
            | Self::ToggleFavorite { id }
            | Self::ToggleWatchLater { id } => *id,
        }
    }
}

type Session = DetailSession<TmdbClient, BackendClient>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(DEFAULT_FILTER.replace("info", "debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, MarqueeError> {
    match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_api_key_override(std::env::var(marquee_core::config::API_KEY_ENV).ok());
            config.validate()?;
            Ok(config)
        }
        None => AppConfig::load(),
    }
}

async fn run(cli: Cli) -> Result<ExitCode, MarqueeError> {
    let config = load_config(cli.config.as_ref())?;
    tracing::debug!(path = ?cli.config, region = %config.display.region, "Config loaded");

    let provider = TmdbClient::with_base_url(config.api_key(), &config.provider.base_url)
        .with_language(&config.provider.language);
    let backend = BackendClient::new(&config.backend.base_url, config.session_cookie());
    let session: Session = DetailSession::new(provider, backend);
    let mut notices = session.subscribe_notices();

    let movie_id = cli.command.movie_id();
    session.navigate(movie_id).await;

    let outcome = match cli.command {
        Command::Show { .. } => Ok(()),
        Command::Favorite { off, .. } => set_flag(&session, PreferenceList::Favorite, !off).await,
        Command::WatchLater { off, .. } => {
            set_flag(&session, PreferenceList::WatchLater, !off).await
        }
        Command::ToggleFavorite { .. } => session
            .toggles()
            .toggle(PreferenceList::Favorite)
            .await
            .map(|_| ()),
        Command::ToggleWatchLater { .. } => session
            .toggles()
            .toggle(PreferenceList::WatchLater)
            .await
            .map(|_| ()),
    };

    let view = session.view();
    print!("{}", render::detail(&view, &config));

    while let Ok(notice) = notices.try_recv() {
        match notice.kind {
            NoticeKind::Success => println!("✓ {}", notice.message),
            NoticeKind::Info => println!("· {}", notice.message),
            NoticeKind::Error => eprintln!("✗ {}", notice.message),
        }
    }

    if let Err(e) = &outcome {
        tracing::debug!(error = %e, "Command did not complete");
    }

    let failed = outcome.is_err() || view.load_state == LoadState::Failed;
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Set `list` to `enable` for the loaded movie.
async fn set_flag(session: &Session, list: PreferenceList, enable: bool) -> Result<(), ToggleError> {
    let view = session.view();
    let toggles = session.toggles();
    if enable {
        let entry = view.preference_entry().ok_or(ToggleError::NoRecord)?;
        match list {
            PreferenceList::Favorite => toggles.enable_favorite(entry).await,
            PreferenceList::WatchLater => toggles.enable_watch_later(entry).await,
        }
    } else {
        let movie_id = view.media_id.ok_or(ToggleError::NoRecord)?;
        match list {
            PreferenceList::Favorite => toggles.disable_favorite(movie_id).await,
            PreferenceList::WatchLater => toggles.disable_watch_later(movie_id).await,
        }
    }
}
