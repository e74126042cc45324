use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use symtype::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigError, ConfigStore, FileConfigStore, StoreBackend},
    leaderboard::{LeaderboardService, Partition},
    logging::{self, LogSink},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{Mode, SessionConfig},
    store,
    ui::leaderboard::text_report,
};

const TICK_RATE_MS: u64 = 100;

/// typing speed test on digits and symbols
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing test on random digit-and-symbol tokens with live wpm and accuracy, a results chart and per mode leaderboards."
)]
pub struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    /// test mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// number of tokens in a words test (10, 25 or 50); implies words mode
    #[clap(short = 'w', long)]
    words: Option<u32>,

    /// length of a time test in seconds (10, 25 or 60); implies time mode
    #[clap(short = 's', long)]
    secs: Option<u32>,

    /// identity scores are saved under; without one results are not saved
    #[clap(short = 'u', long, env = "SYMTYPE_USER")]
    user: Option<String>,

    /// display name shown next to your scores
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// path of the local score database
    #[clap(long)]
    db: Option<PathBuf>,

    /// base url of a hosted leaderboard; switches to the rest backend
    #[clap(long, env = "SYMTYPE_STORE_URL")]
    store_url: Option<String>,

    /// api key for the hosted leaderboard
    #[clap(long, env = "SYMTYPE_STORE_KEY", hide_env_values = true)]
    store_key: Option<String>,

    /// do not write mode and limit changes back to the config file
    #[clap(long)]
    no_save_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// print the global and personal leaderboards and exit
    Leaderboard {
        /// mode to show; defaults to the configured mode
        #[clap(short = 'm', long, value_enum)]
        mode: Option<Mode>,

        /// limit to show; defaults to the configured limit for the mode
        #[clap(short = 'l', long)]
        limit: Option<u32>,
    },
}

impl Cli {
    /// Layers command-line overrides on top of the loaded config
    fn apply(&self, cfg: &mut Config) -> Result<(), ConfigError> {
        if let Some(words) = self.words {
            cfg.set_session(SessionConfig::new(Mode::Words, words)?);
        }
        if let Some(secs) = self.secs {
            cfg.set_session(SessionConfig::new(Mode::Time, secs)?);
        }
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }
        if let Some(user) = &self.user {
            cfg.identity = Some(user.clone());
        }
        if let Some(name) = &self.name {
            cfg.display_name = Some(name.clone());
        }
        if let Some(db) = &self.db {
            cfg.store.backend = StoreBackend::Sqlite;
            cfg.store.sqlite_path = Some(db.clone());
        }
        if let Some(url) = &self.store_url {
            cfg.store.backend = StoreBackend::Rest;
            cfg.store.rest_url = Some(url.clone());
        }
        if let Some(key) = &self.store_key {
            cfg.store.api_key = Some(key.clone());
        }
        Ok(())
    }
}

fn identity_pair(cfg: &Config) -> Option<(&str, &str)> {
    Some((cfg.identity.as_deref()?, cfg.display_name.as_deref()?))
}

fn leaderboard_partition(
    cfg: &Config,
    mode: Option<Mode>,
    limit: Option<u32>,
) -> Result<Partition, ConfigError> {
    let mode = mode.unwrap_or(cfg.mode);
    let limit = limit.unwrap_or(match mode {
        Mode::Words => cfg.word_limit,
        Mode::Time => cfg.time_limit,
    });
    Ok(SessionConfig::new(mode, limit)?.into())
}

fn print_leaderboard(
    cfg: &Config,
    mode: Option<Mode>,
    limit: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let partition = leaderboard_partition(cfg, mode, limit)?;
    let store = store::open(&cfg.store, identity_pair(cfg))?;
    let identity = cfg.identity.as_deref();
    let standings = LeaderboardService::new(store).standings(partition, identity);
    print!("{}", text_report(partition, &standings, identity));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(LogSink::File(AppDirs::log_path())) {
        // the TUI owns stderr, so only the plain subcommand may log there
        if cli.command.is_some() {
            logging::init(LogSink::Stderr)?;
            log::warn!("log file unavailable: {e}");
        } else {
            eprintln!("logging disabled: {e}");
        }
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if let Err(e) = cli.apply(&mut config) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, e).exit();
    }

    if let Some(Command::Leaderboard { mode, limit }) = &cli.command {
        return print_leaderboard(&config, *mode, *limit);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let score_store = match store::open(&config.store, identity_pair(&config)) {
        Ok(s) => Some(s),
        Err(e) => {
            log::error!("leaderboard unavailable: {e}");
            None
        }
    };
    let mut app = App::new(config, score_store);
    if !cli.no_save_config {
        app = app.with_config_store(Box::new(config_store));
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => app.handle_tick(Instant::now()),
            AppEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
            }
            AppEvent::Key(key) => {
                if app.handle_key(key, Instant::now()) == Action::Quit {
                    log::info!("quit");
                    break;
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
