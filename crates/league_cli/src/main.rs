//! liga CLI
//!
//! Keep a card league in a JSON file: register players, draw tables for a
//! play day, enter results and print standings.

mod config;
mod shell;

use anyhow::{Context, Result, bail};
use clap::Parser;
use league_core::{EXPORT_DELIMITER, League, LeagueConfig, LeagueStore, render_leaderboard, render_session};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{LigaConfig, config_path, create_default_config, load_config};
use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "liga", version, about = "Run a card league: table draws, play-day results, standings")]
struct Cli {
    /// League snapshot file (default: from config, else league.json)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Path to config file (default: ~/.config/liga/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file at ~/.config/liga/config.toml
    Init,
    /// Write an empty league file
    New {
        /// League name
        #[arg(long)]
        name: Option<String>,
        /// Base stake charged per player per play day
        #[arg(long)]
        stake: Option<u32>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the leaderboard
    Standings {
        /// Write the leaderboard as delimited text instead
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Column separator for --csv
        #[arg(long, default_value_t = EXPORT_DELIMITER)]
        delimiter: char,
    },
    /// Print settled play days, newest first
    History,
    /// Interactive shell over the league file
    Shell {
        /// Players per table for draws (3 or 4)
        #[arg(long)]
        group_size: Option<usize>,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_league(path: &Path) -> Result<League> {
    League::load(path).with_context(|| format!("Failed to open league file {}", path.display()))
}

fn run_new(path: &Path, config: &LigaConfig, name: Option<String>, stake: Option<u32>, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let defaults = LeagueConfig::default();
    let mut store = LeagueStore::new();
    store.set_config(
        Some(name.or_else(|| config.default_name.clone()).unwrap_or(defaults.league_name)),
        Some(stake.or(config.default_stake).unwrap_or(defaults.base_stake)),
    )?;
    store.save(path)?;

    println!("Created {} ({}, base stake {})", path.display(), store.league_name(), store.base_stake());
    Ok(())
}

fn run_standings(path: &Path, csv: Option<PathBuf>, delimiter: char) -> Result<()> {
    let league = open_league(path)?;
    match csv {
        Some(out) => {
            std::fs::write(&out, league.export_standings(delimiter))
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Standings written to {}", out.display());
        }
        None => print!("{}", render_leaderboard(&league.config().league_name, &league.leaderboard())),
    }
    Ok(())
}

fn run_history(path: &Path) -> Result<()> {
    let league = open_league(path)?;
    let total = league.store().sessions().len();
    if total == 0 {
        println!("No play days settled yet.");
    }
    for (i, session) in league.history().enumerate() {
        println!("{}", render_session(total - i, session));
    }
    Ok(())
}

fn run_shell(path: PathBuf, group_size: usize) -> Result<()> {
    let league = if path.exists() {
        open_league(&path)?
    } else {
        println!("{} not found; starting a new league", path.display());
        League::new()
    };

    let mut shell = Shell::new(league, path, group_size);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell.run(stdin.lock(), &mut stdout)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_file = match cli.config {
        Some(path) => path,
        None => config_path()?,
    };

    if let Commands::Init = cli.command {
        create_default_config(&config_file)?;
        println!("Created config at {}", config_file.display());
        return Ok(());
    }

    let config = load_config(&config_file)?;
    init_logging(config.log_level(cli.verbose));
    let path = config.league_file(cli.file);
    tracing::debug!(league = %path.display(), config = %config_file.display(), "starting");

    match cli.command {
        Commands::Init => Ok(()),
        Commands::New { name, stake, force } => run_new(&path, &config, name, stake, force),
        Commands::Standings { csv, delimiter } => run_standings(&path, csv, delimiter),
        Commands::History => run_history(&path),
        Commands::Shell { group_size } => run_shell(path, config.group_size(group_size)),
    }
}
