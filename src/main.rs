mod catalog;
mod config;
mod flights;
mod geo;
mod presentation;
mod provider;
mod refresh;
mod web;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::flights::AltitudeBand;
use crate::presentation::{build_list, ListQuery};
use crate::refresh::RefreshOutcome;
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "skywatch")]
#[command(about = "Live and simulated aircraft tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web service and the refresh timer
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run one refresh cycle and print the flight list
    Snapshot {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Case-insensitive substring filter
        #[arg(short, long)]
        search: Option<String>,
        /// Comma separated altitude bands, e.g. high,upper
        #[arg(short, long)]
        bands: Option<String>,
    },
    /// Validate a config file and the catalog it points to
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config).await,
        Commands::Snapshot {
            config,
            search,
            bands,
        } => snapshot(config, search, bands).await,
        Commands::Validate { config } => validate(&config),
    }
}

fn load_config(path: Option<&Path>) -> Option<Config> {
    let Some(path) = path else {
        return Some(Config::default());
    };
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path.display(), e);
            None
        }
    }
}

async fn serve(config_path: Option<PathBuf>) -> ExitCode {
    let Some(config) = load_config(config_path.as_deref()) else {
        return ExitCode::FAILURE;
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn snapshot(
    config_path: Option<PathBuf>,
    search: Option<String>,
    bands: Option<String>,
) -> ExitCode {
    let Some(config) = load_config(config_path.as_deref()) else {
        return ExitCode::FAILURE;
    };

    let bands = match AltitudeBand::parse_set(bands.as_deref().unwrap_or_default()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let RefreshOutcome::Completed(snapshot) = state.refresher.refresh().await else {
        eprintln!("Refresh skipped");
        return ExitCode::FAILURE;
    };

    if let Some(notice) = snapshot.notice() {
        println!("{}", notice);
    }

    let view = build_list(&snapshot.flights, &ListQuery::new(search, bands), &state.list_options);
    if let Some(placeholder) = &view.placeholder {
        println!("{}", placeholder);
        return ExitCode::SUCCESS;
    }

    for entry in &view.entries {
        println!(
            "{:<8} {:<7} {:>10} {:>4} kts  {:<22} {} -> {}",
            entry.code,
            entry.band,
            entry.altitude,
            entry.speed_kts,
            entry.airline,
            entry.departure,
            entry.arrival
        );
    }
    println!(
        "{} of {} matching flights ({} tracked, {})",
        view.entries.len(),
        view.matched,
        view.total,
        snapshot.source
    );
    ExitCode::SUCCESS
}

fn validate(config_path: &Path) -> ExitCode {
    let Some(config) = load_config(Some(config_path)) else {
        return ExitCode::FAILURE;
    };

    let catalog = match Catalog::load(config.catalog.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Config is valid");
    println!("  provider: {:?} ({})", config.provider.kind, config.provider.endpoint);
    println!(
        "  refresh every {}",
        humantime::format_duration(config.refresh.interval)
    );
    println!(
        "  catalog: {} carriers, {} airports, {} mock routes",
        catalog.carrier_count(),
        catalog.airport_count(),
        catalog.routes().len()
    );
    ExitCode::SUCCESS
}
