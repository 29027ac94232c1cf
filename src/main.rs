use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spotless::auth::UserDirectory;
use spotless::controller::Controller;
use spotless::domain::{AppConfig, SpotlessError};
use spotless::entities::Catalog;
use spotless::grid::DEFAULT_PAGE_SIZE;
use spotless::loader::{load_records, parse_load_spec};
use spotless::model::{Model, Status};
use spotless::ui::AdminUI;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Sign in on startup as a user (admin, john, maria, jane, cleanco) or a role
    #[arg(long)]
    user: Option<String>,

    /// Rows per table page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Replace an entity's records with a CSV, Parquet or Arrow file
    #[arg(long = "load", value_name = "ENTITY=PATH")]
    loads: Vec<String>,

    /// Where log output goes, the terminal belongs to the UI
    #[arg(long, default_value = "spotless.log")]
    log_file: PathBuf,

    /// Milliseconds to wait for input before redrawing
    #[arg(long = "event-poll-ms", default_value_t = 100)]
    event_poll_time: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli.log_file) {
        eprintln!("Error: cannot open log file {:?}: {}", cli.log_file, e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Err(e) => {
            error!("Exiting with error: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_logging(path: &Path) -> Result<(), SpotlessError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env("SPOTLESS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<(), SpotlessError> {
    info!("Starting spotless!");

    let loads = cli
        .loads
        .iter()
        .map(|spec| parse_load_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let cfg = AppConfig {
        event_poll_time: cli.event_poll_time,
        page_size: cli.page_size.max(1),
        user: cli.user,
        loads,
    };

    // Files are read before the terminal is taken over so errors stay visible.
    let mut loaded = Vec::with_capacity(cfg.loads.len());
    for (kind, path) in &cfg.loads {
        loaded.push((*kind, load_records(path)?));
    }

    let mut model = Model::init(&cfg, Catalog::mock(), UserDirectory::mock())?;
    for (kind, records) in loaded {
        model.replace_records(kind, records);
    }

    let ui = AdminUI::new(&cfg);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, &ui, &controller);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    model: &mut Model,
    ui: &AdminUI,
    controller: &Controller,
) -> Result<(), SpotlessError> {
    while model.status != Status::QUITTING {
        terminal.draw(|f| ui.draw(model, f))?;
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    info!("Bye");
    Ok(())
}
