use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use roster_app::config::{self, DEFAULT_CONFIG_FILE};
use roster_app::logging::{self, LogDestination};
use roster_app::render::render;
use roster_app::session::Session;
use roster_core::{AppViewModel, JobStatus, Msg, SelectedFile};
use roster_logging::roster_info;

const PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// Upload a student CSV to the import backend and follow the import job.
#[derive(Debug, Parser)]
#[command(name = "roster-import", version)]
struct Cli {
    /// CSV file to upload.
    file: PathBuf,

    /// RON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Backend API base URL, overriding the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Status poll interval in milliseconds, overriding the config file.
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Where log output goes, overriding the config file.
    #[arg(long, value_enum)]
    log: Option<LogArg>,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LogArg {
    Terminal,
    File,
    Both,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
    if let Some(log) = cli.log {
        config.log_destination = match log {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        };
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log_destination, level);

    let bytes = fs::read(&cli.file).with_context(|| format!("failed to read {:?}", cli.file))?;
    let name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());

    roster_info!("Using backend {}", config.base_url);
    let mut session = Session::new(&config)?;

    for msg in [
        Msg::Started,
        Msg::FileSelected(Some(SelectedFile::new(name, bytes))),
        Msg::SubmitClicked,
    ] {
        print_view(session.dispatch(msg));
    }

    while !session.is_settled() {
        print_view(session.pump(PUMP_INTERVAL));
    }

    let view = session.view();
    session.shutdown();

    if let Some(error) = view.upload_error {
        bail!("upload failed: {error}");
    }
    if view.snapshot.status == JobStatus::Failure {
        bail!("import job finished with status {}", view.snapshot.status);
    }
    Ok(())
}

fn print_view(view: Option<AppViewModel>) {
    let Some(view) = view else {
        return;
    };
    println!();
    for line in render(&view) {
        println!("{line}");
    }
}
