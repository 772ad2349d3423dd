use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rolling_anomaly::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Generate,

    Analyze {
        #[arg(long)]
        window_size: Option<usize>,

        #[arg(long)]
        threshold: Option<f64>,
    },

    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.dir).context("failed to construct mgr")?;

    match args.command {
        Command::Generate => mgr.generate_data()?,
        Command::Analyze {
            window_size,
            threshold,
        } => mgr.analyze_data(window_size, threshold)?,
        Command::Clean => mgr.clean_outputs()?,
    }

    Ok(())
}
