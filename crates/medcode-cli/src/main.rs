//! medcode command-line binary.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays one result per line
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Icd(args) => {
            let standardizer = commands::load_standardizer(&args.data.data_dir)?;
            commands::run_icd(&standardizer, args.icd_version, &args.codes, &mut out)?;
        }
        Command::Icd10(args) => {
            let standardizer = commands::load_standardizer(&args.data.data_dir)?;
            commands::run_icd10(&standardizer, &args.codes, &mut out)?;
        }
        Command::Atc(args) => {
            let standardizer = commands::medication_standardizer(&args.rxnav)?;
            commands::run_atc(&standardizer, args.level, &args.ndcs, &mut out)?;
        }
        Command::Rxcui(args) => {
            let standardizer = commands::medication_standardizer(&args.rxnav)?;
            commands::run_rxcui(&standardizer, &args.ndcs, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
