use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use std::{fs::File, io, path::Path, path::PathBuf, process, sync::Arc, time::Duration};
#[macro_use]
extern crate log;

mod console;
mod features;
use console::Console;
use features::{InterestConfig, InterestScheduler, Ledger};

/// In-memory savings ledger with periodic interest
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Customer data with CustomerID,Name,AccountBalance columns
    #[clap(long, default_value = "Data.csv")]
    data: PathBuf,

    /// Interest credited to savings accounts on every tick, in percent
    #[clap(long, default_value = "5")]
    interest_rate: Decimal,

    /// Seconds between interest ticks
    #[clap(long, default_value = "10")]
    interest_period_secs: u64,

    /// Write a JSON snapshot of every account here on exit
    #[clap(long)]
    export: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Args::parse()) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.interest_rate.is_sign_negative() {
        anyhow::bail!("Interest rate must not be negative, got {}", args.interest_rate);
    }

    let ledger = load_ledger(&args.data).unwrap_or_else(|e| {
        error!("{e:#}");
        Ledger::default()
    });
    if ledger.is_empty() {
        println!("No customers loaded. Exiting.");
        anyhow::bail!("No customers loaded from {}", args.data.display());
    }
    info!("Loaded {} accounts from {}", ledger.len(), args.data.display());

    let ledger = Arc::new(ledger);
    let config = InterestConfig {
        rate_percent: args.interest_rate,
        period: Duration::from_secs(args.interest_period_secs),
    };
    let scheduler = InterestScheduler::spawn(config, Arc::clone(&ledger))
        .context("Unable to start interest scheduler")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(stdin.lock(), stdout.lock()).run(&ledger)?;

    scheduler.stop();

    if let Some(path) = args.export {
        export(&ledger, &path)?;
    }

    Ok(())
}

fn load_ledger(path: &Path) -> anyhow::Result<Ledger> {
    let file = File::open(path)
        .with_context(|| format!("Unable to open customer data {}", path.display()))?;
    let ledger = Ledger::from_csv(file)
        .with_context(|| format!("Unable to load customer data {}", path.display()))?;
    Ok(ledger)
}

fn export(ledger: &Ledger, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, &ledger.snapshot())
        .with_context(|| format!("Unable to write snapshot to {}", path.display()))?;
    info!("Exported {} accounts to {}", ledger.len(), path.display());
    Ok(())
}
