mod commands;

use anyhow::{Context, Result};
use card_ledger::{Atm, Ledger};
use commands::{Args, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Keep stdout for the menus: default to warn (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // 1. Open the ledger (recreates the card table)
    let ledger = Ledger::open(&args.database)
        .with_context(|| format!("Failed to open ledger: {}", args.database.display()))?;

    // 2. Pick the random source for card numbers and PINs
    let rng = match args.seed {
        Some(seed) => {
            log::info!("Using fixed seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // 3. Serve the interactive menu on stdin/stdout
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut atm = Atm::new(ledger, stdin.lock(), stdout.lock(), rng);
    atm.run().context("Session failed")?;

    Ok(())
}
