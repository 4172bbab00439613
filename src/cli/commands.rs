pub(crate) use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "card-ledger",
    author,
    version,
    about = "A minimal card banking ledger",
    long_about = None,
    after_help = "STORAGE:\n    The card table is recreated on every start; accounts do not survive a restart.\n\nLOGGING:\n    Diagnostics go to stderr. Set RUST_LOG=debug for more detail."
)]
pub struct Args {
    /// Path to the SQLite database file
    #[arg(long, value_name = "FILE", default_value = "card.s3db")]
    pub database: PathBuf,

    /// Seed for card number and PIN generation (reproducible runs)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}
