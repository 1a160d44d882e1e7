use std::path::PathBuf;

use chesstrain_core::auth::password::BCRYPT_COST;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chesstrain", version, about = "Chess training platform tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Check that a deployment can hash passwords, sign tokens and open a database.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// bcrypt cost used for the hashing check.
    #[arg(long, default_value_t = BCRYPT_COST)]
    pub bcrypt_cost: u32,

    /// Deployment directory to inspect for a `.env` file.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}
