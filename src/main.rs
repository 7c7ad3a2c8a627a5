//! Main entry point for the sigshim CLI

use clap::Parser;
use sigshim::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    let (invocation, options) = args.command.into_parts();
    cli::run(invocation, options).await
}
