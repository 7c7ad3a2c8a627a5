//! decode_sig <player_url> <signature> [<video_id>]

use clap::Parser;
use sigshim::cli::{self, DecodeSigArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = DecodeSigArgs::parse();
    cli::run(args.invocation(), args.options).await
}
