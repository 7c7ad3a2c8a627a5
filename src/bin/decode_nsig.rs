//! decode_nsig <player_url> <signature> [<video_id>]

use clap::Parser;
use sigshim::cli::{self, DecodeNsigArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = DecodeNsigArgs::parse();
    cli::run(args.invocation(), args.options).await
}
