//! extract_signature_timestamp <player_url> <video_id>

use clap::Parser;
use sigshim::cli::{self, SignatureTimestampArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = SignatureTimestampArgs::parse();
    cli::run(args.invocation(), args.options).await
}
