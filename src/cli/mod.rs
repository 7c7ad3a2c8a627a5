//! Command line runner shared by every sigshim entry point

pub mod args;
pub mod output;

pub use args::*;
pub use output::*;

use crate::core::Invocation;
use crate::error::ShimError;
use crate::platform::PlayerExtractor;
use crate::utils::quiet::silenced;
use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run one invocation and print its result
///
/// The extractor runs with stdout silenced; the result is written only after
/// stdout is restored, so a failure leaves stdout empty.
pub async fn run(invocation: Invocation, options: CommonOptions) -> anyhow::Result<()> {
    init_logging(options.verbose);
    info!("Starting sigshim: {:?}", invocation);

    let config = options.shim_config();
    let extractor = PlayerExtractor::with_config(&config.player_client_config())
        .context("failed to build HTTP client")?;

    let video_id = invocation.effective_video_id(&config).to_string();
    let result = match silenced(invocation.dispatch(&extractor, &config)).await {
        Ok(result) => result,
        Err(e) => {
            let context = failure_context(&invocation, &video_id, &e);
            return Err(anyhow::Error::new(e).context(context));
        }
    };
    debug!("Decoded value has {} chars", result.len());

    print_result(&result).context("failed to write result")?;
    Ok(())
}

/// Describe a failed invocation, separating player loading from decoding
fn failure_context(invocation: &Invocation, video_id: &str, error: &ShimError) -> String {
    if error.is_player_unavailable() {
        format!(
            "failed to {} for video {}: player {} could not be loaded",
            invocation.operation.describe(),
            video_id,
            invocation.player_url
        )
    } else {
        format!(
            "failed to {} for video {} with player {}",
            invocation.operation.describe(),
            video_id,
            invocation.player_url
        )
    }
}

/// Initialize logging system
///
/// Logs go to stderr; stdout carries nothing but the decoded value.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(verbose)
                .with_line_number(verbose)
                .compact(),
        )
        .try_init();

    // A subscriber installed earlier in the process keeps working.
    if let Err(e) = installed {
        debug!("logging already initialized: {}", e);
    }
}
