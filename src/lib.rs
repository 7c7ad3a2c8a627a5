//! # sigshim - video player signature decoding shims
//!
//! Small command-line shims that load a video player script, extract its
//! signature transforms and print the decoded token.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sigshim::{Invocation, Operation, PlayerExtractor, ShimConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ShimConfig::default();
//!     let extractor = PlayerExtractor::with_config(&config.player_client_config())?;
//!
//!     let invocation = Invocation::new(
//!         "https://www.youtube.com/s/player/af7f576f/player_ias.vflset/en_US/base.js",
//!         Operation::DecryptNsig { signature: "W78n255zM6g".to_string() },
//!     );
//!     let decoded = invocation.dispatch(&extractor, &config).await?;
//!     print!("{}", decoded);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{Invocation, Operation, ShimConfig, DEFAULT_VIDEO_ID};
pub use crate::error::ShimError;
pub use crate::platform::{Cipher, PlayerExtractor, SignatureExtractor};

/// Result type alias for sigshim operations
pub type Result<T> = std::result::Result<T, ShimError>;
