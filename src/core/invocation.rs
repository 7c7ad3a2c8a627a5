//! One shim invocation: what to decode, with which player

use crate::error::ShimError;
use crate::platform::extractor::SignatureExtractor;
use crate::platform::player::PlayerClientConfig;
use std::time::Duration;
use tracing::debug;

/// Video id used when the caller does not supply one
///
/// The extractor only needs a syntactically valid id; this one has been
/// stable on the platform for years.
pub const DEFAULT_VIDEO_ID: &str = "jNQXAC9IVRw";

/// Shim configuration
#[derive(Debug, Clone)]
pub struct ShimConfig {
    /// Video id substituted when the argument is omitted
    pub fallback_video_id: String,
    /// HTTP timeout for player fetches
    pub timeout: Duration,
    /// User agent for player fetches
    pub user_agent: Option<String>,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            fallback_video_id: DEFAULT_VIDEO_ID.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl ShimConfig {
    /// Set the fallback video id
    pub fn with_fallback_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.fallback_video_id = video_id.into();
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// HTTP settings for the player loader
    pub fn player_client_config(&self) -> PlayerClientConfig {
        PlayerClientConfig {
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Delegate operation to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Decrypt an n-parameter token
    DecryptNsig { signature: String },
    /// Decrypt an `s` signature
    DecryptSignature { signature: String },
    /// Extract the player's signature timestamp
    SignatureTimestamp,
}

impl Operation {
    /// Human readable description for error context
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::DecryptNsig { .. } => "decrypt n-signature",
            Operation::DecryptSignature { .. } => "decrypt signature",
            Operation::SignatureTimestamp => "extract signature timestamp",
        }
    }
}

/// Parsed shim invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Player script URL or path
    pub player_url: String,
    /// Video id, if given on the command line
    pub video_id: Option<String>,
    /// What to compute
    pub operation: Operation,
}

impl Invocation {
    /// Create an invocation without a video id
    pub fn new(player_url: impl Into<String>, operation: Operation) -> Self {
        Self {
            player_url: player_url.into(),
            video_id: None,
            operation,
        }
    }

    /// Set the video id
    pub fn with_video_id(mut self, video_id: Option<String>) -> Self {
        self.video_id = video_id;
        self
    }

    /// Video id to pass to the extractor
    pub fn effective_video_id<'a>(&'a self, config: &'a ShimConfig) -> &'a str {
        self.video_id
            .as_deref()
            .unwrap_or(&config.fallback_video_id)
    }

    /// Run the operation against `extractor`
    pub async fn dispatch(
        &self,
        extractor: &dyn SignatureExtractor,
        config: &ShimConfig,
    ) -> Result<String, ShimError> {
        let video_id = self.effective_video_id(config);
        debug!(
            "Dispatching '{}' for video {} with player {}",
            self.operation.describe(),
            video_id,
            self.player_url
        );

        match &self.operation {
            Operation::DecryptNsig { signature } => {
                extractor
                    .decrypt_nsig(signature, video_id, &self.player_url)
                    .await
            }
            Operation::DecryptSignature { signature } => {
                extractor
                    .decrypt_signature(signature, video_id, &self.player_url)
                    .await
            }
            Operation::SignatureTimestamp => {
                extractor
                    .extract_signature_timestamp(video_id, &self.player_url)
                    .await
            }
        }
    }
}
