//! Signature extractor: the decoding capability the shims delegate to

use crate::error::ShimError;
use crate::platform::cipher::Cipher;
use crate::platform::player::{PlayerClientConfig, PlayerLoader};
use tracing::debug;

/// Decoding operations backed by a player script
#[async_trait::async_trait]
pub trait SignatureExtractor: Send + Sync {
    /// Decrypt an n-parameter token
    async fn decrypt_nsig(
        &self,
        signature: &str,
        video_id: &str,
        player_url: &str,
    ) -> Result<String, ShimError>;

    /// Decrypt an `s` signature
    async fn decrypt_signature(
        &self,
        signature: &str,
        video_id: &str,
        player_url: &str,
    ) -> Result<String, ShimError>;

    /// Extract the signature timestamp of a player
    async fn extract_signature_timestamp(
        &self,
        video_id: &str,
        player_url: &str,
    ) -> Result<String, ShimError>;
}

/// Extractor that loads the player and evaluates its own transforms
pub struct PlayerExtractor {
    loader: PlayerLoader,
}

impl PlayerExtractor {
    /// Create an extractor with default HTTP settings
    pub fn new() -> Result<Self, ShimError> {
        Ok(Self {
            loader: PlayerLoader::new()?,
        })
    }

    /// Create an extractor with custom HTTP settings
    pub fn with_config(config: &PlayerClientConfig) -> Result<Self, ShimError> {
        Ok(Self {
            loader: PlayerLoader::with_config(config)?,
        })
    }
}

#[async_trait::async_trait]
impl SignatureExtractor for PlayerExtractor {
    async fn decrypt_nsig(
        &self,
        signature: &str,
        video_id: &str,
        player_url: &str,
    ) -> Result<String, ShimError> {
        let player = self.loader.load(player_url).await?;
        debug!("[{}] decrypting n-signature with player {}", video_id, player.label());
        Cipher::new(&player.source)?.decipher_n_parameter(signature)
    }

    async fn decrypt_signature(
        &self,
        signature: &str,
        video_id: &str,
        player_url: &str,
    ) -> Result<String, ShimError> {
        let player = self.loader.load(player_url).await?;
        debug!("[{}] decrypting signature with player {}", video_id, player.label());
        Cipher::new(&player.source)?.decipher_signature(signature)
    }

    async fn extract_signature_timestamp(
        &self,
        video_id: &str,
        player_url: &str,
    ) -> Result<String, ShimError> {
        let player = self.loader.load(player_url).await?;
        debug!("[{}] extracting signature timestamp from player {}", video_id, player.label());
        Cipher::new(&player.source)?.signature_timestamp()
    }
}
