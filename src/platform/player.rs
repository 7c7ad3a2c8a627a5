//! Player script loading

use crate::error::ShimError;
use crate::utils::url::{extract_player_id, resolve_player_location, PlayerLocation};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info};

/// Default user agent used when fetching player scripts
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP settings for player fetches
#[derive(Debug, Clone)]
pub struct PlayerClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: Option<String>,
}

impl Default for PlayerClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// A loaded player script
#[derive(Debug, Clone)]
pub struct PlayerScript {
    /// Player URL as given by the caller
    pub url: String,
    /// Player id parsed from the URL, when it has one
    pub player_id: Option<String>,
    /// JavaScript source
    pub source: String,
}

impl PlayerScript {
    /// Wrap already available player source
    pub fn from_source(url: impl Into<String>, source: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            player_id: extract_player_id(&url),
            url,
            source: source.into(),
        }
    }

    /// Short label for diagnostics
    pub fn label(&self) -> &str {
        self.player_id.as_deref().unwrap_or(&self.url)
    }
}

/// Fetches player scripts from the network or the filesystem
pub struct PlayerLoader {
    http_client: Client,
}

impl PlayerLoader {
    /// Create a loader with default HTTP settings
    pub fn new() -> Result<Self, ShimError> {
        Self::with_config(&PlayerClientConfig::default())
    }

    /// Create a loader with custom HTTP settings
    pub fn with_config(config: &PlayerClientConfig) -> Result<Self, ShimError> {
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { http_client })
    }

    /// Load the player script behind `player_url`
    pub async fn load(&self, player_url: &str) -> Result<PlayerScript, ShimError> {
        let source = match resolve_player_location(player_url)? {
            PlayerLocation::Remote(url) => {
                debug!("Fetching player script from {}", url);
                self.http_client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
            PlayerLocation::Local(path) => {
                debug!("Reading player script from {}", path.display());
                tokio::fs::read_to_string(&path).await?
            }
        };

        let player = PlayerScript::from_source(player_url, source);
        info!(
            "Loaded player {} ({} chars)",
            player.label(),
            player.source.len()
        );
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PLAYER_PATH: &str = "/s/player/af7f576f/player_ias.vflset/en_US/base.js";

    #[test]
    fn test_player_script_label() {
        let player = PlayerScript::from_source(
            "https://www.youtube.com/s/player/af7f576f/player_ias.vflset/en_US/base.js",
            "var a=1;",
        );
        assert_eq!(player.player_id.as_deref(), Some("af7f576f"));
        assert_eq!(player.label(), "af7f576f");

        let local = PlayerScript::from_source("base.js", "var a=1;");
        assert_eq!(local.player_id, None);
        assert_eq!(local.label(), "base.js");
    }

    #[test]
    fn test_default_config() {
        let config = PlayerClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, None);
    }

    #[tokio::test]
    async fn test_load_remote_player() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PLAYER_PATH)
            .match_header("user-agent", "sigshim-test")
            .with_status(200)
            .with_body("var _yt_player={};")
            .create_async()
            .await;

        let loader = PlayerLoader::with_config(&PlayerClientConfig {
            user_agent: Some("sigshim-test".to_string()),
            ..Default::default()
        })
        .unwrap();
        let url = format!("{}{}", server.url(), PLAYER_PATH);
        let player = loader.load(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(player.source, "var _yt_player={};");
        assert_eq!(player.player_id.as_deref(), Some("af7f576f"));
    }

    #[tokio::test]
    async fn test_load_remote_player_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", PLAYER_PATH)
            .with_status(404)
            .create_async()
            .await;

        let loader = PlayerLoader::new().unwrap();
        let url = format!("{}{}", server.url(), PLAYER_PATH);
        let err = loader.load(&url).await.unwrap_err();
        assert!(matches!(err, ShimError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_load_local_player() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "var Kx=function(a){{return a}};").unwrap();

        let loader = PlayerLoader::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let player = loader.load(&path).await.unwrap();
        assert_eq!(player.source, "var Kx=function(a){return a};");
        assert_eq!(player.url, path);
    }

    #[tokio::test]
    async fn test_load_missing_local_player() {
        let loader = PlayerLoader::new().unwrap();
        let err = loader
            .load("/nonexistent/sigshim/base.js")
            .await
            .unwrap_err();
        assert!(matches!(err, ShimError::Io(_)));
    }
}
