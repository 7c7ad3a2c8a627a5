//! Player URL utilities: normalization and player id extraction

use crate::error::ShimError;
use regex::Regex;
use std::path::PathBuf;
use url::Url;

/// Origin that root-relative player paths are resolved against
pub const PLATFORM_ORIGIN: &str = "https://www.youtube.com";

/// Where a player script is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerLocation {
    /// Fetched over HTTP(S)
    Remote(Url),
    /// Read from the local filesystem
    Local(PathBuf),
}

/// Resolve a player URL argument into a location
///
/// Accepts absolute `http(s)://` URLs, protocol-relative `//host/...` URLs,
/// root-relative `/s/player/...` paths, `file://` URLs and plain filesystem
/// paths.
pub fn resolve_player_location(player_url: &str) -> Result<PlayerLocation, ShimError> {
    let player_url = player_url.trim();
    if player_url.is_empty() {
        return Err(ShimError::InvalidUrl("empty player URL".to_string()));
    }

    if player_url.starts_with("//") {
        return Ok(PlayerLocation::Remote(Url::parse(&format!(
            "https:{}",
            player_url
        ))?));
    }

    if player_url.starts_with("/s/player/") {
        let origin = Url::parse(PLATFORM_ORIGIN)?;
        return Ok(PlayerLocation::Remote(origin.join(player_url)?));
    }

    match Url::parse(player_url) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Ok(PlayerLocation::Remote(parsed)),
            "file" => parsed
                .to_file_path()
                .map(PlayerLocation::Local)
                .map_err(|_| ShimError::InvalidUrl(format!("bad file URL: {}", player_url))),
            other => Err(ShimError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                other, player_url
            ))),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(PlayerLocation::Local(PathBuf::from(player_url)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Extract the eight hex digit player id from a player URL
pub fn extract_player_id(player_url: &str) -> Option<String> {
    let player_id_regex = Regex::new(r"/s/player/([0-9a-f]{8})").ok()?;
    player_id_regex
        .captures(player_url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        let location = resolve_player_location(
            "https://www.youtube.com/s/player/af7f576f/player_ias.vflset/en_US/base.js",
        )
        .unwrap();
        match location {
            PlayerLocation::Remote(url) => {
                assert_eq!(url.host_str(), Some("www.youtube.com"));
                assert_eq!(url.path(), "/s/player/af7f576f/player_ias.vflset/en_US/base.js");
            }
            other => panic!("unexpected location: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_relative_forms() {
        let root_relative =
            resolve_player_location("/s/player/af7f576f/player_ias.vflset/en_US/base.js").unwrap();
        assert_eq!(
            root_relative,
            PlayerLocation::Remote(
                Url::parse(
                    "https://www.youtube.com/s/player/af7f576f/player_ias.vflset/en_US/base.js"
                )
                .unwrap()
            )
        );

        let protocol_relative =
            resolve_player_location("//www.youtube.com/s/player/af7f576f/base.js").unwrap();
        assert_eq!(
            protocol_relative,
            PlayerLocation::Remote(
                Url::parse("https://www.youtube.com/s/player/af7f576f/base.js").unwrap()
            )
        );
    }

    #[test]
    fn test_resolve_local_paths() {
        assert_eq!(
            resolve_player_location("tests/fixtures/player_ias_fixture.js").unwrap(),
            PlayerLocation::Local(PathBuf::from("tests/fixtures/player_ias_fixture.js"))
        );

        #[cfg(unix)]
        assert_eq!(
            resolve_player_location("file:///tmp/base.js").unwrap(),
            PlayerLocation::Local(PathBuf::from("/tmp/base.js"))
        );
    }

    #[test]
    fn test_resolve_errors() {
        assert!(matches!(
            resolve_player_location("   "),
            Err(ShimError::InvalidUrl(_))
        ));
        assert!(matches!(
            resolve_player_location("ftp://example.com/base.js"),
            Err(ShimError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_extract_player_id() {
        assert_eq!(
            extract_player_id(
                "https://www.youtube.com/s/player/af7f576f/player_ias.vflset/en_US/base.js"
            ),
            Some("af7f576f".to_string())
        );
        assert_eq!(extract_player_id("/s/player/0123abcd/base.js"), Some("0123abcd".to_string()));
        assert_eq!(extract_player_id("tests/fixtures/player_ias_fixture.js"), None);
        assert_eq!(extract_player_id("/s/player/XYZ/base.js"), None);
    }
}
