//! Command line argument parsing

use crate::core::{Invocation, Operation, ShimConfig, DEFAULT_VIDEO_ID};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// Flags shared by every entry point
#[derive(Args, Debug, Clone)]
pub struct CommonOptions {
    /// HTTP timeout for fetching the player (e.g., 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Video id used when none is given
    #[arg(long, value_name = "VIDEO_ID", default_value = DEFAULT_VIDEO_ID)]
    pub default_video_id: String,

    /// Verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            timeout: humantime::Duration::from(Duration::from_secs(30)),
            user_agent: None,
            default_video_id: DEFAULT_VIDEO_ID.to_string(),
            verbose: false,
        }
    }
}

impl CommonOptions {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Build the shim configuration
    pub fn shim_config(&self) -> ShimConfig {
        let config = ShimConfig::default()
            .with_fallback_video_id(self.default_video_id.clone())
            .with_timeout(self.timeout_duration());

        match &self.user_agent {
            Some(user_agent) => config.with_user_agent(user_agent.clone()),
            None => config,
        }
    }
}

/// Decrypt an n-parameter token with a player script
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct DecodeNsigArgs {
    /// Player script URL or path
    pub player_url: String,

    /// n-parameter token to decrypt
    #[arg(allow_hyphen_values = true)]
    pub signature: String,

    /// Video id (defaults to a fixed fallback)
    #[arg(allow_hyphen_values = true)]
    pub video_id: Option<String>,

    #[command(flatten)]
    pub options: CommonOptions,
}

impl DecodeNsigArgs {
    /// Convert into an invocation
    pub fn invocation(&self) -> Invocation {
        Invocation::new(
            self.player_url.clone(),
            Operation::DecryptNsig {
                signature: self.signature.clone(),
            },
        )
        .with_video_id(self.video_id.clone())
    }
}

/// Decrypt an `s` signature with a player script
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct DecodeSigArgs {
    /// Player script URL or path
    pub player_url: String,

    /// Signature to decrypt
    #[arg(allow_hyphen_values = true)]
    pub signature: String,

    /// Video id (defaults to a fixed fallback)
    #[arg(allow_hyphen_values = true)]
    pub video_id: Option<String>,

    #[command(flatten)]
    pub options: CommonOptions,
}

impl DecodeSigArgs {
    /// Convert into an invocation
    pub fn invocation(&self) -> Invocation {
        Invocation::new(
            self.player_url.clone(),
            Operation::DecryptSignature {
                signature: self.signature.clone(),
            },
        )
        .with_video_id(self.video_id.clone())
    }
}

/// Print the signature timestamp of a player script
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct SignatureTimestampArgs {
    /// Player script URL or path
    pub player_url: String,

    /// Video id
    #[arg(allow_hyphen_values = true)]
    pub video_id: String,

    #[command(flatten)]
    pub options: CommonOptions,
}

impl SignatureTimestampArgs {
    /// Convert into an invocation
    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.player_url.clone(), Operation::SignatureTimestamp)
            .with_video_id(Some(self.video_id.clone()))
    }
}

/// Decode video player signature tokens
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decrypt an n-parameter token
    Nsig(DecodeNsigArgs),
    /// Decrypt an `s` signature
    Sig(DecodeSigArgs),
    /// Print the player's signature timestamp
    Timestamp(SignatureTimestampArgs),
}

impl Command {
    /// Invocation and options for the selected operation
    pub fn into_parts(self) -> (Invocation, CommonOptions) {
        match self {
            Command::Nsig(args) => (args.invocation(), args.options),
            Command::Sig(args) => (args.invocation(), args.options),
            Command::Timestamp(args) => (args.invocation(), args.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = "https://www.youtube.com/s/player/af7f576f/player_ias.vflset/en_US/base.js";

    #[test]
    fn test_decode_nsig_args() {
        let args = DecodeNsigArgs::try_parse_from(["decode_nsig", PLAYER, "W78n255zM6g"]).unwrap();
        assert_eq!(args.video_id, None);
        assert_eq!(
            args.invocation(),
            Invocation::new(
                PLAYER,
                Operation::DecryptNsig {
                    signature: "W78n255zM6g".to_string()
                }
            )
        );

        let args =
            DecodeNsigArgs::try_parse_from(["decode_nsig", PLAYER, "W78n255zM6g", "abcdefghijk"])
                .unwrap();
        assert_eq!(args.invocation().video_id.as_deref(), Some("abcdefghijk"));
    }

    #[test]
    fn test_decode_nsig_requires_signature() {
        assert!(DecodeNsigArgs::try_parse_from(["decode_nsig", PLAYER]).is_err());
        assert!(DecodeNsigArgs::try_parse_from(["decode_nsig"]).is_err());
        assert!(DecodeNsigArgs::try_parse_from(["decode_nsig", PLAYER, "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_hyphen_leading_values() {
        let args =
            DecodeNsigArgs::try_parse_from(["decode_nsig", PLAYER, "-Xk3_n9aQ", "-wtIMTCHWuI"])
                .unwrap();
        assert_eq!(args.signature, "-Xk3_n9aQ");
        assert_eq!(args.video_id.as_deref(), Some("-wtIMTCHWuI"));

        let args =
            DecodeSigArgs::try_parse_from(["decode_sig", "-v", PLAYER, "-ABC", "-wtIMTCHWuI"])
                .unwrap();
        assert!(args.options.verbose);
        assert_eq!(args.signature, "-ABC");
        assert_eq!(args.video_id.as_deref(), Some("-wtIMTCHWuI"));

        let args = SignatureTimestampArgs::try_parse_from([
            "extract_signature_timestamp",
            PLAYER,
            "-wtIMTCHWuI",
        ])
        .unwrap();
        assert_eq!(args.video_id, "-wtIMTCHWuI");
    }

    #[test]
    fn test_signature_timestamp_args() {
        let args =
            SignatureTimestampArgs::try_parse_from(["extract_signature_timestamp", PLAYER, "vid"])
                .unwrap();
        let invocation = args.invocation();
        assert_eq!(invocation.operation, Operation::SignatureTimestamp);
        assert_eq!(invocation.video_id.as_deref(), Some("vid"));

        assert!(
            SignatureTimestampArgs::try_parse_from(["extract_signature_timestamp", PLAYER])
                .is_err()
        );
    }

    #[test]
    fn test_common_options() {
        let args = DecodeSigArgs::try_parse_from([
            "decode_sig",
            "--timeout",
            "5s",
            "--user-agent",
            "agent/1.0",
            "--default-video-id",
            "W78n255zM6g",
            "-v",
            PLAYER,
            "sig",
        ])
        .unwrap();
        assert!(args.options.verbose);
        assert_eq!(args.options.timeout_duration(), Duration::from_secs(5));

        let config = args.options.shim_config();
        assert_eq!(config.fallback_video_id, "W78n255zM6g");
        assert_eq!(config.user_agent.as_deref(), Some("agent/1.0"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_common_options_defaults() {
        let args = DecodeSigArgs::try_parse_from(["decode_sig", PLAYER, "sig"]).unwrap();
        assert!(!args.options.verbose);
        assert_eq!(args.options.timeout_duration(), Duration::from_secs(30));
        assert_eq!(args.options.default_video_id, DEFAULT_VIDEO_ID);
        assert_eq!(
            args.options.shim_config().fallback_video_id,
            CommonOptions::default().shim_config().fallback_video_id
        );
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::try_parse_from(["sigshim", "timestamp", PLAYER, "vid"]).unwrap();
        let (invocation, _) = cli.command.into_parts();
        assert_eq!(invocation.operation, Operation::SignatureTimestamp);

        let cli = Cli::try_parse_from(["sigshim", "nsig", PLAYER, "W78n255zM6g"]).unwrap();
        let (invocation, options) = cli.command.into_parts();
        assert_eq!(
            invocation.operation,
            Operation::DecryptNsig {
                signature: "W78n255zM6g".to_string()
            }
        );
        assert!(!options.verbose);

        assert!(Cli::try_parse_from(["sigshim", "sig", PLAYER]).is_err());
        assert!(Cli::try_parse_from(["sigshim"]).is_err());
    }
}
