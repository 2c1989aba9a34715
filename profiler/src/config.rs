//! Command-line and environment configuration
//!
//! The command line carries exactly two positional arguments. Everything else
//! is read from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::payload::DEFAULT_PAYLOAD_PATH;

/// Fire REQUEST_COUNT concurrent POST requests carrying ./request.json at
/// TARGET_URL and print the elapsed seconds.
#[derive(Parser, Debug, Clone)]
#[command(name = "profile", version)]
pub struct Cli {
    /// Number of requests to send
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub request_count: u64,

    /// URL every request is POSTed to
    pub target_url: String,
}

/// Settings taken from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Payload file path
    pub payload_path: PathBuf,
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payload_path: PathBuf::from(DEFAULT_PAYLOAD_PATH),
            log_filter: "profile=warn,profile_loadgen=warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("PROFILE_REQUEST_FILE")
            && !path.is_empty()
        {
            config.payload_path = PathBuf::from(path);
        }

        config
    }
}
