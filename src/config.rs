use crate::constants::{env, limits, network, protocols::ALLOWED_HTTP};
use crate::errors::ConfigError;
use crate::services::logger::LogLevel;
use clap::Parser;
use url::Url;

/// Ideogram MCP server (stdio transport)
#[derive(Debug, Clone, Parser)]
#[command(name = "ideogram-mcp", version, about)]
pub struct Cli {
    /// Ideogram API key
    #[arg(long, env = env::API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Ideogram API
    #[arg(long, env = env::API_BASE, default_value = network::DEFAULT_API_BASE)]
    pub api_base: String,

    /// Largest image accepted for upload or download, in bytes
    #[arg(long, env = env::MAX_FILE_BYTES, default_value_t = limits::MAX_FILE_BYTES)]
    pub max_file_bytes: u64,

    /// Number of images fetched at the same time by download_images
    #[arg(long, env = env::DOWNLOAD_CONCURRENCY, default_value_t = limits::DOWNLOAD_CONCURRENCY)]
    pub download_concurrency: usize,

    /// error, warn, info or debug
    #[arg(long, env = env::LOG_LEVEL)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLimits {
    pub max_file_bytes: u64,
    pub download_concurrency: usize,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: limits::MAX_FILE_BYTES,
            download_concurrency: limits::DOWNLOAD_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub request: RequestConfig,
    pub limits: FileLimits,
    pub log_level: Option<LogLevel>,
}

impl ServerConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey(env::API_KEY))?;

        let base_url = normalize_base_url(&cli.api_base)?;

        if cli.max_file_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_file_bytes",
            });
        }
        if cli.download_concurrency == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "download_concurrency",
            });
        }

        Ok(Self {
            request: RequestConfig { api_key, base_url },
            limits: FileLimits {
                max_file_bytes: cli.max_file_bytes,
                download_concurrency: cli.download_concurrency,
            },
            log_level: cli.log_level.as_deref().and_then(LogLevel::parse),
        })
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_cli(Cli::parse())
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    let scheme = format!("{}:", parsed.scheme());
    if !ALLOWED_HTTP.contains(&scheme.as_str()) {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "only http/https URLs are supported".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(api_key: Option<&str>) -> Cli {
        Cli {
            api_key: api_key.map(|s| s.to_string()),
            api_base: network::DEFAULT_API_BASE.to_string(),
            max_file_bytes: limits::MAX_FILE_BYTES,
            download_concurrency: limits::DOWNLOAD_CONCURRENCY,
            log_level: None,
        }
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = ServerConfig::from_cli(cli(None)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey("IDEOGRAM_API_KEY")));
        assert_eq!(
            err.to_string(),
            "IDEOGRAM_API_KEY environment variable must be set"
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(ServerConfig::from_cli(cli(Some("   "))).is_err());
    }

    #[test]
    fn defaults_resolve_to_ideogram_v1() {
        let config = ServerConfig::from_cli(cli(Some("key-123"))).unwrap();
        assert_eq!(config.request.api_key, "key-123");
        assert_eq!(config.request.base_url, "https://api.ideogram.ai/v1");
        assert_eq!(config.limits, FileLimits::default());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let mut input = cli(Some("key"));
        input.api_base = "http://127.0.0.1:8080/v1/".to_string();
        let config = ServerConfig::from_cli(input).unwrap();
        assert_eq!(config.request.base_url, "http://127.0.0.1:8080/v1");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut input = cli(Some("key"));
        input.api_base = "ftp://example.com".to_string();
        assert!(matches!(
            ServerConfig::from_cli(input),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut input = cli(Some("key"));
        input.download_concurrency = 0;
        assert!(matches!(
            ServerConfig::from_cli(input),
            Err(ConfigError::ZeroLimit {
                name: "download_concurrency"
            })
        ));
    }

    #[test]
    fn cli_parses_flags() {
        let parsed = Cli::try_parse_from([
            "ideogram-mcp",
            "--api-key",
            "abc",
            "--download-concurrency",
            "2",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = ServerConfig::from_cli(parsed).unwrap();
        assert_eq!(config.limits.download_concurrency, 2);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
    }
}
