use serde::Deserialize;

/// Default browser identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Image-Spider
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// Page fetch timing and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Lower bound of the delay before each page request (milliseconds)
    #[serde(rename = "page-delay-min-ms")]
    pub page_delay_min_ms: u64,

    /// Upper bound of the delay before each page request (milliseconds)
    #[serde(rename = "page-delay-max-ms")]
    pub page_delay_max_ms: u64,

    /// Lower bound of the backoff between retries (milliseconds)
    #[serde(rename = "retry-delay-min-ms")]
    pub retry_delay_min_ms: u64,

    /// Upper bound of the backoff between retries (milliseconds)
    #[serde(rename = "retry-delay-max-ms")]
    pub retry_delay_max_ms: u64,

    /// Total number of attempts per page, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            page_delay_min_ms: 2_000,
            page_delay_max_ms: 5_000,
            retry_delay_min_ms: 5_000,
            retry_delay_max_ms: 10_000,
            max_attempts: 3,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FetcherConfig {
    /// A configuration without any delays, used by tests and local mirrors
    pub fn without_delays() -> Self {
        Self {
            page_delay_min_ms: 0,
            page_delay_max_ms: 0,
            retry_delay_min_ms: 0,
            retry_delay_max_ms: 0,
            ..Self::default()
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept header value
    pub accept: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth; 1 visits only the start page
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Directory images are written to
    #[serde(rename = "output-dir")]
    pub output_dir: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            output_dir: "./data/".to_string(),
        }
    }
}
