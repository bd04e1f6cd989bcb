use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use sse::StreamSettings;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Name reported by the homepage when `SERVICE_NAME` is not set.
pub const DEFAULT_SERVICE_NAME: &str = "mce-api";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl fmt::Display for RustEnvParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected one of: development, production, staging")
    }
}

impl std::error::Error for RustEnvParseError {}

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The service name reported by the homepage and the OpenAPI document
    #[arg(long, env, default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8000)]
    pub port: u16,

    /// Number of numbered tokens emitted by the /stream endpoint
    #[arg(long, env, default_value_t = sse::stream::DEFAULT_TOKEN_COUNT)]
    pub stream_token_count: u32,

    /// Milliseconds to wait between consecutive /stream tokens
    #[arg(long, env, default_value_t = 1000)]
    pub stream_token_interval_ms: u64,

    /// Seconds open connections are given to finish after a shutdown signal
    #[arg(long, env, default_value_t = 5)]
    pub shutdown_grace_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap_or(LevelFilter::Info)),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .try_map(|s| s.parse::<RustEnv>()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Parses an explicit argument list (first item is the binary name), still
    /// honouring environment variables. Used by tests and embedding callers.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::try_parse_from(args)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Returns the `interface:port` pair the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }

    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings::new(
            self.stream_token_count,
            Duration::from_millis(self.stream_token_interval_ms),
        )
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("mce_api").chain(args.iter().copied());
        Config::try_from_args(argv).unwrap()
    }

    #[test]
    fn rust_env_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("Staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("development".parse::<RustEnv>(), Ok(RustEnv::Development));
        assert_eq!("qa".parse::<RustEnv>(), Err(RustEnvParseError));
    }

    #[test]
    fn rust_env_displays_lowercase() {
        assert_eq!(RustEnv::Production.to_string(), "production");
        assert_eq!(RustEnv::Staging.to_string(), "staging");
        assert_eq!(RustEnv::Development.to_string(), "development");
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = parse(&[
            "--interface",
            "127.0.0.1",
            "--port",
            "9100",
            "--service-name",
            "demo",
            "--stream-token-count",
            "3",
            "--stream-token-interval-ms",
            "250",
            "--log-level-filter",
            "DEBUG",
            "--runtime-env",
            "PRODUCTION",
            "--allowed-origins",
            "http://a.test,http://b.test",
        ]);

        assert_eq!(config.bind_address(), "127.0.0.1:9100");
        assert_eq!(config.service_name(), "demo");
        assert_eq!(
            config.stream_settings(),
            StreamSettings::new(3, Duration::from_millis(250))
        );
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
        assert!(config.is_production());
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn binds_all_interfaces_by_default() {
        let config = parse(&[]);
        assert_eq!(config.interface(), "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let argv = ["mce_api", "--log-level-filter", "LOUD"];
        assert!(Config::try_from_args(argv).is_err());
    }

    #[test]
    fn rejects_unknown_runtime_env() {
        let argv = ["mce_api", "--runtime-env", "qa"];
        assert!(Config::try_from_args(argv).is_err());
    }
}
