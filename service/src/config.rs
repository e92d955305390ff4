use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

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

    /// The OAuth2 client ID issued by the identity provider
    #[arg(long, env)]
    oidc_client_id: Option<String>,

    /// The OAuth2 client secret issued by the identity provider
    #[arg(long, env)]
    oidc_client_secret: Option<String>,

    /// The redirect URI registered with the identity provider for the callback route
    #[arg(long, env)]
    oidc_redirect_uri: Option<String>,

    /// The identity provider's OIDC issuer URL. The authorization and token
    /// endpoints are resolved from its discovery document at startup.
    #[arg(long, env)]
    oidc_issuer_url: Option<String>,

    /// Explicit authorization endpoint URL, bypassing OIDC discovery when set
    /// together with --token-endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env)]
    authorization_endpoint: Option<String>,

    /// Explicit token endpoint URL, bypassing OIDC discovery when set together
    /// with --authorization-endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env)]
    token_endpoint: Option<String>,

    /// Timeout in seconds for outbound calls to the identity provider
    #[arg(long, env, default_value_t = 10)]
    pub http_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
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
        .map(|s| s.parse::<RustEnv>().unwrap()),
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

    pub fn oidc_client_id(&self) -> Option<String> {
        self.oidc_client_id.clone()
    }

    pub fn oidc_client_secret(&self) -> Option<String> {
        self.oidc_client_secret.clone()
    }

    pub fn oidc_redirect_uri(&self) -> Option<String> {
        self.oidc_redirect_uri.clone()
    }

    pub fn oidc_issuer_url(&self) -> Option<String> {
        self.oidc_issuer_url.clone()
    }

    /// Returns the explicit authorization endpoint override, if configured.
    pub fn authorization_endpoint(&self) -> Option<String> {
        self.authorization_endpoint.clone()
    }

    /// Returns the explicit token endpoint override, if configured.
    pub fn token_endpoint(&self) -> Option<String> {
        self.token_endpoint.clone()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        // This could check an environment variable, or a config field
        self.runtime_env() == RustEnv::Production
    }
}
