//! Typed errors for validator and release operations.

use thiserror::Error;

/// Main error type for hyperswitch-ci operations.
#[derive(Error, Debug)]
pub enum CiError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Release validation errors
    #[error("{git_ref} is not a valid CalVer tag")]
    InvalidCalVerTag { git_ref: String },

    #[error(
        "{actor} is not authorized to trigger this workflow: not a member of any of [{teams}]"
    )]
    Unauthorized { actor: String, teams: String },

    #[error("Release artifact not found: {0}")]
    MissingArtifact(String),

    // Forge/Git errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Version/parsing errors
    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias using CiError
pub type Result<T> = std::result::Result<T, CiError>;

impl CiError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid CalVer tag error
    pub fn invalid_calver(git_ref: impl Into<String>) -> Self {
        Self::InvalidCalVerTag {
            git_ref: git_ref.into(),
        }
    }

    /// Create an unauthorized actor error
    pub fn unauthorized(actor: impl Into<String>, teams: &[String]) -> Self {
        Self::Unauthorized {
            actor: actor.into(),
            teams: teams.join(", "),
        }
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for CiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => Self::AuthenticationError(err.to_string()),
                429 => Self::RateLimitExceeded,
                _ => Self::NetworkError(err.to_string()),
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for CiError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(format!("invalid header value: {err}"))
    }
}

impl From<reqwest::header::InvalidHeaderName> for CiError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(format!("invalid header name: {err}"))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for CiError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
