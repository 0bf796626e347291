//! Configuration for the GitHub connection.
use secrecy::SecretString;

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Full repository path.
    pub path: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Base URL for commit links in release notes.
    pub commit_link_base_url: String,
    /// Log mutating calls instead of performing them.
    pub dry_run: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            path: "".to_string(),
            token: SecretString::from("".to_string()),
            commit_link_base_url: "".to_string(),
            dry_run: false,
        }
    }
}

impl RemoteConfig {
    /// REST API root for the configured host.
    pub fn api_base_uri(&self) -> String {
        if self.host == "github.com" {
            format!("{}://api.github.com", self.scheme)
        } else {
            // GitHub Enterprise Server serves the REST API under /api/v3
            format!("{}://{}/api/v3", self.scheme, self.host)
        }
    }
}
