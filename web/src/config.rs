use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::{collections::HashMap, path::Path};
use tracing::debug;

/// The environment variable consulted for the OAuth client secret when the
/// config does not name a secret file.
const CLIENT_SECRET_ENV: &str = "TOURWEB_OAUTH_CLIENT_SECRET";

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct OAuthConfig {
    /// the provider's hosted login page; unauthenticated users are sent here
    pub(crate) login_url: String,
    /// the provider's token endpoint, used for code and refresh grants
    pub(crate) token_url: String,
    pub(crate) client_id: String,
    #[serde(default)]
    pub(crate) client_secret_file: String,
    #[serde(skip)]
    pub(crate) client_secret: SecretString,
    pub(crate) redirect_uri: String,
}

impl PartialEq for OAuthConfig {
    fn eq(&self, other: &Self) -> bool {
        self.login_url == other.login_url
            && self.token_url == other.token_url
            && self.client_id == other.client_id
            && self.client_secret_file == other.client_secret_file
            && self.client_secret.expose_secret() == other.client_secret.expose_secret()
            && self.redirect_uri == other.redirect_uri
    }
}

impl OAuthConfig {
    /// The resolved secret, or `None` for public clients.
    pub(crate) fn secret(&self) -> Option<String> {
        let secret = self.client_secret.expose_secret();
        (!secret.is_empty()).then(|| secret.to_string())
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct FeedConfig {
    pub(crate) url: String,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct WeatherConfig {
    pub(crate) url: String,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ListenConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
}

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
fn default_listen() -> ListenConfig {
    ListenConfig {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_HTTP_PORT,
    }
}

// This handles the case where the `listen` block is PRESENT, but a field may be missing.
fn deserialize_listen_with_default_port<'de, D>(deserializer: D) -> Result<ListenConfig, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct PartialListenConfig {
        host: Option<String>,
        port: Option<u16>,
    }

    let partial_config = PartialListenConfig::deserialize(deserializer)?;

    Ok(ListenConfig {
        host: partial_config
            .host
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: partial_config.port.unwrap_or(DEFAULT_HTTP_PORT),
    })
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    #[serde(default = "default_listen")]
    #[serde(deserialize_with = "deserialize_listen_with_default_port")]
    pub(crate) listen: ListenConfig,
    pub(crate) database: String,
    pub(crate) feed: FeedConfig,
    pub(crate) oauth: OAuthConfig,
    #[serde(default)]
    pub(crate) weather: Option<WeatherConfig>,
}

impl EnvConfig {
    /// Load the named environment from a yaml file holding a map of
    /// environment name to configuration.
    pub(crate) fn load<P: AsRef<Path>>(path: P, envname: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file '{}'", path.as_ref().display())
        })?;
        let mut configs: HashMap<String, EnvConfig> =
            serde_yaml::from_str(&contents).with_context(|| "Failed to parse config file")?;
        configs
            .remove(envname)
            .with_context(|| format!("Config file has no environment named '{envname}'"))
    }

    pub(crate) fn init(&mut self) -> Result<()> {
        if !self.oauth.client_secret_file.is_empty() {
            // 'client_secret_file' entry in environment config takes priority
            debug!(
                "Looking up OAuth client secret from file '{}'",
                self.oauth.client_secret_file
            );
            self.oauth.client_secret = std::fs::read_to_string(&self.oauth.client_secret_file)
                .with_context(|| {
                    format!(
                        "Failed to read OAuth client secret from file '{}'",
                        self.oauth.client_secret_file
                    )
                })?
                .trim()
                .to_string()
                .into();
        } else if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            debug!("Looking up OAuth client secret from environment variable");
            self.oauth.client_secret = secret.into();
        }
        // a missing secret is fine; the identity provider may use a public client
        Ok(())
    }
}
