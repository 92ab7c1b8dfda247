//! Service configuration
//!
//! Values come from `CREATOR_`-prefixed environment variables, e.g.
//! `CREATOR_JWT_SECRET` or `CREATOR_PROXY_ALLOWED_DOMAINS=a.com,b.com`.
//! Database settings are read separately by `common::database`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HS256 secret shared with the auth provider that issues access tokens
    pub jwt_secret: String,

    #[serde(default)]
    pub google_drive_api_key: Option<String>,

    #[serde(default)]
    pub google_youtube_api_key: Option<String>,

    #[serde(default)]
    pub resend_api_key: Option<String>,

    #[serde(default = "default_notification_email")]
    pub notification_email: String,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    /// Public viewer base; a published document lives at `<base>/<id>`
    #[serde(default = "default_public_view_base")]
    pub public_view_base: String,

    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,

    /// Hosts the image proxy may fetch from, subdomains included
    #[serde(default = "default_proxy_allowed_domains")]
    pub proxy_allowed_domains: Vec<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_notification_email() -> String {
    "pp@playfulprocess.com".to_string()
}

fn default_mail_from() -> String {
    "Recursive Creator <noreply@playfulprocess.com>".to_string()
}

fn default_public_view_base() -> String {
    "https://recursive.eco/view".to_string()
}

fn default_dashboard_url() -> String {
    "https://creator.recursive.eco/dashboard".to_string()
}

fn default_proxy_allowed_domains() -> Vec<String> {
    ["drive.google.com", "lh3.googleusercontent.com", "supabase.co"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl ApiConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(environment())
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "CREATOR_JWT_SECRET must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Public viewer URL of a document
    pub fn public_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{}", self.public_view_base.trim_end_matches('/'), id)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CREATOR")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("proxy_allowed_domains")
}
