use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::Duration;
use folio_models::email_address::EmailAddress;
use serde::Deserialize;
use url::Url;

mod duration;

/// Built-in defaults, always loaded first.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_VAR: &str = "FOLIO_CONFIG";

/// Environment variables that override individual config keys.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "http.port"),
    ("EMAIL_PROVIDER", "email.provider"),
    ("FROM_EMAIL", "email.from"),
    ("TO_EMAIL", "contact.recipient"),
    ("SMTP_HOST", "email.smtp.host"),
    ("SMTP_PORT", "email.smtp.port"),
    ("SMTP_USER", "email.smtp.username"),
    ("SMTP_PASS", "email.smtp.password"),
    ("SENDGRID_API_KEY", "email.sendgrid.api_key"),
    ("EMAIL_SERVICE", "client.transport"),
    ("API_ENDPOINT", "client.endpoint"),
    ("EMAILJS_SERVICE_ID", "client.emailjs.service_id"),
    ("EMAILJS_TEMPLATE_ID", "client.emailjs.template_id"),
    ("EMAILJS_PUBLIC_KEY", "client.emailjs.public_key"),
];

/// Load the config from the built-in defaults, the files listed in
/// `FOLIO_CONFIG` and the process environment.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATHS_VAR)
        .map(|paths| {
            paths
                .split(':')
                .filter(|path| !path.is_empty())
                .map(Into::into)
                .collect::<Vec<std::path::PathBuf>>()
        })
        .unwrap_or_default();

    load_from(&paths, |var| std::env::var(var).ok())
}

/// Load the config from the built-in defaults and the given files, then apply
/// the [`ENV_OVERRIDES`] looked up with `env`. Blank variables are ignored.
pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })?;

    ENV_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            let value = env(var).filter(|value| !value.trim().is_empty());
            builder
                .set_override_option(key, value)
                .with_context(|| format!("Failed to apply {var}"))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub from: Option<EmailAddress>,
    pub from_name: String,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub sendgrid: SendGridConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Smtp,
    #[serde(rename = "sendgrid")]
    SendGrid,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            username: None,
            password: None,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Default, Deserialize)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    pub endpoint_override: Option<Url>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactConfig {
    pub recipient: Option<EmailAddress>,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub transport: ClientTransport,
    pub endpoint: Url,
    #[serde(default)]
    pub emailjs: EmailJsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientTransport {
    #[serde(alias = "vercel")]
    Relay,
    #[serde(alias = "emailjs")]
    Direct,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailJsConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub endpoint_override: Option<Url>,
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::PathBuf};

    use super::*;

    fn load_with_env(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<_, _>>();
        load_from(&[] as &[PathBuf], |var| vars.get(var).cloned())
    }

    #[test]
    fn load_default_config() {
        let config = load_with_env(&[]).unwrap();

        assert_eq!(config.http.port, 3000);
        assert_eq!(config.email.provider, EmailProvider::SendGrid);
        assert_eq!(config.email.from, None);
        assert_eq!(config.email.from_name, "Portfolio Contact");
        assert_eq!(config.email.smtp.port, 587);
        assert_eq!(config.contact.recipient, None);
        assert_eq!(config.client.transport, ClientTransport::Direct);
        assert_eq!(config.health.cache_ttl.as_secs(), 10);
    }

    #[test]
    fn environment_overrides() {
        let config = load_with_env(&[
            ("PORT", "8080"),
            ("EMAIL_PROVIDER", "smtp"),
            ("FROM_EMAIL", "noreply@example.com"),
            ("TO_EMAIL", "owner@example.com"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USER", "user"),
            ("SMTP_PASS", "pass"),
            ("SENDGRID_API_KEY", "SG.key"),
            ("EMAIL_SERVICE", "relay"),
            ("EMAILJS_PUBLIC_KEY", "public"),
        ])
        .unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.email.provider, EmailProvider::Smtp);
        assert_eq!(config.email.from.unwrap().as_str(), "noreply@example.com");
        assert_eq!(
            config.contact.recipient.unwrap().as_str(),
            "owner@example.com"
        );
        assert_eq!(config.email.smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.email.smtp.port, 2525);
        assert_eq!(config.email.smtp.username.as_deref(), Some("user"));
        assert_eq!(config.email.smtp.password.as_deref(), Some("pass"));
        assert_eq!(config.email.sendgrid.api_key.as_deref(), Some("SG.key"));
        assert_eq!(config.client.transport, ClientTransport::Relay);
        assert_eq!(config.client.emailjs.public_key.as_deref(), Some("public"));
        assert_eq!(config.client.emailjs.service_id, None);
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config = load_with_env(&[("FROM_EMAIL", ""), ("SENDGRID_API_KEY", "  ")]).unwrap();

        assert_eq!(config.email.from, None);
        assert_eq!(config.email.sendgrid.api_key, None);
    }

    #[test]
    fn transport_aliases() {
        for (value, expected) in [
            ("vercel", ClientTransport::Relay),
            ("emailjs", ClientTransport::Direct),
        ] {
            let config = load_with_env(&[("EMAIL_SERVICE", value)]).unwrap();
            assert_eq!(config.client.transport, expected);
        }
    }

    #[test]
    fn invalid_address_is_an_error() {
        load_with_env(&[("TO_EMAIL", "not an address")]).unwrap_err();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        load_from(&[Path::new("/nonexistent/folio.toml")], |_| None).unwrap_err();
    }
}
