use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::Duration;
use serde::Deserialize;
use thiserror::Error;
use whiteboard_models::{email_address::EmailAddress, Sensitive};

mod duration;

pub const DEFAULT_CONFIG: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml"));

/// Colon separated list of config files layered on top of [`DEFAULT_CONFIG`].
pub const CONFIG_PATH_ENV: &str = "WHITEBOARD_CONFIG";

pub const EMAIL_USER_ENV: &str = "EMAIL_USER";
pub const EMAIL_PASS_ENV: &str = "EMAIL_PASS";
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";

const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "http.host"),
    ("PORT", "http.port"),
    ("SMTP_URL", "email.smtp_url"),
    (EMAIL_USER_ENV, "email.user"),
    (EMAIL_PASS_ENV, "email.password"),
    ("SENTRY_DSN", "sentry.dsn"),
];

/// Load the config from the built-in defaults, the files listed in
/// `WHITEBOARD_CONFIG` and the process environment.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATH_ENV).unwrap_or_default();
    let paths = paths
        .split(':')
        .filter(|path| !path.is_empty())
        .collect::<Vec<_>>();
    load_from(&paths, |key| std::env::var(key).ok())
}

/// Load the config from the built-in defaults, `paths` and the environment
/// variables resolved by `env`.
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
        anyhow::Ok(builder.add_source(File::from_str(&content, FileFormat::Toml)))
    })?;

    let var = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let builder = ENV_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(name, key)| {
            builder.set_override_option(key, var(name))
        })?;

    let origins = var(CORS_ORIGINS_ENV).map(|origins| {
        origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect::<Vec<_>>()
    });

    builder
        .set_override_option("http.allowed_origins", origins)?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub timeout: Duration,
    pub user: Option<String>,
    pub password: Option<Sensitive<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub subject: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Sensitive<String>,
}

/// The mailbox the relay sends from and to, together with its credential.
#[derive(Debug, Clone)]
pub struct MailboxSecrets {
    pub user: EmailAddress,
    pub password: Sensitive<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretsError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("EMAIL_USER is not a valid email address")]
    InvalidMailbox,
}

impl EmailConfig {
    pub fn has_user(&self) -> bool {
        self.user.is_some()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// The mailbox identity and credential, or which of them is missing.
    pub fn secrets(&self) -> Result<MailboxSecrets, SecretsError> {
        let (Some(user), Some(password)) = (&self.user, &self.password) else {
            let missing = [
                (!self.has_user()).then_some(EMAIL_USER_ENV),
                (!self.has_password()).then_some(EMAIL_PASS_ENV),
            ];
            return Err(SecretsError::Missing(missing.into_iter().flatten().collect()));
        };

        Ok(MailboxSecrets {
            user: user.parse().map_err(|_| SecretsError::InvalidMailbox)?,
            password: password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use whiteboard_utils::assert_matches;

    use super::*;

    fn load_with(vars: &[(&str, &str)]) -> Config {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<_, _>>();
        load_from(&[] as &[&Path], |key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn load_default_config() {
        let config = load_with(&[]);
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.http.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.email.smtp_url, "smtps://smtp.gmail.com:465");
        assert_eq!(*config.email.timeout, std::time::Duration::from_secs(15));
        assert_eq!(config.contact.subject, "New Message from Portfolio Website");
        assert!(config
            .http
            .allowed_origins
            .contains(&"https://johnclose.ie".to_owned()));
        assert_eq!(config.email.user, None);
        assert!(!config.email.has_password());
    }

    #[test]
    fn environment_overrides() {
        let config = load_with(&[
            ("PORT", "5000"),
            ("HOST", "127.0.0.1"),
            ("SMTP_URL", "smtp://localhost:2525"),
            (EMAIL_USER_ENV, "relay@example.com"),
            (EMAIL_PASS_ENV, "hunter2"),
            (CORS_ORIGINS_ENV, "https://a.example, https://b.example,,"),
        ]);

        assert_eq!(config.http.port, 5000);
        assert_eq!(config.http.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.email.smtp_url, "smtp://localhost:2525");
        assert_eq!(
            config.http.allowed_origins,
            ["https://a.example", "https://b.example"]
        );

        let secrets = config.email.secrets().unwrap();
        assert_eq!(secrets.user.as_str(), "relay@example.com");
        assert_eq!(*secrets.password, "hunter2");
    }

    #[test]
    fn sentry_is_optional() {
        assert!(load_with(&[]).sentry.is_none());

        let dsn = "https://key@o0.ingest.sentry.io/1";
        let config = load_with(&[("SENTRY_DSN", dsn)]);
        assert_eq!(config.sentry.map(|sentry| sentry.dsn.0), Some(dsn.to_owned()));
    }

    #[test]
    fn blank_environment_variables_are_ignored() {
        let config = load_with(&[(EMAIL_USER_ENV, "  "), ("PORT", "")]);
        assert_eq!(config.email.user, None);
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn missing_secrets() {
        let config = load_with(&[]);
        assert_eq!(
            config.email.secrets().unwrap_err(),
            SecretsError::Missing(vec![EMAIL_USER_ENV, EMAIL_PASS_ENV])
        );

        let config = load_with(&[(EMAIL_USER_ENV, "relay@example.com")]);
        assert_eq!(
            config.email.secrets().unwrap_err(),
            SecretsError::Missing(vec![EMAIL_PASS_ENV])
        );
        assert_eq!(
            config.email.secrets().unwrap_err().to_string(),
            "Missing required environment variables: EMAIL_PASS"
        );

        let config = load_with(&[(EMAIL_PASS_ENV, "hunter2")]);
        assert_eq!(
            config.email.secrets().unwrap_err(),
            SecretsError::Missing(vec![EMAIL_USER_ENV])
        );
    }

    #[test]
    fn invalid_mailbox() {
        let config = load_with(&[(EMAIL_USER_ENV, "relay"), (EMAIL_PASS_ENV, "hunter2")]);
        assert_matches!(config.email.secrets(), Err(SecretsError::InvalidMailbox));
    }

    #[test]
    fn password_is_not_printed() {
        let config = load_with(&[(EMAIL_PASS_ENV, "hunter2")]);
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn config_files_are_layered() {
        let path = std::env::temp_dir().join(format!(
            "whiteboard-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[http]\nport = 8080\n[contact]\nsubject = \"Hi\"\n").unwrap();

        let config = load_from(&[&path], |_| None).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.http.port, 8080);
        assert_eq!(config.contact.subject, "Hi");
        assert_eq!(config.email.smtp_url, "smtps://smtp.gmail.com:465");
    }

    #[test]
    fn missing_config_file() {
        let result = load_from(&["/nonexistent/whiteboard.toml"], |_| None);
        assert!(result.is_err());
    }
}
