//! Configuration types, built from environment variables.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::{ConfigError, Result};

/// Default countdown length for the practice step.
pub const DEFAULT_PRACTICE_SECONDS: u32 = 300;

/// Default time an onboarding session may sit untouched before it is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Source of configuration variables. `std::env` in production.
pub type Vars<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Site-wide configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// HTTP port the server binds to.
    pub port: u16,
    /// Company name used in outgoing email copy.
    pub company_name: String,
    /// Object key of the logo embedded in emails. `None` disables the logo.
    pub logo_name: Option<String>,
    pub mail: MailConfig,
    pub storage: Option<StorageConfig>,
    pub onboarding: OnboardingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            company_name: "Mascotte.AI".to_string(),
            logo_name: None,
            mail: MailConfig::default(),
            storage: None,
            onboarding: OnboardingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    pub fn from_vars(vars: Vars<'_>) -> Result<Self> {
        let port = parse_var(vars, "MASCOTTE_PORT", 3000u16)?;

        let company_name = non_empty(vars, "COMPANY_NAME").unwrap_or_else(|| "Mascotte.AI".to_string());
        let logo_name = non_empty(vars, "LOGO_NAME");

        Ok(Self {
            port,
            company_name,
            logo_name,
            mail: MailConfig::from_vars(vars)?,
            storage: StorageConfig::from_vars(vars),
            onboarding: OnboardingConfig::from_vars(vars)?,
        })
    }
}

/// SMTP relay configuration for the contact form.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host. `None` disables sending.
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    /// Bare sender address; the display name is the company name.
    pub from_address: String,
    /// Fixed recipient of every contact request.
    pub recipient: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: 587,
            username: String::new(),
            password: SecretString::from(String::new()),
            from_address: "noreply@mascotte.com".to_string(),
            recipient: "mao@reblika.com".to_string(),
        }
    }
}

impl MailConfig {
    pub fn from_vars(vars: Vars<'_>) -> std::result::Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            smtp_host: non_empty(vars, "SMTP_HOST"),
            smtp_port: parse_var(vars, "SMTP_PORT", defaults.smtp_port)?,
            username: vars("SMTP_USERNAME").unwrap_or_default(),
            password: SecretString::from(vars("SMTP_PASSWORD").unwrap_or_default()),
            from_address: vars("MAIL_FROM_ADDRESS").unwrap_or(defaults.from_address),
            recipient: vars("MAIL_RECIPIENT").unwrap_or(defaults.recipient),
        })
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub bucket: String,
    /// Prefix prepended to every object key.
    pub key_prefix: String,
    /// Custom endpoint (e.g. a local S3-compatible server). Defaults to
    /// the virtual-hosted AWS endpoint for the bucket.
    pub endpoint: Option<String>,
}

impl StorageConfig {
    /// Returns `None` if `AWS_REGION` is not set (signing disabled).
    pub fn from_vars(vars: Vars<'_>) -> Option<Self> {
        let region = non_empty(vars, "AWS_REGION")?;
        Some(Self {
            region,
            access_key_id: vars("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: SecretString::from(vars("AWS_SECRET_ACCESS_KEY").unwrap_or_default()),
            bucket: non_empty(vars, "S3_BUCKET").unwrap_or_else(|| "mascottebucket".to_string()),
            key_prefix: "Uploads/".to_string(),
            endpoint: non_empty(vars, "S3_ENDPOINT"),
        })
    }
}

/// Onboarding flow timing.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Countdown length of the practice step, in ticks.
    pub practice_seconds: u32,
    /// Period between countdown ticks.
    pub tick_period: Duration,
    /// Sessions untouched for this long are discarded.
    pub idle_timeout: Duration,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            practice_seconds: DEFAULT_PRACTICE_SECONDS,
            tick_period: Duration::from_secs(1),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl OnboardingConfig {
    pub fn from_vars(vars: Vars<'_>) -> std::result::Result<Self, ConfigError> {
        let practice_seconds = parse_var(vars, "PRACTICE_SECONDS", DEFAULT_PRACTICE_SECONDS)?;
        let idle_seconds = parse_var(vars, "ONBOARDING_IDLE_SECONDS", DEFAULT_IDLE_TIMEOUT.as_secs())?;
        for (key, value) in [
            ("PRACTICE_SECONDS", u64::from(practice_seconds)),
            ("ONBOARDING_IDLE_SECONDS", idle_seconds),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        Ok(Self {
            practice_seconds,
            idle_timeout: Duration::from_secs(idle_seconds),
            ..Self::default()
        })
    }
}

fn non_empty(vars: Vars<'_>, key: &str) -> Option<String> {
    vars(key).filter(|s| !s.trim().is_empty())
}

/// Read and parse a variable, falling back to `default` when unset or blank.
fn parse_var<T>(vars: Vars<'_>, key: &str, default: T) -> std::result::Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(vars, key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::error::Error;

    fn load(pairs: &[(&str, &str)]) -> Result<SiteConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SiteConfig::from_vars(&|key: &str| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_site_copy() {
        let config = SiteConfig::default();
        assert_eq!(config.company_name, "Mascotte.AI");
        assert_eq!(config.mail.recipient, "mao@reblika.com");
        assert_eq!(config.mail.from_address, "noreply@mascotte.com");
        assert_eq!(config.onboarding.practice_seconds, 300);
        assert_eq!(config.onboarding.tick_period, Duration::from_secs(1));
        assert_eq!(config.onboarding.idle_timeout, Duration::from_secs(3600));
        assert!(config.logo_name.is_none());
        assert!(config.storage.is_none());
    }

    #[test]
    fn empty_source_gives_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.mail.smtp_host.is_none());
        assert!(config.storage.is_none());
        assert_eq!(config.onboarding.practice_seconds, 300);
    }

    #[test]
    fn reads_every_section() {
        let config = load(&[
            ("MASCOTTE_PORT", "8080"),
            ("COMPANY_NAME", "Reblika"),
            ("LOGO_NAME", "logo.png"),
            ("SMTP_HOST", "smtp.test"),
            ("SMTP_PORT", "2525"),
            ("SMTP_PASSWORD", "hunter2"),
            ("AWS_REGION", "eu-west-3"),
            ("S3_BUCKET", "assets"),
            ("PRACTICE_SECONDS", "120"),
            ("ONBOARDING_IDLE_SECONDS", "900"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.company_name, "Reblika");
        assert_eq!(config.logo_name.as_deref(), Some("logo.png"));
        assert_eq!(config.mail.smtp_host.as_deref(), Some("smtp.test"));
        assert_eq!(config.mail.smtp_port, 2525);
        assert_eq!(config.mail.password.expose_secret(), "hunter2");
        let storage = config.storage.unwrap();
        assert_eq!(storage.bucket, "assets");
        assert_eq!(storage.key_prefix, "Uploads/");
        assert_eq!(config.onboarding.practice_seconds, 120);
        assert_eq!(config.onboarding.idle_timeout, Duration::from_secs(900));
    }

    #[test]
    fn invalid_values_surface_as_config_errors() {
        for (key, value) in [
            ("MASCOTTE_PORT", "eighty"),
            ("SMTP_PORT", "70000"),
            ("PRACTICE_SECONDS", "0"),
            ("ONBOARDING_IDLE_SECONDS", "0"),
        ] {
            match load(&[(key, value)]) {
                Err(Error::Config(ConfigError::InvalidValue { key: bad, .. })) => assert_eq!(bad, key),
                other => panic!("{key}={value} should be rejected, got {other:?}"),
            }
        }
    }
}
