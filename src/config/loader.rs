use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, SmtpConfig, WebContentConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr: SocketAddr = parse_or("BIND_ADDR", var("BIND_ADDR"), || {
            SocketAddr::from(([127, 0, 0, 1], 5000))
        })?;

        let model_path = var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("models/model.json"));

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        let web = WebContentConfig {
            fetch_timeout: Duration::from_millis(parse_or(
                "WEBPAGE_FETCH_TIMEOUT",
                var("WEBPAGE_FETCH_TIMEOUT"),
                || 10_000,
            )?),
            max_body_bytes: parse_or("WEBPAGE_MAX_BYTES", var("WEBPAGE_MAX_BYTES"), || {
                5_000_000
            })?,
            user_agent: var("HTTP_USER_AGENT")
                .unwrap_or_else(|| format!("site-sentinel/{}", env!("CARGO_PKG_VERSION"))),
        };

        let smtp = match (var("SMTP_USERNAME"), var("SMTP_PASSWORD")) {
            (Some(username), Some(password)) => Some(SmtpConfig {
                host: var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_or("SMTP_PORT", var("SMTP_PORT"), || 587)?,
                sender: var("SMTP_SENDER").unwrap_or_else(|| username.clone()),
                username,
                password,
                timeout: Duration::from_millis(parse_or(
                    "SMTP_TIMEOUT",
                    var("SMTP_TIMEOUT"),
                    || 10_000,
                )?),
            }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            model_path,
            directories,
            logging,
            web,
            smtp,
        })
    }
}

fn parse_or<T, D>(key: &'static str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    D: FnOnce() -> T,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default()),
    }
}
