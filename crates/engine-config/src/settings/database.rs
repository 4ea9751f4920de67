use super::{error::SettingsError, vars};
use crate::env::EnvManager;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_SSLMODE: &str = "prefer";

const SSL_MODES: [&str; 3] = ["disable", "prefer", "require"];

/// Source database coordinates, either a full connection string or
/// discrete parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    Url(String),
    Params {
        host: String,
        port: u16,
        dbname: String,
        user: String,
        password: Option<String>,
        sslmode: String,
    },
}

impl DatabaseSettings {
    /// `TELESYNC_DATABASE_URL` wins; otherwise host, name and user must
    /// all be present.
    pub fn from_env(env: &EnvManager) -> Result<Self, SettingsError> {
        if let Some(url) = env.get(vars::DATABASE_URL) {
            return Ok(DatabaseSettings::Url(url.to_string()));
        }

        let host = env.get(vars::DB_HOST).ok_or(SettingsError::Missing(vars::DATABASE_URL))?;
        let dbname = env.get(vars::DB_NAME).ok_or(SettingsError::Missing(vars::DB_NAME))?;
        let user = env.get(vars::DB_USER).ok_or(SettingsError::Missing(vars::DB_USER))?;

        let port = match env.get(vars::DB_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|e| SettingsError::Invalid {
                var: vars::DB_PORT,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let sslmode = env
            .get(vars::DB_SSLMODE)
            .unwrap_or(DEFAULT_SSLMODE)
            .to_ascii_lowercase();
        if !SSL_MODES.contains(&sslmode.as_str()) {
            return Err(SettingsError::Invalid {
                var: vars::DB_SSLMODE,
                reason: format!("expected one of {}", SSL_MODES.join(", ")),
            });
        }

        Ok(DatabaseSettings::Params {
            host: host.to_string(),
            port,
            dbname: dbname.to_string(),
            user: user.to_string(),
            password: env.get(vars::DB_PASSWORD).map(str::to_string),
            sslmode,
        })
    }

    /// Connection string accepted by the Postgres driver.
    pub fn connection_string(&self) -> String {
        match self {
            DatabaseSettings::Url(url) => url.clone(),
            DatabaseSettings::Params {
                host,
                port,
                dbname,
                user,
                password,
                sslmode,
            } => {
                let mut parts = vec![
                    format!("host={}", quote(host)),
                    format!("port={port}"),
                    format!("dbname={}", quote(dbname)),
                    format!("user={}", quote(user)),
                ];
                if let Some(password) = password {
                    parts.push(format!("password={}", quote(password)));
                }
                parts.push(format!("sslmode={sslmode}"));
                parts.join(" ")
            }
        }
    }

    /// Connection target with credentials removed, for logs.
    pub fn display_target(&self) -> String {
        match self {
            DatabaseSettings::Url(url) => redact_url(url),
            DatabaseSettings::Params {
                host, port, dbname, ..
            } => format!("{host}:{port}/{dbname}"),
        }
    }
}

/// Quotes a key=value connection parameter.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return "<connection string>".to_string();
    };
    match rest.split_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => url.to_string(),
    }
}
