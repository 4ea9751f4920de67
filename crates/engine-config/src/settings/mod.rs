use crate::env::EnvManager;
use chrono::Duration as ChronoDuration;
use database::DatabaseSettings;
use error::SettingsError;
use model::{pagination::offset::DEFAULT_PAGE_SIZE, records::watermark::WatermarkKey};
use std::{fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

pub mod database;
pub mod error;

/// Environment variable names.
pub mod vars {
    pub const SINK_URL: &str = "TELESYNC_SINK_URL";
    pub const DATABASE_URL: &str = "TELESYNC_DATABASE_URL";
    pub const DB_HOST: &str = "TELESYNC_DB_HOST";
    pub const DB_PORT: &str = "TELESYNC_DB_PORT";
    pub const DB_NAME: &str = "TELESYNC_DB_NAME";
    pub const DB_USER: &str = "TELESYNC_DB_USER";
    pub const DB_PASSWORD: &str = "TELESYNC_DB_PASSWORD";
    pub const DB_SSLMODE: &str = "TELESYNC_DB_SSLMODE";
    pub const SOURCE_TABLE: &str = "TELESYNC_SOURCE_TABLE";
    pub const WATERMARK_PATH: &str = "TELESYNC_WATERMARK_PATH";
    pub const WATERMARK_PARTITION: &str = "TELESYNC_WATERMARK_PARTITION";
    pub const WATERMARK_ROW: &str = "TELESYNC_WATERMARK_ROW";
    pub const BATCH_SIZE: &str = "TELESYNC_BATCH_SIZE";
    pub const BATCH_DELAY_MS: &str = "TELESYNC_BATCH_DELAY_MS";
    pub const INTERVAL_SECS: &str = "TELESYNC_INTERVAL_SECS";
    pub const LOOKBACK_SECS: &str = "TELESYNC_LOOKBACK_SECS";
    pub const HTTP_ADDR: &str = "TELESYNC_HTTP_ADDR";
}

pub const DEFAULT_SOURCE_TABLE: &str = "telemetry";
pub const DEFAULT_BATCH_DELAY_MS: u64 = 200;
pub const DEFAULT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LOOKBACK_SECS: i64 = 3600;
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:7071";

/// Raw configuration snapshot taken once at start-up.
///
/// Validation is deferred to the accessors so that a process with partial
/// configuration can still start: incremental cycles treat a failed
/// [`resolve`](Self::resolve) as a no-op while bulk loads surface it.
#[derive(Debug, Clone, Default)]
pub struct SyncSettings {
    env: EnvManager,
}

/// Everything a sync cycle needs, validated.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub sink_url: String,
    pub database: DatabaseSettings,
    pub source_table: String,
    pub watermark: WatermarkSettings,
    pub batch_size: usize,
    pub batch_delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSettings {
    pub path: PathBuf,
    pub key: WatermarkKey,
    pub lookback: ChronoDuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub http_addr: SocketAddr,
    pub interval: Duration,
}

impl SyncSettings {
    pub fn from_env(env: EnvManager) -> Self {
        Self { env }
    }

    pub fn resolve(&self) -> Result<ResolvedSettings, SettingsError> {
        let sink_url = self.sink_url()?;
        let database = self.database()?;
        let watermark = self.watermark()?;

        let batch_size = self.parse(vars::BATCH_SIZE, DEFAULT_PAGE_SIZE)?;
        if batch_size == 0 {
            return Err(SettingsError::Invalid {
                var: vars::BATCH_SIZE,
                reason: "must be greater than zero".into(),
            });
        }
        let batch_delay =
            Duration::from_millis(self.parse(vars::BATCH_DELAY_MS, DEFAULT_BATCH_DELAY_MS)?);

        Ok(ResolvedSettings {
            sink_url,
            database,
            source_table: self.source_table(),
            watermark,
            batch_size,
            batch_delay,
        })
    }

    pub fn sink_url(&self) -> Result<String, SettingsError> {
        let url = self
            .env
            .get(vars::SINK_URL)
            .ok_or(SettingsError::Missing(vars::SINK_URL))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::Invalid {
                var: vars::SINK_URL,
                reason: format!("expected an http(s) URL, got '{url}'"),
            });
        }
        Ok(url.to_string())
    }

    pub fn database(&self) -> Result<DatabaseSettings, SettingsError> {
        DatabaseSettings::from_env(&self.env)
    }

    pub fn source_table(&self) -> String {
        self.env
            .get(vars::SOURCE_TABLE)
            .unwrap_or(DEFAULT_SOURCE_TABLE)
            .to_string()
    }

    pub fn watermark(&self) -> Result<WatermarkSettings, SettingsError> {
        let path = self
            .env
            .get(vars::WATERMARK_PATH)
            .ok_or(SettingsError::Missing(vars::WATERMARK_PATH))?;

        Ok(WatermarkSettings {
            path: PathBuf::from(path),
            key: self.watermark_key(),
            lookback: self.lookback()?,
        })
    }

    pub fn watermark_key(&self) -> WatermarkKey {
        let defaults = WatermarkKey::default();
        WatermarkKey::new(
            self.env
                .get(vars::WATERMARK_PARTITION)
                .map(str::to_string)
                .unwrap_or(defaults.partition),
            self.env
                .get(vars::WATERMARK_ROW)
                .map(str::to_string)
                .unwrap_or(defaults.row),
        )
    }

    pub fn lookback(&self) -> Result<ChronoDuration, SettingsError> {
        let secs: i64 = self.parse(vars::LOOKBACK_SECS, DEFAULT_LOOKBACK_SECS)?;
        if secs < 0 {
            return Err(SettingsError::Invalid {
                var: vars::LOOKBACK_SECS,
                reason: "must not be negative".into(),
            });
        }
        Ok(ChronoDuration::seconds(secs))
    }

    pub fn server(&self) -> Result<ServerSettings, SettingsError> {
        let http_addr = self.env.get(vars::HTTP_ADDR).unwrap_or(DEFAULT_HTTP_ADDR);
        let http_addr = http_addr
            .parse::<SocketAddr>()
            .map_err(|e| SettingsError::Invalid {
                var: vars::HTTP_ADDR,
                reason: e.to_string(),
            })?;

        let interval: u64 = self.parse(vars::INTERVAL_SECS, DEFAULT_INTERVAL_SECS)?;
        if interval == 0 {
            return Err(SettingsError::Invalid {
                var: vars::INTERVAL_SECS,
                reason: "must be greater than zero".into(),
            });
        }

        Ok(ServerSettings {
            http_addr,
            interval: Duration::from_secs(interval),
        })
    }

    fn parse<T>(&self, var: &'static str, default: T) -> Result<T, SettingsError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.env.get(var) {
            Some(raw) => raw.parse::<T>().map_err(|e| SettingsError::Invalid {
                var,
                reason: format!("'{raw}': {e}"),
            }),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (vars::SINK_URL, "https://ingest.example.com/api/telemetry"),
            (vars::DATABASE_URL, "postgres://reader:pw@db/iot"),
            (vars::WATERMARK_PATH, "/var/lib/telesync/state"),
        ]
    }

    fn settings(env: Vec<(&'static str, &'static str)>) -> SyncSettings {
        SyncSettings::from_env(EnvManager::from_vars(env))
    }

    #[test]
    fn resolves_with_defaults() {
        let resolved = settings(complete()).resolve().unwrap();

        assert_eq!(resolved.sink_url, "https://ingest.example.com/api/telemetry");
        assert_eq!(resolved.source_table, "telemetry");
        assert_eq!(resolved.batch_size, 500);
        assert_eq!(resolved.batch_delay, Duration::from_millis(200));
        assert_eq!(resolved.watermark.key, WatermarkKey::default());
        assert_eq!(resolved.watermark.lookback, ChronoDuration::hours(1));
    }

    #[test]
    fn overrides_are_applied() {
        let mut env = complete();
        env.extend([
            (vars::SOURCE_TABLE, "iot.readings"),
            (vars::BATCH_SIZE, "1000"),
            (vars::BATCH_DELAY_MS, "0"),
            (vars::LOOKBACK_SECS, "60"),
            (vars::WATERMARK_ROW, "replay"),
        ]);

        let resolved = settings(env).resolve().unwrap();
        assert_eq!(resolved.source_table, "iot.readings");
        assert_eq!(resolved.batch_size, 1000);
        assert_eq!(resolved.batch_delay, Duration::ZERO);
        assert_eq!(resolved.watermark.lookback, ChronoDuration::seconds(60));
        assert_eq!(
            resolved.watermark.key,
            WatermarkKey::new("telemetry-sync", "replay")
        );
    }

    #[test]
    fn each_required_variable_is_reported() {
        for missing in [vars::SINK_URL, vars::DATABASE_URL, vars::WATERMARK_PATH] {
            let env = complete().into_iter().filter(|(k, _)| *k != missing).collect();
            match settings(env).resolve() {
                Err(SettingsError::Missing(var)) => assert_eq!(var, missing),
                other => panic!("expected Missing({missing}), got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_invalid_numbers() {
        let mut env = complete();
        env.push((vars::BATCH_SIZE, "0"));
        assert!(matches!(
            settings(env).resolve(),
            Err(SettingsError::Invalid { var, .. }) if var == vars::BATCH_SIZE
        ));

        let mut env = complete();
        env.push((vars::BATCH_DELAY_MS, "soon"));
        assert!(matches!(
            settings(env).resolve(),
            Err(SettingsError::Invalid { var, .. }) if var == vars::BATCH_DELAY_MS
        ));
    }

    #[test]
    fn rejects_non_http_sink() {
        let mut env = complete();
        env[0] = (vars::SINK_URL, "ftp://ingest");
        assert!(matches!(
            settings(env).sink_url(),
            Err(SettingsError::Invalid { .. })
        ));
    }

    #[test]
    fn server_settings_default_and_validate() {
        let server = settings(vec![]).server().unwrap();
        assert_eq!(server.http_addr, "0.0.0.0:7071".parse().unwrap());
        assert_eq!(server.interval, Duration::from_secs(300));

        let err = settings(vec![(vars::INTERVAL_SECS, "0")]).server().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }
}
