use crate::error::{AppError, AppResult};
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_DATA_DIR: &str = "/data";
pub const DEFAULT_CSV_FILE: &str = "complete_venues.csv";

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub pool: PoolConfig,
    pub files: FileSourceConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub client_timeout: Duration,
    pub keep_alive: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileSourceConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl FileSourceConfig {
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

impl Config {
    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let parse_env_var = |key: &str, default: &str| -> String {
            get(key).unwrap_or_else(|| default.to_string())
        };

        let parse_env_number = |key: &str, default: u64| -> u64 {
            get(key).and_then(|s| s.trim().parse().ok()).unwrap_or(default)
        };

        let parse_env_u32 = |key: &str, default: u32| -> u32 {
            get(key).and_then(|s| s.trim().parse().ok()).unwrap_or(default)
        };

        let parse_env_duration = |key: &str, default_secs: u64| -> Duration {
            Duration::from_secs(parse_env_number(key, default_secs))
        };

        let port = get("PORT")
            .or_else(|| get("EXPORTER_PORT"))
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(8000);

        let min_connections = parse_env_u32("EXPORTER_DB_MIN_CONNECTIONS", 1);
        let max_connections = parse_env_u32("EXPORTER_DB_MAX_CONNECTIONS", 5)
            .max(min_connections)
            .max(1);

        Config {
            server: ServerConfig {
                host: parse_env_var("EXPORTER_HOST", "0.0.0.0"),
                port,
                client_timeout: parse_env_duration("EXPORTER_CLIENT_TIMEOUT", 60),
                keep_alive: parse_env_duration("EXPORTER_KEEP_ALIVE", 75),
            },
            pool: PoolConfig {
                min_connections,
                max_connections,
                acquire_timeout: parse_env_duration("EXPORTER_DB_ACQUIRE_TIMEOUT", 30),
            },
            files: FileSourceConfig {
                data_dir: PathBuf::from(parse_env_var("EXPORTER_DATA_DIR", DEFAULT_DATA_DIR)),
                file_name: parse_env_var("EXPORTER_CSV_FILE", DEFAULT_CSV_FILE),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::from_lookup(|key| std::env::var(key).ok())
    }
}

pub fn load_config() -> Config {
    Config::default()
}

/// Where the Postgres connection comes from.
#[derive(Clone, PartialEq)]
pub enum DatabaseSettings {
    /// A full DSN taken from `DATABASE_URL`.
    Url(String),
    /// Assembled from the discrete `PG*` / `POSTGRES_*` variables.
    Discrete {
        user: String,
        password: String,
        host: String,
        port: u16,
        database: String,
    },
}

impl DatabaseSettings {
    /// Resolves settings with this precedence: `DATABASE_URL`, then each
    /// discrete value from its primary variable, its fallback, and finally
    /// its hard default. The password has no default.
    pub fn resolve<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let first_of = |keys: &[&str]| keys.iter().find_map(|&k| get(k));

        if let Some(url) = get("DATABASE_URL") {
            return Ok(DatabaseSettings::Url(url));
        }

        tracing::debug!("DATABASE_URL not set, assembling connection from discrete variables");

        let user = first_of(&["PGUSER", "POSTGRES_USER"]).unwrap_or_else(|| "postgres".to_string());
        let password = first_of(&["PGPASSWORD", "POSTGRES_PASSWORD"]).ok_or_else(|| {
            AppError::Config(
                "Missing database password: set DATABASE_URL, PGPASSWORD or POSTGRES_PASSWORD".to_string(),
            )
        })?;
        let database = first_of(&["PGDATABASE", "POSTGRES_DB"]).unwrap_or_else(|| "railway".to_string());
        let host = get("PGHOST").unwrap_or_else(|| "postgres.railway.internal".to_string());
        let port_raw = get("PGPORT").unwrap_or_else(|| "5432".to_string());
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Config(format!("Invalid PGPORT value: {port_raw}")))?;

        Ok(DatabaseSettings::Discrete {
            user,
            password,
            host,
            port,
            database,
        })
    }

    /// Connection options for the pool. Discrete values are passed through
    /// as-is, so passwords may contain URL-reserved characters.
    pub fn connect_options(&self) -> AppResult<PgConnectOptions> {
        match self {
            DatabaseSettings::Url(url) => PgConnectOptions::from_str(url)
                .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {e}"))),
            DatabaseSettings::Discrete {
                user,
                password,
                host,
                port,
                database,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(database)),
        }
    }

    /// The settings as a DSN, with user and password percent-encoded.
    pub fn connection_url(&self) -> AppResult<String> {
        match self {
            DatabaseSettings::Url(url) => Ok(url.clone()),
            DatabaseSettings::Discrete {
                user,
                password,
                host,
                port,
                database,
            } => {
                let invalid = |what: &str| AppError::Config(format!("Cannot build database URL: invalid {what}"));

                let mut url = Url::parse(&format!("postgresql://{host}:{port}"))
                    .map_err(|_| invalid("PGHOST"))?;
                url.set_username(user).map_err(|_| invalid("user"))?;
                url.set_password(Some(password)).map_err(|_| invalid("password"))?;
                url.set_path(&format!("/{database}"));
                Ok(url.to_string())
            }
        }
    }

    /// The connection URL with any password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        let parsed = self
            .connection_url()
            .ok()
            .and_then(|raw| Url::parse(&raw).ok());

        match parsed {
            Some(mut url) => {
                if url.password().is_some() {
                    // Only fails for cannot-be-a-base URLs, which never carry a password.
                    let _ = url.set_password(Some("********"));
                }
                url.to_string()
            }
            None => "<unparseable database url>".to_string(),
        }
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DatabaseSettings").field(&self.redacted_url()).finish()
    }
}
