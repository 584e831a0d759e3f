//! Database configuration for the durable deployment.
//!
//! Settings are read from `TASKTRACK_DB_*` environment variables, validated
//! before use, and turned into a bounded r2d2 connection pool.

use crate::task::adapters::postgres::{StatementTimeout, TaskPgPool};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Prefix shared by every database environment variable.
pub const ENV_PREFIX: &str = "TASKTRACK_DB";

/// Errors raised while loading or applying database configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is missing or has the wrong type.
    #[error("failed to load database configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A required text setting is blank.
    #[error("database setting `{0}` must not be blank")]
    Blank(&'static str),

    /// A numeric setting that must be positive is zero.
    #[error("database setting `{0}` must be greater than zero")]
    Zero(&'static str),

    /// Connections would be kept idle longer than they are allowed to live.
    #[error(
        "pool_max_conn_idle_time_secs ({idle}) must not exceed pool_conn_lifetime_secs ({lifetime})"
    )]
    IdleExceedsLifetime {
        /// Configured idle time, in seconds.
        idle: u64,
        /// Configured connection lifetime, in seconds.
        lifetime: u64,
    },

    /// The pool could not open its initial connections.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// TLS negotiation mode passed to libpq as `sslmode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// Never use TLS.
    Disable,
    /// Use TLS only if the server insists.
    Allow,
    /// Use TLS when the server supports it.
    #[default]
    Prefer,
    /// Always use TLS without verifying the server.
    Require,
    /// Always use TLS and verify the server certificate chain.
    VerifyCa,
    /// Always use TLS and verify the chain and host name.
    VerifyFull,
}

impl SslMode {
    /// Returns the libpq spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }
}

/// Connection and pool settings for the `PostgreSQL` store.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// TLS mode.
    #[serde(default)]
    pub ssl_mode: SslMode,
    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Maximum lifetime of a pooled connection, in seconds.
    #[serde(default = "default_pool_conn_lifetime_secs")]
    pub pool_conn_lifetime_secs: u64,
    /// Maximum idle time of a pooled connection, in seconds.
    #[serde(default = "default_pool_max_conn_idle_time_secs")]
    pub pool_max_conn_idle_time_secs: u64,
    /// How long a caller waits for a free connection, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Server-side limit for a single statement, in milliseconds.
    #[serde(default)]
    pub statement_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(::config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads settings from explicit `TASKTRACK_DB_*` key/value pairs instead
    /// of the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required key is missing or a value fails
    /// validation.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: ::config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::load(::config::Environment::with_prefix(ENV_PREFIX).source(Some(source)))
    }

    fn load(environment: ::config::Environment) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(environment)
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Blank`] or [`ConfigError::Zero`] naming the
    /// first offending setting, or [`ConfigError::IdleExceedsLifetime`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("host", &self.host),
            ("name", &self.name),
            ("user", &self.user),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Blank(key));
            }
        }
        for (key, value) in [
            ("port", u64::from(self.port)),
            ("pool_size", u64::from(self.pool_size)),
            ("pool_conn_lifetime_secs", self.pool_conn_lifetime_secs),
            (
                "pool_max_conn_idle_time_secs",
                self.pool_max_conn_idle_time_secs,
            ),
            ("connect_timeout_secs", self.connect_timeout_secs),
            (
                "statement_timeout_ms",
                self.statement_timeout_ms.unwrap_or(1),
            ),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(key));
            }
        }
        if self.pool_max_conn_idle_time_secs > self.pool_conn_lifetime_secs {
            return Err(ConfigError::IdleExceedsLifetime {
                idle: self.pool_max_conn_idle_time_secs,
                lifetime: self.pool_conn_lifetime_secs,
            });
        }
        Ok(())
    }

    /// Renders a libpq key/value connection string.
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={} sslmode={} connect_timeout={}",
            quote_conninfo(&self.host),
            self.port,
            quote_conninfo(&self.name),
            quote_conninfo(&self.user),
            quote_conninfo(&self.password),
            self.ssl_mode.as_str(),
            self.connect_timeout_secs,
        )
    }

    /// Builds the bounded connection pool described by these settings.
    ///
    /// The pool opens its initial connections eagerly, so an unreachable
    /// server fails here rather than on the first repository call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the pool cannot
    /// connect within `connect_timeout_secs`.
    pub fn build_pool(&self) -> Result<TaskPgPool, ConfigError> {
        self.validate()?;
        let manager = ConnectionManager::<PgConnection>::new(self.connection_string());
        let mut builder = Pool::builder()
            .max_size(self.pool_size)
            .max_lifetime(Some(Duration::from_secs(self.pool_conn_lifetime_secs)))
            .idle_timeout(Some(Duration::from_secs(
                self.pool_max_conn_idle_time_secs,
            )))
            .connection_timeout(Duration::from_secs(self.connect_timeout_secs));
        if let Some(millis) = self.statement_timeout_ms {
            builder =
                builder.connection_customizer(Box::new(StatementTimeout::from_millis(millis)));
        }
        let pool = builder.build(manager)?;
        tracing::info!(
            host = %self.host,
            port = self.port,
            database = %self.name,
            pool_size = self.pool_size,
            "database pool ready"
        );
        Ok(pool)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_size", &self.pool_size)
            .field("pool_conn_lifetime_secs", &self.pool_conn_lifetime_secs)
            .field(
                "pool_max_conn_idle_time_secs",
                &self.pool_max_conn_idle_time_secs,
            )
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .finish()
    }
}

const fn default_port() -> u16 {
    5432
}

const fn default_pool_size() -> u32 {
    10
}

const fn default_pool_conn_lifetime_secs() -> u64 {
    3600
}

const fn default_pool_max_conn_idle_time_secs() -> u64 {
    300
}

const fn default_connect_timeout_secs() -> u64 {
    30
}

/// Quotes a value for a libpq key/value connection string.
///
/// Wraps the value in single quotes and backslash-escapes embedded quotes and
/// backslashes.
#[must_use]
pub fn quote_conninfo(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}
