//! User service configuration.

use std::env;

use common::{ConfigError, DatabaseConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DB_HOST};

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Connection parameters for the users database
    pub database: DatabaseConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `DB_HOST` defaults to `localhost`; `DB_PORT`, `DB_NAME`, `DB_USER` and
    /// `DB_PASSWORD` are required.
    ///
    /// # Errors
    /// Fails fast with [`ConfigError`] if a required value is absent or
    /// `DB_PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string());
        let port = required("DB_PORT")?;
        let database = required("DB_NAME")?;
        let user = required("DB_USER")?;
        let password = required("DB_PASSWORD")?;

        let port = port.parse::<u16>().map_err(|e| ConfigError::Invalid {
            name: "DB_PORT",
            reason: e.to_string(),
        })?;

        let connect_timeout_secs = match env::var("DB_CONNECT_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "DB_CONNECT_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_CONNECT_TIMEOUT_SECS,
        };

        Ok(Self {
            database: DatabaseConfig {
                host,
                port,
                database,
                user,
                password,
                connect_timeout_secs,
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [(&str, Option<&str>); 6] = [
        ("DB_HOST", Some("db.internal")),
        ("DB_PORT", Some("5433")),
        ("DB_NAME", Some("users")),
        ("DB_USER", Some("app")),
        ("DB_PASSWORD", Some("secret")),
        ("DB_CONNECT_TIMEOUT_SECS", None),
    ];

    #[test]
    fn test_from_env_reads_all_values() {
        temp_env::with_vars(ALL_VARS, || {
            let config = UserServiceConfig::from_env().unwrap();

            assert_eq!(config.database.host, "db.internal");
            assert_eq!(config.database.port, 5433);
            assert_eq!(config.database.database, "users");
            assert_eq!(config.database.user, "app");
            assert_eq!(config.database.password, "secret");
            assert_eq!(config.database.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        });
    }

    #[test]
    fn test_host_defaults_to_localhost() {
        let mut vars = ALL_VARS;
        vars[0] = ("DB_HOST", None);

        temp_env::with_vars(vars, || {
            let config = UserServiceConfig::from_env().unwrap();
            assert_eq!(config.database.host, "localhost");
        });
    }

    #[test]
    fn test_missing_password_fails_fast() {
        let mut vars = ALL_VARS;
        vars[4] = ("DB_PASSWORD", None);

        temp_env::with_vars(vars, || {
            assert_eq!(
                UserServiceConfig::from_env().unwrap_err(),
                ConfigError::Missing("DB_PASSWORD")
            );
        });
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut vars = ALL_VARS;
        vars[1] = ("DB_PORT", Some("not-a-port"));

        temp_env::with_vars(vars, || {
            assert!(matches!(
                UserServiceConfig::from_env(),
                Err(ConfigError::Invalid { name: "DB_PORT", .. })
            ));
        });
    }
}
