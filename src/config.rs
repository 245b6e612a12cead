//! Runtime settings, read from the environment (and a `.env` file if there is one).

use std::{env, fmt, str::FromStr, time::Duration};

/// Where contacts are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// A MongoDB collection, reached through `MONGO_URL`.
    Mongo,
    /// A process-local list; everything is lost on exit.
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("expected `mongo` or `memory`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_url: String,
    pub mongo_database: String,
    pub store: StoreKind,
    pub bind_address: String,
    pub port: u16,
    /// Key used to sign session cookies. When unset, one is generated on startup,
    /// which logs everyone out whenever the server restarts.
    pub session_secret: Option<String>,
    /// How long a session survives without being used.
    pub session_idle: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    /// An environment variable is set, but not to anything we can use.
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { var, value, reason } => {
                write!(f, "invalid value {:?} for {}: {}", value, var, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads the process environment, after loading `.env` if it exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        drop(dotenvy::dotenv());

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a `Config` out of whatever `var` returns for each setting.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let session_secret = var("SESSION_SECRET").filter(|s| !s.is_empty());

        let session_idle_secs: u64 = parse_var(&var, "SESSION_IDLE_SECS", 600)?;
        if session_idle_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SESSION_IDLE_SECS",
                value: "0".to_string(),
                reason: "sessions must live for at least a second".to_string(),
            });
        }

        Ok(Self {
            mongo_url: var("MONGO_URL").unwrap_or_else(|| "mongodb://127.0.0.1:27017".to_string()),
            mongo_database: var("MONGO_DATABASE").unwrap_or_else(|| "contact_app".to_string()),
            store: parse_var(&var, "CONTACT_STORE", StoreKind::Mongo)?,
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&var, "PORT", 3000)?,
            session_secret,
            session_idle: Duration::from_secs(session_idle_secs),
        })
    }
}

fn parse_var<T>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn config_of(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_of(&[]).expect("empty environment should be fine");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.store, StoreKind::Mongo);
        assert_eq!(config.mongo_url, "mongodb://127.0.0.1:27017");
        assert_eq!(config.session_idle, Duration::from_secs(600));
        assert!(config.session_secret.is_none());
    }

    #[test]
    fn overrides() {
        let config = config_of(&[
            ("PORT", "8080"),
            ("CONTACT_STORE", "Memory"),
            ("SESSION_SECRET", "hunter2hunter2"),
            ("SESSION_IDLE_SECS", "6"),
            ("MONGO_DATABASE", "wpu"),
        ])
        .expect("valid overrides");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.session_secret.as_deref(), Some("hunter2hunter2"));
        assert_eq!(config.session_idle, Duration::from_secs(6));
        assert_eq!(config.mongo_database, "wpu");
    }

    #[test]
    fn bad_values_name_their_variable() {
        match config_of(&[("PORT", "three thousand")]) {
            Err(ConfigError::Invalid { var, .. }) => assert_eq!(var, "PORT"),
            other => panic!("expected a PORT error, got {:?}", other),
        }
        match config_of(&[("CONTACT_STORE", "postgres")]) {
            Err(ConfigError::Invalid { var, .. }) => assert_eq!(var, "CONTACT_STORE"),
            other => panic!("expected a CONTACT_STORE error, got {:?}", other),
        }
        assert!(config_of(&[("SESSION_IDLE_SECS", "0")]).is_err());
    }

    #[test]
    fn empty_secret_counts_as_unset() {
        let config = config_of(&[("SESSION_SECRET", "")]).expect("empty secret is allowed");
        assert!(config.session_secret.is_none());
    }
}
