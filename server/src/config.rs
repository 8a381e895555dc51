use std::env;
use std::str::FromStr;

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    /// Seconds between scheduled commit checks; 0 turns the scheduler off.
    pub commit_check_secs: u64,
    pub max_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: "smash-league.db".into(),
            host: "0.0.0.0".into(),
            port: 3001,
            commit_check_secs: 60,
            max_batch_size: 500,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            commit_check_secs: parsed(&lookup, "COMMIT_CHECK_SECS").unwrap_or(defaults.commit_check_secs),
            max_batch_size: parsed(&lookup, "MAX_BATCH_SIZE").unwrap_or(defaults.max_batch_size),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_path, "smash-league.db");
        assert_eq!(config.commit_check_secs, 60);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("COMMIT_CHECK_SECS", "0"),
            ("MAX_BATCH_SIZE", "lots"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.commit_check_secs, 0);
        assert_eq!(config.max_batch_size, 500);
    }
}
