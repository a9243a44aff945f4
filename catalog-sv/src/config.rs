use crate::core::error::Error;
use crate::core::error::Error::SettingError;

pub const DEFAULT_DATABASE_URL: &str = "test.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_POOL_SIZE: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub pool_size: u32,
}

impl Settings {
    /// Reads `DATABASE_URL`, `BIND_ADDR` and `DB_POOL_SIZE`, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Settings, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Settings, Error>
        where
            F: Fn(&str) -> Option<String>,
    {
        let pool_size = match lookup("DB_POOL_SIZE") {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => match raw.parse::<u32>() {
                Ok(0) => return Err(SettingError {
                    name: "DB_POOL_SIZE",
                    reason: "must be at least 1".to_string(),
                }),
                Ok(n) => n,
                Err(e) => return Err(SettingError {
                    name: "DB_POOL_SIZE",
                    reason: e.to_string(),
                }),
            },
        };

        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, Error> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(settings(&[]).unwrap(), Settings {
            database_url: "test.db".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            pool_size: 5,
        });
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("DATABASE_URL", "/var/lib/catalog.db"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("DB_POOL_SIZE", "12"),
        ]).unwrap();

        assert_eq!(s.database_url, "/var/lib/catalog.db");
        assert_eq!(s.bind_addr, "0.0.0.0:9000");
        assert_eq!(s.pool_size, 12);
    }

    #[test]
    fn rejects_bad_pool_size() {
        assert!(matches!(settings(&[("DB_POOL_SIZE", "many")]), Err(SettingError { name: "DB_POOL_SIZE", .. })));
        assert!(matches!(settings(&[("DB_POOL_SIZE", "0")]), Err(SettingError { name: "DB_POOL_SIZE", .. })));
    }
}
