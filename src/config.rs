//! Configuración del servidor desde variables de entorno (y `.env` si existe).

use std::env;
use std::path::PathBuf;

use crate::error::StatsResult;
use crate::excel::Vocabulary;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "data/statistics.db";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    /// JSON con un vocabulario alternativo; `None` usa las tablas incluidas.
    pub vocabulary_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            vocabulary_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Lee STATS_BIND_ADDR, STATS_DB_PATH, STATS_VOCABULARY_PATH y
    /// STATS_MAX_UPLOAD_BYTES.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_upload_bytes = match non_empty("STATS_MAX_UPLOAD_BYTES") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("invalid STATS_MAX_UPLOAD_BYTES '{}', using default", raw);
                    defaults.max_upload_bytes
                }
            },
            None => defaults.max_upload_bytes,
        };

        AppConfig {
            bind_addr: non_empty("STATS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_path: non_empty("STATS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            vocabulary_path: non_empty("STATS_VOCABULARY_PATH").map(PathBuf::from),
            max_upload_bytes,
        }
    }

    pub fn load_vocabulary(&self) -> StatsResult<Vocabulary> {
        match &self.vocabulary_path {
            Some(path) => {
                log::info!("loading vocabulary from {}", path.display());
                Vocabulary::from_json_file(path)
            }
            None => Ok(Vocabulary::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("STATS_BIND_ADDR", "0.0.0.0:9000"),
            ("STATS_DB_PATH", "/tmp/s.db"),
            ("STATS_VOCABULARY_PATH", " "),
            ("STATS_MAX_UPLOAD_BYTES", "lots"),
        ]));
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/s.db"));
        assert_eq!(cfg.vocabulary_path, None);
        assert_eq!(cfg.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
