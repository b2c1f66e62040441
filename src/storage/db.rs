use rusqlite::Connection;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::StatsResult;

/// Almacén SQLite de registros de estadísticas. Una sola conexión protegida
/// por un mutex; cada operación es una sentencia (o transacción) corta.
pub struct SqliteStatisticsStore {
    conn: Mutex<Connection>,
}

impl fmt::Debug for SqliteStatisticsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqliteStatisticsStore(..)")
    }
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS statistics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        filename TEXT NOT NULL,
        upload_date TEXT NOT NULL,
        month INTEGER NOT NULL,
        year INTEGER NOT NULL,
        cities_count INTEGER NOT NULL DEFAULT 0,
        total_volunteers INTEGER NOT NULL DEFAULT 0,
        data TEXT NOT NULL,
        checksum TEXT NOT NULL,
        uploaded_by TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_statistics_period ON statistics (month, year);
    CREATE INDEX IF NOT EXISTS idx_statistics_checksum ON statistics (checksum);
";

impl SqliteStatisticsStore {
    /// Abre (o crea) la base en `path`, creando el directorio si hace falta.
    pub fn open<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(path)?;
        log::info!("statistics database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Base en memoria; se pierde al cerrar. Usada en tests.
    pub fn open_in_memory() -> StatsResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StatsResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStatisticsStore {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // a panic while holding the lock leaves the connection usable
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
