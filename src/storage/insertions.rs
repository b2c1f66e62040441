use chrono::Utc;
use rusqlite::params;

use crate::error::StatsResult;
use crate::models::NewStatisticsRecord;
use crate::storage::db::SqliteStatisticsStore;

/// Formato de `upload_date` (UTC); ordena igual como texto que como fecha.
pub const UPLOAD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl SqliteStatisticsStore {
    /// Inserta un registro nuevo y devuelve su id. La fecha de subida se fija aquí.
    pub fn insert_record(&self, record: &NewStatisticsRecord) -> StatsResult<i64> {
        let data_json = serde_json::to_string(&record.data)?;
        let upload_date = Utc::now().format(UPLOAD_DATE_FORMAT).to_string();

        let conn = self.conn();
        conn.execute(
            "INSERT INTO statistics (
                filename, upload_date, month, year, cities_count,
                total_volunteers, data, checksum, uploaded_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.filename,
                upload_date,
                record.month,
                record.year,
                record.cities_count,
                record.total_volunteers,
                data_json,
                record.checksum,
                record.uploaded_by,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Borra un registro. `false` si no existía.
    pub fn delete_record(&self, id: i64) -> StatsResult<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM statistics WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
