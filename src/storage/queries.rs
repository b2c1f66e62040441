use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use crate::error::StatsResult;
use crate::models::{CityMap, StatisticsRecord, StatisticsSummary};
use crate::storage::db::SqliteStatisticsStore;

const RECORD_COLUMNS: &str = "id, filename, upload_date, month, year, cities_count, \
     total_volunteers, data, checksum, uploaded_by";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<StatisticsRecord> {
    let data_json: String = row.get(7)?;
    let data: CityMap = serde_json::from_str(&data_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    Ok(StatisticsRecord {
        id: row.get(0)?,
        filename: row.get(1)?,
        upload_date: row.get(2)?,
        month: row.get(3)?,
        year: row.get(4)?,
        cities_count: row.get(5)?,
        total_volunteers: row.get(6)?,
        data,
        checksum: row.get(8)?,
        uploaded_by: row.get(9)?,
    })
}

impl SqliteStatisticsStore {
    /// Todos los registros sin `data`, del más reciente al más antiguo.
    pub fn list_summaries(&self) -> StatsResult<Vec<StatisticsSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, filename, upload_date, month, year, cities_count,
                    total_volunteers, uploaded_by, checksum
             FROM statistics ORDER BY upload_date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StatisticsSummary {
                id: row.get(0)?,
                filename: row.get(1)?,
                upload_date: row.get(2)?,
                month: row.get(3)?,
                year: row.get(4)?,
                cities_count: row.get(5)?,
                total_volunteers: row.get(6)?,
                uploaded_by: row.get(7)?,
                checksum: row.get(8)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn fetch_record(&self, id: i64) -> StatsResult<Option<StatisticsRecord>> {
        let sql = format!("SELECT {} FROM statistics WHERE id = ?1", RECORD_COLUMNS);
        let record = self
            .conn()
            .query_row(&sql, params![id], record_from_row)
            .optional()?;
        Ok(record)
    }

    pub fn fetch_latest(&self) -> StatsResult<Option<StatisticsRecord>> {
        let sql = format!(
            "SELECT {} FROM statistics ORDER BY upload_date DESC, id DESC LIMIT 1",
            RECORD_COLUMNS
        );
        let record = self.conn().query_row(&sql, [], record_from_row).optional()?;
        Ok(record)
    }

    /// Registros de un (mes, año), en orden de inserción.
    pub fn fetch_by_period(&self, month: u32, year: i32) -> StatsResult<Vec<StatisticsRecord>> {
        let sql = format!(
            "SELECT {} FROM statistics WHERE month = ?1 AND year = ?2 ORDER BY id ASC",
            RECORD_COLUMNS
        );
        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![month, year], record_from_row)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn ids_with_checksum(&self, checksum: &str) -> StatsResult<Vec<i64>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id FROM statistics WHERE checksum = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![checksum], |row| row.get::<_, i64>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}
