//! Persistencia de los registros de estadísticas.
//!
//! `StatisticsStorage` es la frontera que usa el resto del crate; la
//! implementación por defecto vive sobre SQLite (`db`, `insertions`, `queries`).

pub mod db;
pub mod insertions;
pub mod queries;

pub use db::SqliteStatisticsStore;

use crate::error::StatsResult;
use crate::models::{NewStatisticsRecord, StatisticsRecord, StatisticsSummary};

pub trait StatisticsStorage {
    fn create(&self, record: &NewStatisticsRecord) -> StatsResult<i64>;
    /// Ordenado por fecha de subida descendente.
    fn list(&self) -> StatsResult<Vec<StatisticsSummary>>;
    fn get(&self, id: i64) -> StatsResult<Option<StatisticsRecord>>;
    fn delete(&self, id: i64) -> StatsResult<bool>;
    fn latest(&self) -> StatsResult<Option<StatisticsRecord>>;
    fn find_by_period(&self, month: u32, year: i32) -> StatsResult<Vec<StatisticsRecord>>;
    fn find_by_checksum(&self, checksum: &str) -> StatsResult<Vec<i64>>;
}

impl StatisticsStorage for SqliteStatisticsStore {
    fn create(&self, record: &NewStatisticsRecord) -> StatsResult<i64> {
        self.insert_record(record)
    }

    fn list(&self) -> StatsResult<Vec<StatisticsSummary>> {
        self.list_summaries()
    }

    fn get(&self, id: i64) -> StatsResult<Option<StatisticsRecord>> {
        self.fetch_record(id)
    }

    fn delete(&self, id: i64) -> StatsResult<bool> {
        self.delete_record(id)
    }

    fn latest(&self) -> StatsResult<Option<StatisticsRecord>> {
        self.fetch_latest()
    }

    fn find_by_period(&self, month: u32, year: i32) -> StatsResult<Vec<StatisticsRecord>> {
        self.fetch_by_period(month, year)
    }

    fn find_by_checksum(&self, checksum: &str) -> StatsResult<Vec<i64>> {
        self.ids_with_checksum(checksum)
    }
}
