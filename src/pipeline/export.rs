use crate::error::{StatsError, StatsResult};
use crate::excel::{export_filename, project_export, write_export_workbook};
use crate::storage::StatisticsStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportParams {
    pub month: u32,
    pub year: i32,
    /// `None` = todas las ciudades.
    pub city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

/// Exporta los detalles guardados para (mes, año[, ciudad]) como xlsx.
///
/// Sin registros para el periodo => `NoRecords`; registros sin filas tras el
/// filtro => `NoDetails`. Ambos son resultados vacíos esperados, no fallos.
pub fn export_statistics<S>(store: &S, params: &ExportParams) -> StatsResult<ExportFile>
where
    S: StatisticsStorage + ?Sized,
{
    let ExportParams { month, year, .. } = *params;
    let records = store.find_by_period(month, year)?;
    log::debug!("export {}/{}: {} records", month, year, records.len());
    if records.is_empty() {
        return Err(StatsError::NoRecords { month, year });
    }

    let city = params.city.as_deref();
    let rows = project_export(&records, city);
    if rows.is_empty() {
        return Err(StatsError::NoDetails { month, year });
    }

    let bytes = write_export_workbook(&rows)?;
    log::info!(
        "exported {} rows for {}/{} city={:?} ({} bytes)",
        rows.len(),
        month,
        year,
        city,
        bytes.len()
    );

    Ok(ExportFile {
        filename: export_filename(city, month, year),
        bytes,
        row_count: rows.len(),
    })
}
