use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::{StatsError, StatsResult};
use crate::excel::{allowed_extension, analyze_excel_file, Vocabulary};
use crate::models::{NewStatisticsRecord, UploadAnalysis};
use crate::storage::StatisticsStorage;

/// Valor de `uploaded_by` cuando no se indica quién subió el archivo.
pub const UNKNOWN_UPLOADER: &str = "مجهول";

/// Longitud del checksum guardado (dígitos hex).
pub const CHECKSUM_LEN: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// `None` si el formulario no traía el campo `file`.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
    pub uploaded_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub id: i64,
    pub filename: String,
    pub checksum: String,
    /// Registros previos con el mismo checksum (sólo informativo).
    pub duplicate_of: Vec<i64>,
    pub analysis: UploadAnalysis,
}

/// Reduce el nombre a su último componente y quita caracteres de control.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars().filter(|c| !c.is_control()).collect::<String>().trim().to_string()
}

/// Valida el nombre del archivo subido; devuelve (nombre saneado, extensión).
pub fn validate_upload_filename(filename: Option<&str>) -> StatsResult<(String, String)> {
    let raw = filename.ok_or(StatsError::MissingFile)?;
    let name = sanitize_filename(raw);
    if name.is_empty() {
        return Err(StatsError::EmptyFilename);
    }
    match allowed_extension(&name) {
        Some(ext) => Ok((name, ext)),
        None => Err(StatsError::UnsupportedFileType { filename: name }),
    }
}

/// Huella débil del análisis. Sirve para avisar de subidas repetidas, no
/// garantiza integridad.
pub fn analysis_checksum(analysis: &UploadAnalysis) -> StatsResult<String> {
    let text = serde_json::to_string(analysis)?;
    let digest = format!("{:x}", md5::compute(text.as_bytes()));
    Ok(digest.chars().take(CHECKSUM_LEN).collect())
}

/// Prefijo de los archivos temporales de subida.
pub const TEMP_PREFIX: &str = "statistics-upload-";

/// Analiza los bytes subidos a través de un archivo temporal que se borra al
/// terminar, haya error o no.
pub fn analyze_upload_bytes(
    bytes: &[u8],
    extension: &str,
    vocab: &Vocabulary,
    today: NaiveDate,
) -> StatsResult<UploadAnalysis> {
    analyze_upload_bytes_in(&std::env::temp_dir(), bytes, extension, vocab, today)
}

/// Igual que `analyze_upload_bytes`, con el archivo temporal dentro de `dir`.
pub fn analyze_upload_bytes_in(
    dir: &Path,
    bytes: &[u8],
    extension: &str,
    vocab: &Vocabulary,
    today: NaiveDate,
) -> StatsResult<UploadAnalysis> {
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&format!(".{}", extension))
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    analyze_excel_file(temp.path(), vocab, today)
}

/// Conteo como INTEGER de SQLite; fuera de rango es un fallo del análisis.
fn to_column(value: u64, column: &str) -> StatsResult<i64> {
    i64::try_from(value)
        .map_err(|_| StatsError::Analysis(format!("{} fuera de rango: {}", column, value)))
}

/// Valida, analiza y persiste una subida. No se crea ningún registro si algo falla.
pub fn process_upload<S>(
    store: &S,
    vocab: &Vocabulary,
    request: UploadRequest,
    today: NaiveDate,
) -> StatsResult<UploadOutcome>
where
    S: StatisticsStorage + ?Sized,
{
    let (filename, extension) = validate_upload_filename(request.filename.as_deref())?;
    let uploaded_by = request
        .uploaded_by
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string());

    let analysis = analyze_upload_bytes(&request.bytes, &extension, vocab, today)?;
    let checksum = analysis_checksum(&analysis)?;

    let duplicate_of = store.find_by_checksum(&checksum)?;
    if !duplicate_of.is_empty() {
        log::warn!(
            "upload '{}' matches checksum {} of records {:?}",
            filename,
            checksum,
            duplicate_of
        );
    }

    let record = NewStatisticsRecord {
        filename: filename.clone(),
        month: analysis.detected_month,
        year: analysis.detected_year,
        cities_count: to_column(analysis.cities_count as u64, "cities_count")?,
        total_volunteers: to_column(analysis.total_volunteers_all_cities, "total_volunteers")?,
        data: analysis.all_cities_data.clone(),
        checksum: checksum.clone(),
        uploaded_by,
    };
    let id = store.create(&record)?;
    log::info!(
        "stored statistics {} from '{}' for {}/{} ({} cities, {} volunteers)",
        id,
        filename,
        record.month,
        record.year,
        record.cities_count,
        record.total_volunteers
    );

    Ok(UploadOutcome {
        id,
        filename,
        checksum,
        duplicate_of,
        analysis,
    })
}
