//! Módulo `excel`: todo lo que lee o escribe hojas de cálculo.
//!
//! Submódulos:
//! - `io`: lectura de libros con calamine y celdas tipadas
//! - `vocabulary`: ciudades, categorías y colores reconocidos
//! - `normalizer`: normalización de una fila contra el vocabulario
//! - `period`: detección del mes/año del archivo
//! - `aggregator`: agregado por ciudad y categoría
//! - `export`: aplanado de registros y escritura del xlsx exportado

pub mod io;
pub mod vocabulary;
pub mod normalizer;
pub mod period;
pub mod aggregator;
pub mod export;

pub use aggregator::{analyze_excel_file, analyze_sheet};
pub use export::{export_filename, project_export, write_export_workbook, XLSX_MIME};
pub use io::{read_first_sheet, CellValue, RawRow, Sheet};
pub use normalizer::{normalize_row, Rejection};
pub use period::{detect_period, detect_sheet_period, ReportingPeriod};
pub use vocabulary::Vocabulary;

/// Extensiones aceptadas para los archivos subidos.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Devuelve la extensión (en minúsculas) si está permitida.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)?
        .to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
