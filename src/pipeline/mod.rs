//! Orquestación por petición: subida (validar, analizar, persistir) y
//! exportación (consultar, aplanar, escribir xlsx).

pub mod export;
pub mod upload;

pub use export::{export_statistics, ExportFile, ExportParams};
pub use upload::{process_upload, UploadOutcome, UploadRequest, UNKNOWN_UPLOADER};
