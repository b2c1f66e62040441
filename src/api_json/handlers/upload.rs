use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse, Responder};
use futures_util::stream::StreamExt;
use serde_json::json;

use crate::api_json::error_response;
use crate::config::AppConfig;
use crate::error::{StatsError, StatsResult};
use crate::excel::Vocabulary;
use crate::pipeline::{process_upload, UploadRequest};
use crate::storage::SqliteStatisticsStore;

use super::run_blocking;

/// Lee el cuerpo de un campo acumulando como mucho `limit` bytes.
async fn read_field(field: &mut Field, limit: usize) -> StatsResult<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| StatsError::InvalidForm(e.to_string()))?;
        if buf.len() + bytes.len() > limit {
            return Err(StatsError::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&bytes);
    }
    Ok(buf)
}

/// Recoge los campos `file` y `uploaded_by` del formulario; el resto se descarta.
pub async fn read_upload_form(payload: &mut Multipart, limit: usize) -> StatsResult<UploadRequest> {
    let mut request = UploadRequest::default();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| StatsError::InvalidForm(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .map(str::to_string)
            .unwrap_or_default();
        match name.as_str() {
            "file" => {
                // Un campo `file` sin nombre de archivo cuenta como "no seleccionado".
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string)
                    .unwrap_or_default();
                request.bytes = read_field(&mut field, limit).await?;
                request.filename = Some(filename);
            }
            "uploaded_by" => {
                let raw = read_field(&mut field, limit).await?;
                request.uploaded_by = Some(String::from_utf8_lossy(&raw).into_owned());
            }
            _ => {
                read_field(&mut field, limit).await?;
            }
        }
    }
    Ok(request)
}

/// POST /api/statistics/upload (multipart: `file`, `uploaded_by` opcional)
pub async fn upload_statistics_handler(
    mut payload: Multipart,
    store: web::Data<SqliteStatisticsStore>,
    vocab: web::Data<Vocabulary>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let request = match read_upload_form(&mut payload, config.max_upload_bytes).await {
        Ok(r) => r,
        Err(e) => {
            log::warn!("rejected upload form: {}", e);
            return error_response(&e);
        }
    };
    log::info!(
        "upload received: {:?} ({} bytes)",
        request.filename,
        request.bytes.len()
    );

    let today = chrono::Local::now().date_naive();
    let result = run_blocking(move || {
        process_upload(store.get_ref(), vocab.get_ref(), request, today)
    })
    .await;

    match result {
        Ok(outcome) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "تم رفع الملف وحفظ البيانات بنجاح",
            "data": outcome.analysis,
            "id": outcome.id,
            "checksum": outcome.checksum,
            "duplicateOf": outcome.duplicate_of,
        })),
        Err(e) => error_response(&e),
    }
}
