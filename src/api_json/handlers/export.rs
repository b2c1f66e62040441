use actix_web::http::header::{
    self, Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;

use crate::api_json::{error_response, parse_export_query};
use crate::excel::XLSX_MIME;
use crate::pipeline::export_statistics;
use crate::storage::SqliteStatisticsStore;

use super::run_blocking;

/// `attachment` con nombre ASCII de respaldo y el nombre real en `filename*`.
pub fn attachment_disposition(filename: &str) -> ContentDisposition {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && !c.is_ascii_control() { c } else { '_' })
        .collect();
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(fallback),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: filename.as_bytes().to_vec(),
            }),
        ],
    }
}

/// GET /api/statistics/export_excel?month=&year=&city=
pub async fn export_excel_handler(
    store: web::Data<SqliteStatisticsStore>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let params = match parse_export_query(&query) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    match run_blocking(move || export_statistics(store.get_ref(), &params)).await {
        Ok(file) => HttpResponse::Ok()
            .content_type(XLSX_MIME)
            .insert_header(attachment_disposition(&file.filename))
            .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
            .insert_header((header::PRAGMA, "no-cache"))
            .insert_header((header::EXPIRES, "0"))
            .body(file.bytes),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_keeps_unicode_name_in_extended_param() {
        let cd = attachment_disposition("statistics_جدة_2024_5.xlsx");
        assert_eq!(cd.get_filename(), Some("statistics_____2024_5.xlsx"));
        let ext = cd.get_filename_ext().unwrap();
        assert_eq!(ext.value, "statistics_جدة_2024_5.xlsx".as_bytes());
    }
}
