use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::api_json::error_response;
use crate::error::StatsError;
use crate::storage::{SqliteStatisticsStore, StatisticsStorage};

use super::run_blocking;

/// GET /api/statistics/list
pub async fn list_statistics_handler(store: web::Data<SqliteStatisticsStore>) -> impl Responder {
    match run_blocking(move || store.list()).await {
        Ok(summaries) => {
            let count = summaries.len();
            HttpResponse::Ok().json(json!({"success": true, "data": summaries, "count": count}))
        }
        Err(e) => error_response(&e),
    }
}

/// GET /api/statistics/{id}
pub async fn get_statistics_handler(
    store: web::Data<SqliteStatisticsStore>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    let result = run_blocking(move || store.get(id)?.ok_or(StatsError::NotFound(id))).await;
    match result {
        Ok(record) => HttpResponse::Ok().json(json!({"success": true, "data": record})),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/statistics/{id}
pub async fn delete_statistics_handler(
    store: web::Data<SqliteStatisticsStore>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    let result = run_blocking(move || {
        if store.delete(id)? {
            Ok(())
        } else {
            Err(StatsError::NotFound(id))
        }
    })
    .await;
    match result {
        Ok(()) => {
            log::info!("deleted statistics {}", id);
            HttpResponse::Ok().json(json!({"success": true, "message": "تم حذف الإحصائية بنجاح"}))
        }
        Err(e) => error_response(&e),
    }
}

/// GET /api/statistics/current
///
/// El registro subido más recientemente. Sin registros responde 200 con
/// `data: null`.
pub async fn current_statistics_handler(store: web::Data<SqliteStatisticsStore>) -> impl Responder {
    match run_blocking(move || store.latest()).await {
        Ok(Some(record)) => HttpResponse::Ok().json(json!({"success": true, "data": record})),
        Ok(None) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": null,
            "message": "لا توجد إحصائيات متاحة"
        })),
        Err(e) => error_response(&e),
    }
}
