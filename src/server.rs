use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use crate::api_json::handlers::{
    current_statistics_handler, delete_statistics_handler, export_excel_handler,
    get_statistics_handler, list_statistics_handler, upload_statistics_handler,
};
use crate::config::AppConfig;
use crate::storage::SqliteStatisticsStore;

/// Registra las rutas bajo `/api/statistics`. Las rutas fijas van antes de
/// `/{stat_id}` para que no las capture el parámetro.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/statistics")
            .route("/upload", web::post().to(upload_statistics_handler))
            .route("/list", web::get().to(list_statistics_handler))
            .route("/current", web::get().to(current_statistics_handler))
            .route("/export_excel", web::get().to(export_excel_handler))
            .route("/{stat_id}", web::get().to(get_statistics_handler))
            .route("/{stat_id}", web::delete().to(delete_statistics_handler)),
    );
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let store = SqliteStatisticsStore::open(&config.db_path)
        .map_err(|e| std::io::Error::other(format!("failed to open {}: {}", config.db_path.display(), e)))?;
    let vocabulary = config
        .load_vocabulary()
        .map_err(|e| std::io::Error::other(format!("failed to load vocabulary: {}", e)))?;

    log::info!("upload limit {} bytes", config.max_upload_bytes);
    log::info!("listening on http://{}", config.bind_addr);

    let store = web::Data::new(store);
    let vocabulary = web::Data::new(vocabulary);
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(store.clone())
            .app_data(vocabulary.clone())
            .app_data(config.clone())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
