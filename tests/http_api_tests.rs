mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;
use volunteer_stats::excel::{Vocabulary, XLSX_MIME};
use volunteer_stats::storage::SqliteStatisticsStore;
use volunteer_stats::{configure_routes, AppConfig};

const BOUNDARY: &str = "----stats-test-boundary";

macro_rules! app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(SqliteStatisticsStore::open_in_memory().unwrap()))
                .app_data(web::Data::new(Vocabulary::default()))
                .app_data(web::Data::new($config))
                .configure(configure_routes),
        )
        .await
    };
}

fn multipart_body(filename: &str, file: &[u8], uploaded_by: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(b"\r\n");
    if let Some(who) = uploaded_by {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"uploaded_by\"\r\n\r\n");
        body.extend_from_slice(who.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(filename: &str, file: &[u8], uploaded_by: Option<&str>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/statistics/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(filename, file, uploaded_by))
}

#[actix_web::test]
async fn empty_store_responses() {
    let app = app!(AppConfig::default());

    let req = test::TestRequest::get().uri("/api/statistics/current").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
    assert!(body["message"].is_string());

    let req = test::TestRequest::get().uri("/api/statistics/list").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);

    let req = test::TestRequest::get().uri("/api/statistics/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/api/statistics/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn export_distinguishes_bad_request_from_no_data() {
    let app = app!(AppConfig::default());

    let req = test::TestRequest::get()
        .uri("/api/statistics/export_excel?year=2024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/statistics/export_excel?month=5&year=2024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
    assert!(body.get("error").is_none());
}

#[actix_web::test]
async fn upload_then_read_export_and_delete() {
    let app = app!(AppConfig::default());

    let req = upload_request("may.xlsx", &common::workbook_bytes(), Some("نور")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["detectedMonth"], 5);
    assert_eq!(body["data"]["totalVolunteersAllCities"], 6);
    let id = body["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri(&format!("/api/statistics/{}", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["uploaded_by"], "نور");
    assert_eq!(body["data"]["data"]["العلا"]["totalVolunteers"], 6);

    let req = test::TestRequest::get()
        .uri("/api/statistics/export_excel?month=5&year=2024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), XLSX_MIME);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("statistics__2024_5.xlsx"));

    let req = test::TestRequest::delete().uri(&format!("/api/statistics/{}", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::get().uri("/api/statistics/list").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn upload_rejections_are_client_errors() {
    let app = app!(AppConfig::default());
    let req = upload_request("notes.txt", b"hello", None).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let small = AppConfig { max_upload_bytes: 16, ..AppConfig::default() };
    let app = app!(small);
    let req = upload_request("big.xlsx", &common::workbook_bytes(), None).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
