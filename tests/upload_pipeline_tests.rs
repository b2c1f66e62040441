mod common;

use chrono::NaiveDate;
use common::{workbook_bytes, workbook_from_rows};
use volunteer_stats::excel::Vocabulary;
use volunteer_stats::models::MAX_COUNT;
use volunteer_stats::pipeline::{process_upload, UploadRequest, UNKNOWN_UPLOADER};
use volunteer_stats::storage::{SqliteStatisticsStore, StatisticsStorage};
use volunteer_stats::StatsError;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
}

fn request(filename: Option<&str>, bytes: Vec<u8>, uploaded_by: Option<&str>) -> UploadRequest {
    UploadRequest {
        filename: filename.map(str::to_string),
        bytes,
        uploaded_by: uploaded_by.map(str::to_string),
    }
}

#[test]
fn upload_is_analyzed_and_stored() {
    let store = SqliteStatisticsStore::open_in_memory().unwrap();
    let vocab = Vocabulary::default();
    let outcome = process_upload(
        &store,
        &vocab,
        request(Some("../../reports/may.xlsx"), workbook_bytes(), None),
        today(),
    )
    .unwrap();

    assert_eq!(outcome.filename, "may.xlsx");
    assert_eq!(outcome.checksum.len(), 16);
    assert!(outcome.duplicate_of.is_empty());
    assert_eq!((outcome.analysis.detected_month, outcome.analysis.detected_year), (5, 2024));
    assert_eq!(outcome.analysis.total_volunteers_all_cities, 6);
    assert_eq!(outcome.analysis.cities_count, 1);

    let stored = store.get(outcome.id).unwrap().unwrap();
    assert_eq!(stored.uploaded_by, UNKNOWN_UPLOADER);
    assert_eq!((stored.month, stored.year), (5, 2024));
    assert_eq!(stored.total_volunteers, 6);
    assert_eq!(stored.data, outcome.analysis.all_cities_data);
    let ula = stored.data.get("العلا").unwrap();
    assert_eq!(ula.category_totals[0].name, "البيئة");
    assert_eq!(ula.details[1].opportunity_number, "OP-2");
}

#[test]
fn repeated_upload_is_flagged_but_stored() {
    let store = SqliteStatisticsStore::open_in_memory().unwrap();
    let vocab = Vocabulary::default();
    let first = process_upload(&store, &vocab, request(Some("a.xlsx"), workbook_bytes(), Some("ليلى")), today()).unwrap();
    let second = process_upload(&store, &vocab, request(Some("b.xlsx"), workbook_bytes(), None), today()).unwrap();

    assert_eq!(first.checksum, second.checksum);
    assert_eq!(second.duplicate_of, vec![first.id]);
    assert_eq!(store.list().unwrap().len(), 2);
    assert_eq!(store.get(first.id).unwrap().unwrap().uploaded_by, "ليلى");
}

#[test]
fn bad_requests_create_nothing() {
    let store = SqliteStatisticsStore::open_in_memory().unwrap();
    let vocab = Vocabulary::default();

    let err = process_upload(&store, &vocab, request(None, vec![], None), today()).unwrap_err();
    assert!(matches!(err, StatsError::MissingFile));
    let err = process_upload(&store, &vocab, request(Some(""), vec![], None), today()).unwrap_err();
    assert!(matches!(err, StatsError::EmptyFilename));
    let err = process_upload(&store, &vocab, request(Some("data.csv"), workbook_bytes(), None), today()).unwrap_err();
    assert!(matches!(err, StatsError::UnsupportedFileType { .. }));
    let err = process_upload(&store, &vocab, request(Some("broken.xlsx"), b"not a zip".to_vec(), None), today()).unwrap_err();
    assert!(matches!(err, StatsError::Analysis(_)));

    assert!(store.list().unwrap().is_empty());
}

#[test]
fn oversized_counts_are_stored_at_the_ceiling() {
    let store = SqliteStatisticsStore::open_in_memory().unwrap();
    let vocab = Vocabulary::default();
    let bytes = workbook_from_rows(&[
        ("بدر", "Media", 1e19, 1e19, "OP-9", "2024-05-02"),
        ("بدر", "Media", 5.0, 0.0, "OP-10", "2024-05-03"),
    ]);
    let outcome = process_upload(&store, &vocab, request(Some("big.xlsx"), bytes, None), today()).unwrap();
    assert_eq!(outcome.analysis.total_volunteers_all_cities, MAX_COUNT);

    let stored = store.get(outcome.id).unwrap().unwrap();
    assert_eq!(stored.total_volunteers, i64::MAX);
    assert_eq!(stored.data.get("بدر").unwrap().total_volunteers, MAX_COUNT);
}
