use crate::excel::io::{CellValue, RawRow};
use crate::excel::vocabulary::Vocabulary;
use crate::models::{add_counts, NormalizedEntry, MAX_COUNT, NOT_AVAILABLE};

// Etiquetas de columna en orden de preferencia (árabe, luego inglés).
pub const CITY_COLUMNS: &[&str] = &["مدينة / محافظة", "City / Province"];
pub const CATEGORY_COLUMNS: &[&str] = &["نوع الفرصة التطوعية", "Opportunity Type"];
pub const MALE_COLUMNS: &[&str] = &["عدد المتطوعين"];
pub const FEMALE_COLUMNS: &[&str] = &["عدد المتطوعات"];
pub const OPPORTUNITY_NUMBER_COLUMNS: &[&str] =
    &["رقم الفرصة التطوعية", "Volunteer Opportunity Number"];
pub const OPPORTUNITY_NAME_COLUMNS: &[&str] =
    &["اسم الفرصة التطوعية", "Volunteer Opportunity Name"];
pub const LEADER_COLUMNS: &[&str] = &["قائد الفرصة", "Opportunity Leader"];
pub const START_DATE_COLUMNS: &[&str] = &["تاريخ البداية", "Start Date"];
pub const END_DATE_COLUMNS: &[&str] = &["تاريخ النهاية", "End Date"];

/// Por qué se descartó una fila. Sólo se usa para diagnóstico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownCity(String),
    UnknownCategory { city: String, category: String },
}

/// Primera columna presente de la lista; no se mezclan valores de varias columnas.
pub fn first_present<'a>(row: &'a RawRow, labels: &[&str]) -> Option<&'a CellValue> {
    labels.iter().find_map(|label| row.get(label))
}

fn text_or_na(row: &RawRow, labels: &[&str]) -> String {
    match first_present(row, labels) {
        Some(cell) if !cell.is_empty() => cell.as_text(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Fecha como `YYYY-MM-DD` si se reconoce; si no, el texto previo al primer espacio.
fn date_or_na(row: &RawRow, labels: &[&str]) -> String {
    match first_present(row, labels) {
        Some(cell) if !cell.is_empty() => match cell.as_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => {
                let text = cell.as_text();
                text.split(' ').next().unwrap_or_default().trim().to_string()
            }
        },
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn count(row: &RawRow, labels: &[&str]) -> u64 {
    first_present(row, labels)
        .and_then(CellValue::as_count)
        .unwrap_or(0)
}

/// Normaliza una fila contra el vocabulario. Devuelve `Err` si la ciudad o la
/// categoría no pertenecen a las listas fijas.
pub fn normalize_row(row: &RawRow, vocab: &Vocabulary) -> Result<NormalizedEntry, Rejection> {
    let raw_city = first_present(row, CITY_COLUMNS)
        .map(CellValue::as_text)
        .unwrap_or_default();
    let city = vocab.canonical_city(&raw_city).to_string();

    let raw_category = first_present(row, CATEGORY_COLUMNS)
        .map(CellValue::as_text)
        .unwrap_or_default();
    let category = vocab.canonical_category(&raw_category).to_string();

    if !vocab.city_is_recognized(&city) {
        return Err(Rejection::UnknownCity(city));
    }
    if !vocab.category_is_recognized(&category) {
        return Err(Rejection::UnknownCategory { city, category });
    }

    let volunteers_male = count(row, MALE_COLUMNS);
    let volunteers_female = count(row, FEMALE_COLUMNS);

    Ok(NormalizedEntry {
        city,
        category,
        volunteers_male,
        volunteers_female,
        volunteers: add_counts(volunteers_male, volunteers_female),
        opportunity_number: text_or_na(row, OPPORTUNITY_NUMBER_COLUMNS),
        opportunity_name: text_or_na(row, OPPORTUNITY_NAME_COLUMNS),
        opportunity_leader: text_or_na(row, LEADER_COLUMNS),
        start_date: date_or_na(row, START_DATE_COLUMNS),
        end_date: date_or_na(row, END_DATE_COLUMNS),
    })
}
