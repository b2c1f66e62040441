use chrono::NaiveDate;
use std::path::Path;

use crate::error::StatsResult;
use crate::excel::io::{read_first_sheet, Sheet};
use crate::excel::normalizer::{normalize_row, Rejection};
use crate::excel::period::detect_sheet_period;
use crate::excel::vocabulary::Vocabulary;
use crate::models::UploadAnalysis;

/// Agrega una hoja ya leída. Las filas se procesan en orden; las rechazadas no
/// aportan nada al resultado.
pub fn analyze_sheet(sheet: &Sheet, vocab: &Vocabulary, today: NaiveDate) -> UploadAnalysis {
    let period = detect_sheet_period(sheet, today);
    let mut analysis = UploadAnalysis::new(period.month, period.year);
    let mut rejected = 0usize;

    for (idx, row) in sheet.rows.iter().enumerate() {
        match normalize_row(row, vocab) {
            Ok(entry) => {
                log::debug!(
                    "row {}: city={} category={} male={} female={} total={}",
                    idx + 2,
                    entry.city,
                    entry.category,
                    entry.volunteers_male,
                    entry.volunteers_female,
                    entry.volunteers
                );
                let color = vocab.category_color(&entry.category).to_string();
                analysis.fold(&entry, &color);
            }
            Err(reason) => {
                rejected += 1;
                if row.is_blank() {
                    continue;
                }
                match reason {
                    Rejection::UnknownCity(city) => {
                        log::debug!("row {}: city '{}' not in vocabulary", idx + 2, city);
                    }
                    Rejection::UnknownCategory { city, category } => {
                        log::debug!(
                            "row {}: category '{}' not in vocabulary for city {}",
                            idx + 2,
                            category,
                            city
                        );
                    }
                }
            }
        }
    }

    log::debug!(
        "analysis: {} accepted, {} rejected, {} cities, period {}/{}",
        analysis.total_categories_found,
        rejected,
        analysis.cities_count,
        analysis.detected_month,
        analysis.detected_year
    );
    analysis
}

/// Lee el archivo y lo agrega. Un libro ilegible aborta todo el análisis.
pub fn analyze_excel_file<P: AsRef<Path>>(
    path: P,
    vocab: &Vocabulary,
    today: NaiveDate,
) -> StatsResult<UploadAnalysis> {
    let sheet = read_first_sheet(path)?;
    Ok(analyze_sheet(&sheet, vocab, today))
}
