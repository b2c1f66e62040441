//! Detección del periodo (mes, año) de un archivo por mayoría sobre las
//! fechas de inicio.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::excel::io::{CellValue, Sheet};
use crate::excel::normalizer::START_DATE_COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    pub month: u32,
    pub year: i32,
}

impl ReportingPeriod {
    pub fn from_date(date: NaiveDate) -> Self {
        ReportingPeriod {
            month: date.month(),
            year: date.year(),
        }
    }
}

/// Valor más frecuente; en empate gana el que apareció primero.
fn most_frequent<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|(k, _)| *k == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (v, n) in counts {
        match best {
            Some((_, bn)) if bn >= n => {}
            _ => best = Some((v, n)),
        }
    }
    best.map(|(v, _)| v)
}

/// Mes y año más frecuentes entre las fechas reconocibles. Si ninguna celda es
/// una fecha válida se usa `today`.
pub fn detect_period<'a, I>(start_dates: I, today: NaiveDate) -> ReportingPeriod
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let dates: Vec<NaiveDate> = start_dates
        .into_iter()
        .filter_map(CellValue::as_date)
        .collect();

    if dates.is_empty() {
        log::debug!("no parseable start dates, falling back to {}", today);
        return ReportingPeriod::from_date(today);
    }

    let month = most_frequent(dates.iter().map(|d| d.month())).unwrap_or(today.month());
    let year = most_frequent(dates.iter().map(|d| d.year())).unwrap_or(today.year());
    ReportingPeriod { month, year }
}

/// Detecta el periodo de una hoja usando la primera columna de fecha de inicio
/// presente. Sin columna => `today`.
pub fn detect_sheet_period(sheet: &Sheet, today: NaiveDate) -> ReportingPeriod {
    let column = START_DATE_COLUMNS.iter().find(|label| sheet.has_column(label));
    match column {
        Some(label) => detect_period(sheet.rows.iter().filter_map(|r| r.get(label)), today),
        None => {
            log::debug!("start date column not found, using current period");
            ReportingPeriod::from_date(today)
        }
    }
}
