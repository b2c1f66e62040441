use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{StatsError, StatsResult};
use crate::models::MAX_COUNT;

/// Valor de una celda ya tipado, independiente de calamine.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn text(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Representación textual de la celda (recortada).
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(f) => {
                if (f.floor() - f).abs() < f64::EPSILON {
                    format!("{}", *f as i64)
                } else {
                    format!("{}", f)
                }
            }
            CellValue::Bool(b) => format!("{}", b),
            CellValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Interpreta la celda como entero no negativo acotado a `MAX_COUNT`;
    /// vacío o no numérico => None.
    pub fn as_count(&self) -> Option<u64> {
        let f = match self {
            CellValue::Number(f) => *f,
            CellValue::Text(s) => {
                let t = s.trim();
                match t.parse::<i64>() {
                    Ok(i) => i as f64,
                    Err(_) => t.parse::<f64>().ok()?,
                }
            }
            _ => return None,
        };
        if !f.is_finite() {
            return None;
        }
        Some((f.trunc().max(0.0) as u64).min(MAX_COUNT))
    }

    /// Interpreta la celda como fecha (celdas de fecha o texto con formatos conocidos).
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(dt) => Some(dt.date()),
            CellValue::Text(s) => parse_date_text(s),
            _ => None,
        }
    }
}

/// Convierte un `Data` de calamine a `CellValue`.
pub fn cell_from_data(d: &Data) -> CellValue {
    match d {
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Empty,
        Data::Error(_) => CellValue::Empty,
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(parsed) => CellValue::Date(parsed),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_datetime_text(s) {
            Some(parsed) => CellValue::Date(parsed),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Convierte un número de serie de Excel (sistema 1900) a fecha y hora.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    let t = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt);
        }
    }
    parse_date_only(t).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_date_only(t: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
}

/// Parsea una fecha escrita como texto. Primero formatos con hora, luego sólo fecha.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    parse_datetime_text(s).map(|dt| dt.date())
}

/// Una fila del archivo: etiqueta de columna -> valor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye una fila a partir de pares (etiqueta, valor). Útil en tests.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        let mut row = RawRow::new();
        for (label, value) in pairs {
            row.insert(label, value);
        }
        row
    }

    /// Si la etiqueta ya existe se conserva el primer valor.
    pub fn insert(&mut self, label: impl Into<String>, value: CellValue) {
        self.cells.entry(label.into()).or_insert(value);
    }

    /// `Some` si la columna existe en el archivo (aunque la celda esté vacía).
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells.get(label)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

/// Hoja leída: encabezados y filas de datos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    pub fn has_column(&self, label: &str) -> bool {
        self.headers.iter().any(|h| h == label)
    }

    /// Construye la hoja desde filas de celdas; la primera fila son los encabezados.
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut iter = grid.into_iter();
        let headers: Vec<String> = match iter.next() {
            Some(h) => h.iter().map(CellValue::as_text).collect(),
            None => return Sheet::default(),
        };

        let rows = iter
            .map(|cells| {
                let mut row = RawRow::new();
                for (idx, label) in headers.iter().enumerate() {
                    if label.is_empty() {
                        continue;
                    }
                    let value = cells.get(idx).cloned().unwrap_or(CellValue::Empty);
                    row.insert(label.clone(), value);
                }
                row
            })
            .collect();

        Sheet { headers, rows }
    }
}

/// Lee la primera hoja del libro y la devuelve como `Sheet`.
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> StatsResult<Sheet> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).map_err(|e| StatsError::Analysis(e.to_string()))?;

    let names = workbook.sheet_names().to_owned();
    let first = names
        .first()
        .cloned()
        .ok_or_else(|| StatsError::Analysis("الملف لا يحتوي على أوراق".to_string()))?;

    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| StatsError::Analysis(e.to_string()))?;

    let grid: Vec<Vec<CellValue>> = range
        .rows()
        .map(|r| r.iter().map(cell_from_data).collect())
        .collect();

    log::debug!(
        "read sheet '{}' from {}: {} grid rows",
        first,
        path.display(),
        grid.len()
    );

    Ok(Sheet::from_grid(grid))
}
