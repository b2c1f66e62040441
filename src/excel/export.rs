use std::io::Cursor;

use crate::error::{StatsError, StatsResult};
use crate::models::{ExportRow, StatisticsRecord};

/// Nombre de la hoja del archivo exportado.
pub const EXPORT_SHEET_NAME: &str = "Statistics";

pub const EXPORT_HEADERS: [&str; 6] = [
    "رقم الفرصة التطوعية",
    "قائد الفرصة",
    "اسم الفرصة التطوعية",
    "تاريخ البداية",
    "تاريخ النهاية",
    "اجمالي عدد المتطوعين",
];

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Aplana los detalles de los registros en filas, en orden de registro, ciudad
/// y detalle. Una ciudad vacía o `None` no filtra.
pub fn project_export(records: &[StatisticsRecord], city: Option<&str>) -> Vec<ExportRow> {
    let city = city.map(str::trim).filter(|c| !c.is_empty());
    let mut out = Vec::new();

    for record in records {
        if record.data.is_empty() {
            log::debug!("record {} has no data", record.id);
            continue;
        }
        for (city_name, aggregate) in record.data.iter() {
            if let Some(wanted) = city {
                if city_name != wanted {
                    continue;
                }
            }
            out.extend(aggregate.details.iter().map(|detail| ExportRow {
                opportunity_number: detail.opportunity_number.clone(),
                opportunity_leader: detail.opportunity_leader.clone(),
                opportunity_name: detail.opportunity_name.clone(),
                start_date: detail.start_date.clone(),
                end_date: detail.end_date.clone(),
                volunteers: detail.volunteers,
            }));
        }
    }
    out
}

/// Escribe las filas a un libro xlsx en memoria.
pub fn write_export_workbook(rows: &[ExportRow]) -> StatsResult<Vec<u8>> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| StatsError::Export("workbook without sheets".to_string()))?;
    sheet.set_name(EXPORT_SHEET_NAME);

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        sheet.get_cell_mut((col as u32 + 1, 1)).set_value(*header);
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 2;
        sheet.get_cell_mut((1, r)).set_value(row.opportunity_number.as_str());
        sheet.get_cell_mut((2, r)).set_value(row.opportunity_leader.as_str());
        sheet.get_cell_mut((3, r)).set_value(row.opportunity_name.as_str());
        sheet.get_cell_mut((4, r)).set_value(row.start_date.as_str());
        sheet.get_cell_mut((5, r)).set_value(row.end_date.as_str());
        sheet.get_cell_mut((6, r)).set_value_number(row.volunteers as f64);
    }

    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer)
        .map_err(|e| StatsError::Export(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Nombre del archivo descargado, con los filtros incluidos.
pub fn export_filename(city: Option<&str>, month: u32, year: i32) -> String {
    format!("statistics_{}_{}_{}.xlsx", city.unwrap_or_default(), year, month)
}
