#![allow(dead_code)]

use std::io::Cursor;

/// (ciudad, tipo, voluntarios, voluntarias, número, fecha de inicio)
pub type FixtureRow<'a> = (&'a str, &'a str, f64, f64, &'a str, &'a str);

/// Libro xlsx con encabezados en inglés y tres filas (una rechazada).
pub fn workbook_bytes() -> Vec<u8> {
    workbook_from_rows(&[
        ("العلا", "Environment", 3.0, 2.0, "OP-1", "2024-05-02"),
        ("العلا", "Environment", 1.0, 0.0, "OP-2", "2024-05-20"),
        ("Riyadh", "Environment", 9.0, 9.0, "OP-3", "2024-06-01"),
    ])
}

pub fn workbook_from_rows(rows: &[FixtureRow<'_>]) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    let headers = [
        "City / Province",
        "Opportunity Type",
        "عدد المتطوعين",
        "عدد المتطوعات",
        "Volunteer Opportunity Number",
        "Start Date",
    ];
    for (i, h) in headers.iter().enumerate() {
        sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*h);
    }
    for (idx, (city, cat, m, f, num, start)) in rows.iter().enumerate() {
        let r = idx as u32 + 2;
        sheet.get_cell_mut((1, r)).set_value(*city);
        sheet.get_cell_mut((2, r)).set_value(*cat);
        sheet.get_cell_mut((3, r)).set_value_number(*m);
        sheet.get_cell_mut((4, r)).set_value_number(*f);
        sheet.get_cell_mut((5, r)).set_value(*num);
        sheet.get_cell_mut((6, r)).set_value(*start);
    }
    let mut out = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out).unwrap();
    out.into_inner()
}
