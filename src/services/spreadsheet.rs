//! Spreadsheet reading and writing for the vehicle importer
//!
//! Rows are read positionally from the first worksheet: the first row is the
//! header and is never interpreted. The same column order is used to build
//! the downloadable template.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use thiserror::Error;

use crate::utils::localization::Language;

/// File extensions accepted by the importer
pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Number of positional columns in an import file
pub const IMPORT_COLUMNS: usize = 6;

pub const TEMPLATE_FILE_NAME: &str = "vehicle_import_template.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADERS_EN: [&str; IMPORT_COLUMNS] = [
    "Make",
    "Model",
    "Year",
    "Engine Capacity",
    "Registration Number",
    "Chassis Number",
];

const HEADERS_AR: [&str; IMPORT_COLUMNS] = [
    "الماركة",
    "الموديل",
    "سنة الصنع",
    "سعة المحرك",
    "رقم التسجيل",
    "رقم الشاصي",
];

const EXAMPLE_ROW: [&str; IMPORT_COLUMNS] = [
    "Toyota",
    "Camry",
    "2023",
    "2.5",
    "ABC-1234",
    "JT123456789012345",
];

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("workbook contains no worksheet")]
    NoWorksheet,

    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

/// One data row of an import file, as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    /// 1-based position after the header row
    pub row_number: usize,
    pub make: String,
    pub model: String,
    pub year: String,
    pub engine_capacity: String,
    pub registration_number: String,
    pub chassis_number: String,
}

impl ImportRow {
    fn from_cells(row_number: usize, cells: &[Data]) -> Self {
        let cell = |index: usize| cells.get(index).map(cell_text).unwrap_or_default();

        Self {
            row_number,
            make: cell(0),
            model: cell(1),
            year: cell(2),
            engine_capacity: cell(3),
            registration_number: cell(4),
            chassis_number: cell(5),
        }
    }

    /// Separator rows have neither make nor model.
    pub fn is_separator(&self) -> bool {
        self.make.trim().is_empty() && self.model.trim().is_empty()
    }

    fn is_empty(&self) -> bool {
        [
            &self.make,
            &self.model,
            &self.year,
            &self.engine_capacity,
            &self.registration_number,
            &self.chassis_number,
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }
}

/// Whether the uploaded file name carries a spreadsheet extension.
pub fn is_spreadsheet_file_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .map_or(false, |ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
}

/// Read the data rows of the first worksheet. Trailing rows with no content
/// at all are dropped, so a header-only sheet yields no rows.
pub fn read_import_rows(bytes: &[u8]) -> Result<Vec<ImportRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    let mut rows: Vec<ImportRow> = range
        .rows()
        .skip(1)
        .enumerate()
        .map(|(index, cells)| ImportRow::from_cells(index + 1, cells))
        .collect();

    while rows.last().map_or(false, ImportRow::is_empty) {
        rows.pop();
    }

    Ok(rows)
}

/// Text of a cell as a user would read it. Whole floats lose their `.0`
/// so that a numeric `2023` cell reads as `2023`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        other => other.to_string(),
    }
}

/// Column headers in the given language.
pub fn column_headers(lang: Language) -> [&'static str; IMPORT_COLUMNS] {
    match lang {
        Language::English => HEADERS_EN,
        Language::Arabic => HEADERS_AR,
    }
}

/// Build the import template: localized headers and one example row.
pub fn build_import_template(lang: Language) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Vehicles")?;
    if lang.is_rtl() {
        worksheet.set_right_to_left(true);
    }

    for (col, header) in column_headers(lang).iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, 22)?;
    }

    for (col, value) in EXAMPLE_ROW.iter().enumerate() {
        let col = col as u16;
        match value.parse::<f64>() {
            Ok(number) => worksheet.write_number(1, col, number)?,
            Err(_) => worksheet.write_string(1, col, *value)?,
        };
    }

    Ok(workbook.save_to_buffer()?)
}
