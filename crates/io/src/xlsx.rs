// Excel report import (xlsx, xlsm, xlsb, xls, ods) via calamine

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use salesq_engine::{CellValue, LoadError, Table};
use tracing::warn;

use crate::headers::RawHeader;
use crate::report::{build_table, LoadOptions, RawCell};

/// Load the configured worksheet, or the first one when it does not exist.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let spreadsheet_err = |message: String| LoadError::Spreadsheet {
        path: path.display().to_string(),
        message,
    };

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| spreadsheet_err(format!("failed to open: {}", e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = if sheet_names.iter().any(|n| n == &options.sheet) {
        options.sheet.clone()
    } else {
        let first = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| spreadsheet_err("workbook contains no sheets".to_string()))?;
        warn!(wanted = %options.sheet, using = %first, "sheet not found, reading first sheet");
        first
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| spreadsheet_err(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let header: Vec<RawHeader> = match rows.next() {
        Some(first) => first.iter().map(header_cell).collect(),
        None => Vec::new(),
    };
    let data: Vec<Vec<RawCell>> = rows.map(|row| row.iter().map(raw_cell).collect()).collect();

    build_table(path, &header, data, options)
}

fn header_cell(cell: &Data) -> RawHeader {
    match cell {
        Data::Empty => RawHeader::Missing,
        Data::DateTime(dt) => RawHeader::DateSerial(dt.as_f64()),
        Data::String(s) if s.trim().is_empty() => RawHeader::Missing,
        Data::String(s) => RawHeader::Text(s.clone()),
        other => match data_cell(other) {
            CellValue::Empty => RawHeader::Missing,
            value => RawHeader::Text(value.raw_display()),
        },
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::String(s) => RawCell::Text(s.clone()),
        other => RawCell::Value(data_cell(other)),
    }
}

fn data_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_input(s),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        // Assumes the 1900 date system
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Format, Workbook};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_report(dir: &TempDir, sheet: &str) -> PathBuf {
        let path = dir.path().join("Sales Report.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();

        let date = Format::new().set_num_format("yyyy-mm-dd");
        worksheet.write_string(0, 0, "Product Name").unwrap();
        // 2021-07-01 as a real date cell
        worksheet.write_number_with_format(0, 1, 44378.0, &date).unwrap();
        worksheet.write_string(0, 2, "2021-08-01 00:00:00").unwrap();
        worksheet.write_string(0, 3, "Notes").unwrap();

        worksheet.write_string(1, 0, "PC-1000").unwrap();
        worksheet.write_number(1, 1, 10.5).unwrap();
        worksheet.write_number(1, 2, 20.25).unwrap();
        worksheet.write_string(1, 3, "steady").unwrap();

        worksheet.write_string(2, 0, "Casement").unwrap();
        worksheet.write_number(2, 1, 40).unwrap();
        worksheet.write_string(2, 3, "new").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_xlsx_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "Sheet1");
        let table = load(&path, &LoadOptions::default()).unwrap();

        assert_eq!(
            table.columns(),
            &["2021-07".to_string(), "2021-08".to_string(), "Notes".to_string()]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].product_name, "PC-1000");
        assert_eq!(table.rows()[0].total(), 30.75);
        assert_eq!(table.rows()[1].values[1], CellValue::Empty);
        assert_eq!(table.rows()[1].values[2], CellValue::Text("new".into()));
    }

    #[test]
    fn test_falls_back_to_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&dir, "Q3");
        let table = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_not_a_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet { .. }));
    }

    #[test]
    fn test_data_cell_conversion() {
        assert_eq!(data_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(data_cell(&Data::String("1,200".into())), CellValue::Number(1200.0));
        assert_eq!(data_cell(&Data::Bool(true)), CellValue::Text("TRUE".into()));
        assert_eq!(data_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_string_cells_stay_raw() {
        assert_eq!(raw_cell(&Data::String("00123".into())), RawCell::Text("00123".into()));
        assert_eq!(raw_cell(&Data::Float(5.0)), RawCell::Value(CellValue::Number(5.0)));
    }

    #[test]
    fn test_numeric_header_becomes_text() {
        assert_eq!(header_cell(&Data::Float(2021.0)), RawHeader::Text("2021".into()));
        assert_eq!(header_cell(&Data::String("   ".into())), RawHeader::Missing);
        assert_eq!(header_cell(&Data::String("007".into())), RawHeader::Text("007".into()));
    }
}
