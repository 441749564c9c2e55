// CSV/TSV report import

use std::io::Read;
use std::path::Path;

use salesq_engine::{LoadError, Table};

use crate::headers::RawHeader;
use crate::report::{build_table, LoadOptions, RawCell};

pub fn load(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    load_from_string(path, &content, delimiter, options)
}

pub fn load_tsv(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let content = read_file_as_utf8(path)?;
    load_from_string(path, &content, b'\t', options)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // More consistent lines first, then more columns
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (Excel-exported CSVs are often Windows-1252)
fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let io_err = |e: std::io::Error| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    if bytes.starts_with(b"\xEF\xBB\xBF") {
        bytes.drain(..3);
    }

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn load_from_string(
    path: &Path,
    content: &str,
    delimiter: u8,
    options: &LoadOptions,
) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Vec<RawHeader> = Vec::new();
    let mut rows: Vec<Vec<RawCell>> = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::Csv {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        if row_idx == 0 {
            header = record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        RawHeader::Missing
                    } else {
                        RawHeader::Text(field.to_string())
                    }
                })
                .collect();
        } else {
            rows.push(record.iter().map(|field| RawCell::Text(field.to_string())).collect());
        }
    }

    build_table(path, &header, rows, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesq_engine::CellValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_load_csv_report() {
        let file = write_temp(
            ".csv",
            b"Product Name,2021-07-01,2021-08-01\nPC-1000,10.5,20.25\nPC-1000-X,1,2\n",
        );
        let table = load(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(table.columns(), &["2021-07".to_string(), "2021-08".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].product_name, "PC-1000");
        assert_eq!(table.rows()[0].total(), 30.75);
    }

    #[test]
    fn test_semicolon_report_with_blank_and_duplicate_headers() {
        let file = write_temp(".csv", b"Product Name;Sales;Sales;\nA;1;2;3\n");
        let table = load(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(
            table.columns(),
            &["Sales".to_string(), "Sales_1".to_string(), "unnamed".to_string()]
        );
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "Café" in Windows-1252
        let file = write_temp(".csv", b"Product Name,2021-07\nCaf\xe9,5\n");
        let table = load(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.rows()[0].product_name, "Caf\u{e9}");
    }

    #[test]
    fn test_utf8_bom_is_ignored() {
        let file = write_temp(".csv", b"\xEF\xBB\xBFProduct Name,2021-07\nA,5\n");
        let table = load(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.product_column(), "Product Name");
    }

    #[test]
    fn test_thousands_separators_are_numbers() {
        let file = write_temp(".tsv", b"Product Name\t2021-07\nA\t\"1,200\"\n");
        let table = load_tsv(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.rows()[0].values[0], CellValue::Number(1200.0));
    }

    #[test]
    fn test_product_names_keep_their_text() {
        let file = write_temp(".csv", b"Product Name,2021-07\n00123,5\n1e3,7\n");
        let table = load(file.path(), &LoadOptions::default()).unwrap();

        assert_eq!(table.rows()[0].product_name, "00123");
        assert_eq!(table.rows()[1].product_name, "1e3");
        assert_eq!(table.rows()[1].values[0], CellValue::Number(7.0));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let file = write_temp(".csv", b"");
        let err = load(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoHeader(_)));
    }
}
