use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto_from_rs, Reader};

use tracing::{debug, info};

use crate::table::Grid;

/// Detected file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
}

impl FileFormat {
    /// Detect format from file extension
    fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" => Some(FileFormat::Tsv),
            "xlsx" | "xls" => Some(FileFormat::Excel),
            _ => None,
        }
    }

    /// Parse a `--file-type` value; `auto` means "decide from the extension"
    pub fn parse_arg(s: &str) -> Result<Option<Self>, String> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(None),
            "csv" => Ok(Some(FileFormat::Csv)),
            "tsv" => Ok(Some(FileFormat::Tsv)),
            "excel" | "xlsx" => Ok(Some(FileFormat::Excel)),
            _ => Err(format!(
                "Invalid file type: '{}'. Use auto, csv, tsv or excel.",
                s
            )),
        }
    }

    /// Fixed delimiter of the format, if it has one
    fn delimiter(&self) -> Option<u8> {
        match self {
            FileFormat::Tsv => Some(b'\t'),
            _ => None,
        }
    }
}

/// Pick `;` when it occurs strictly more often than `,`
pub fn guess_delimiter(content: &str) -> u8 {
    let (semi, comma) = content.bytes().fold((0usize, 0usize), |(s, c), b| match b {
        b';' => (s + 1, c),
        b',' => (s, c + 1),
        _ => (s, c),
    });
    if semi > comma {
        b';'
    } else {
        b','
    }
}

/// Human readable delimiter name
pub fn delimiter_name(delimiter: u8) -> String {
    match delimiter {
        b',' => "comma".to_string(),
        b'\t' => "tab".to_string(),
        b';' => "semicolon".to_string(),
        b'|' => "pipe".to_string(),
        c => format!("'{}'", c as char),
    }
}

/// Result of loading a file, including any warnings
pub struct LoadResult {
    pub grid: Grid,
    /// Delimiter used for delimited text, `None` for workbooks
    pub delimiter: Option<u8>,
    pub warnings: Vec<String>,
}

pub struct FileIO {
    pub file_path: PathBuf,
    format: FileFormat,
    delimiter: Option<u8>,
}

impl FileIO {
    /// `format` and `delimiter` override detection when given
    pub fn new(file_path: PathBuf, format: Option<FileFormat>, delimiter: Option<u8>) -> Self {
        let format = format
            .or_else(|| FileFormat::from_extension(&file_path))
            .unwrap_or(FileFormat::Csv);
        Self { file_path, format, delimiter }
    }

    pub fn file_name(&self) -> String {
        self.file_path.display().to_string()
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Read and decode the file into a grid
    pub fn load_table(&self) -> io::Result<LoadResult> {
        match self.format {
            FileFormat::Csv | FileFormat::Tsv => self.read_csv(),
            FileFormat::Excel => self.read_workbook(),
        }
    }

    fn read_csv(&self) -> io::Result<LoadResult> {
        let content = fs::read_to_string(&self.file_path)?;
        let delimiter = self
            .delimiter
            .or_else(|| self.format.delimiter())
            .unwrap_or_else(|| guess_delimiter(&content));

        info!(
            file = %self.file_name(),
            bytes = content.len(),
            delimiter = %delimiter_name(delimiter),
            "loading table"
        );
        parse_grid(&content, delimiter)
    }

    /// Decode the first sheet of an xlsx/xls/ods workbook. The workbook kind
    /// is sniffed from the content, so a forced `excel` type works on any
    /// file name.
    fn read_workbook(&self) -> io::Result<LoadResult> {
        let bytes = fs::read(&self.file_path)?;
        info!(file = %self.file_name(), bytes = bytes.len(), "loading workbook");

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(invalid_data)?;
        let Some(sheet) = workbook.sheet_names().first().cloned() else {
            return Ok(LoadResult {
                grid: Grid::default(),
                delimiter: None,
                warnings: vec!["Workbook has no sheets".to_string()],
            });
        };

        let range = workbook.worksheet_range(&sheet).map_err(invalid_data)?;
        debug!(sheet = %sheet, rows = range.height(), columns = range.width(), "decoding first sheet");

        let records = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        Ok(build_grid(records, None))
    }
}

fn invalid_data(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

/// Decode delimited text into a grid
pub fn parse_grid(content: &str, delimiter: u8) -> io::Result<LoadResult> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let records = csv_reader
        .records()
        .map(|result| result.map(|record| record.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()
        .map_err(invalid_data)?;

    Ok(build_grid(records, Some(delimiter)))
}

/// The first record is the header. Every field loses its surrounding spaces
/// (other whitespace is kept), and rows that do not match the header length
/// are padded or cut so the grid stays rectangular.
fn build_grid(records: Vec<Vec<String>>, delimiter: Option<u8>) -> LoadResult {
    let trim = |record: Vec<String>| -> Vec<String> {
        record
            .into_iter()
            .map(|field| field.trim_matches(' ').to_string())
            .collect()
    };

    let mut records = records.into_iter();
    let Some(header) = records.next() else {
        return LoadResult {
            grid: Grid::default(),
            delimiter,
            warnings: vec!["Empty file".to_string()],
        };
    };

    let columns = trim(header);
    let width = columns.len();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut reshaped = 0usize;

    for record in records {
        let mut row = trim(record);
        if row.len() != width {
            reshaped += 1;
            row.resize(width, String::new());
        }
        rows.push(row);
    }

    let mut warnings = Vec::new();
    if reshaped > 0 {
        warnings.push(format!(
            "Reshaped {} row(s) to {} columns",
            reshaped, width
        ));
    }

    debug!(rows = rows.len(), columns = width, reshaped, "decoded grid");

    LoadResult {
        grid: Grid::new(columns, rows),
        delimiter,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_guess_delimiter() {
        assert_eq!(guess_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(guess_delimiter("a,b,c\n1,2,3"), b',');
        // ties go to comma
        assert_eq!(guess_delimiter("a;b,c"), b',');
        assert_eq!(guess_delimiter(""), b',');
    }

    #[test]
    fn test_parse_arg() {
        assert_eq!(FileFormat::parse_arg("auto"), Ok(None));
        assert_eq!(FileFormat::parse_arg("CSV"), Ok(Some(FileFormat::Csv)));
        assert_eq!(FileFormat::parse_arg("excel"), Ok(Some(FileFormat::Excel)));
        assert!(FileFormat::parse_arg("json").is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileIO::new(PathBuf::from("a.TSV"), None, None).format(), FileFormat::Tsv);
        assert_eq!(FileIO::new(PathBuf::from("a.xlsx"), None, None).format(), FileFormat::Excel);
        assert_eq!(FileIO::new(PathBuf::from("a.xls"), None, None).format(), FileFormat::Excel);
        assert_eq!(FileIO::new(PathBuf::from("data"), None, None).format(), FileFormat::Csv);
        // forced format wins
        assert_eq!(
            FileIO::new(PathBuf::from("a.xlsx"), Some(FileFormat::Csv), None).format(),
            FileFormat::Csv
        );
    }

    #[test]
    fn test_parse_grid_trims_fields() {
        let result = parse_grid("ID , Name\n 1 ,  Ann \n2,Bob\n", b',').unwrap();
        assert_eq!(result.grid.columns(), &["ID".to_string(), "Name".to_string()]);
        assert_eq!(result.grid.row_count(), 2);
        assert_eq!(result.grid.get_cell(0, 1).map(String::as_str), Some("Ann"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_grid_reshapes_ragged_rows() {
        let result = parse_grid("a;b;c\n1;2\n1;2;3;4\n", b';').unwrap();
        let grid = &result.grid;
        assert_eq!(grid.get_row(0).unwrap().len(), 3);
        assert_eq!(grid.get_cell(0, 2).map(String::as_str), Some(""));
        assert_eq!(grid.get_row(1).unwrap().len(), 3);
        assert_eq!(result.warnings, vec!["Reshaped 2 row(s) to 3 columns".to_string()]);
    }

    #[test]
    fn test_parse_grid_quoted_fields() {
        let result = parse_grid("name,quote\nAnn,\"hello, world\"\n", b',').unwrap();
        assert_eq!(result.grid.get_cell(0, 1).map(String::as_str), Some("hello, world"));
    }

    #[test]
    fn test_parse_grid_empty() {
        let result = parse_grid("", b',').unwrap();
        assert_eq!(result.grid.col_count(), 0);
        assert_eq!(result.grid.row_count(), 0);
        assert_eq!(result.warnings, vec!["Empty file".to_string()]);
    }

    #[test]
    fn test_parse_grid_header_only() {
        let result = parse_grid("a,b\n", b',').unwrap();
        assert_eq!(result.grid.col_count(), 2);
        assert_eq!(result.grid.row_count(), 0);
    }

    #[test]
    fn test_load_semicolon_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "x;y\n1;2\n3;4\n").unwrap();

        let io = FileIO::new(file.path().to_path_buf(), None, None);
        let result = io.load_table().unwrap();
        assert_eq!(result.delimiter, Some(b';'));
        assert_eq!(result.grid.row_count(), 2);
        assert_eq!(result.grid.get_cell(1, 1).map(String::as_str), Some("4"));
    }

    #[test]
    fn test_load_explicit_delimiter() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "x|y\n1|2\n").unwrap();

        let io = FileIO::new(file.path().to_path_buf(), None, Some(b'|'));
        let result = io.load_table().unwrap();
        assert_eq!(result.delimiter, Some(b'|'));
        assert_eq!(result.grid.col_count(), 2);
    }

    #[test]
    fn test_load_tsv_uses_tab() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        write!(file, "a\tb;c;d\n1\t2\n").unwrap();

        let io = FileIO::new(file.path().to_path_buf(), None, None);
        let result = io.load_table().unwrap();
        assert_eq!(result.delimiter, Some(b'\t'));
        assert_eq!(result.grid.columns()[1], "b;c;d");
    }

    #[test]
    fn test_load_missing_file() {
        let io = FileIO::new(PathBuf::from("/nonexistent/table.csv"), None, None);
        let err = io.load_table().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_parse_grid_keeps_tabs() {
        let result = parse_grid("a,b\n\t1 , x\t\n", b',').unwrap();
        assert_eq!(result.grid.get_cell(0, 0).map(String::as_str), Some("\t1"));
        assert_eq!(result.grid.get_cell(0, 1).map(String::as_str), Some("x\t"));
    }

    /// Two sheets; only the first one is read
    fn write_workbook(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " ID ").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_number(1, 0, 1).unwrap();
        sheet.write_string(1, 1, "  Ann ").unwrap();
        sheet.write_number(2, 0, 2).unwrap();
        sheet.write_string(2, 1, "Bob").unwrap();
        let other = workbook.add_worksheet();
        other.write_string(0, 0, "ignored").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_load_workbook_first_sheet() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write_workbook(file.path());

        let io = FileIO::new(file.path().to_path_buf(), None, None);
        assert_eq!(io.format(), FileFormat::Excel);
        let result = io.load_table().unwrap();
        assert_eq!(result.delimiter, None);
        assert_eq!(result.grid.columns(), &["ID".to_string(), "Name".to_string()]);
        assert_eq!(result.grid.row_count(), 2);
        assert_eq!(result.grid.get_cell(0, 0).map(String::as_str), Some("1"));
        assert_eq!(result.grid.get_cell(0, 1).map(String::as_str), Some("Ann"));
        assert_eq!(result.grid.get_cell(1, 1).map(String::as_str), Some("Bob"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_load_workbook_forced_type() {
        let file = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
        write_workbook(file.path());

        let io = FileIO::new(file.path().to_path_buf(), Some(FileFormat::Excel), None);
        let result = io.load_table().unwrap();
        assert_eq!(result.grid.col_count(), 2);
        assert_eq!(result.grid.row_count(), 2);
    }

    #[test]
    fn test_load_workbook_invalid_content() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(file, "a,b\n1,2\n").unwrap();

        let io = FileIO::new(file.path().to_path_buf(), None, None);
        let err = io.load_table().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_workbook_missing_file() {
        let io = FileIO::new(PathBuf::from("/nonexistent/book.xlsx"), None, None);
        let err = io.load_table().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_delimiter_name() {
        assert_eq!(delimiter_name(b','), "comma");
        assert_eq!(delimiter_name(b'\t'), "tab");
        assert_eq!(delimiter_name(b'#'), "'#'");
    }
}
