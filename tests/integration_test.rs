//! Integration Tests for xlsretro
//!
//! End-to-end conversions: in-memory workbooks, delimited files, and XLSX
//! fixtures generated with rust_xlsxwriter, checked by re-parsing the output
//! with quick-xml.

use quick_xml::events::Event;
use quick_xml::Reader;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};
use std::fs;
use std::io::Cursor;
use xlsretro::{
    read_xlsx, CellValue, ConverterBuilder, Sheet, SheetSelector, Workbook, XlsRetroError,
};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Generate a workbook with a header row and typed data rows
    pub fn generate_typed_table() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Typed")?;

        // Header row (the numeric header must come back as a string)
        worksheet.write_string(0, 0, "Name")?;
        worksheet.write_number(0, 1, 2024.0)?;
        worksheet.write_string(0, 2, "Active")?;

        // Data rows
        worksheet.write_string(1, 0, "x")?;
        worksheet.write_number(1, 1, 1.5)?;
        worksheet.write_boolean(1, 2, true)?;

        worksheet.write_string(2, 0, "y")?;
        worksheet.write_number(2, 1, 2.0)?;
        worksheet.write_boolean(2, 2, false)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a workbook with 3 sheets, the middle one empty
    pub fn generate_multi_sheets() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = XlsxWorkbook::new();

        let sheet1 = workbook.add_worksheet();
        sheet1.set_name("First")?;
        sheet1.write_string(0, 0, "H1")?;
        sheet1.write_string(1, 0, "First_Data")?;

        let sheet2 = workbook.add_worksheet();
        sheet2.set_name("Blank")?;

        let sheet3 = workbook.add_worksheet();
        sheet3.set_name("Third")?;
        sheet3.write_string(0, 0, "H3")?;
        sheet3.write_string(1, 0, "Third_Data")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a sheet whose used range starts at B3
    pub fn generate_offset_range() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(2, 1, "x")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a sheet whose header row holds booleans
    pub fn generate_boolean_header() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_boolean(0, 0, true)?;
        worksheet.write_boolean(0, 1, false)?;
        worksheet.write_boolean(1, 0, true)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a sheet with a date-formatted cell
    pub fn generate_dates() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "Date")?;
        // 45981 = 2025-11-20
        worksheet.write_number_with_format(1, 0, 45981.0, &date_format)?;

        Ok(workbook.save_to_buffer()?)
    }
}

/// 出力文書を読み戻したセル（Noneは空セル）
type ParsedCell = Option<(String, String)>;

#[derive(Debug, Default)]
struct ParsedSheet {
    name: String,
    rows: Vec<Vec<ParsedCell>>,
}

/// Parse a SpreadsheetML document with quick-xml, failing on malformed XML
fn parse_document(xml: &str) -> Vec<ParsedSheet> {
    let mut reader = Reader::from_str(xml);
    let mut sheets: Vec<ParsedSheet> = Vec::new();
    let mut in_data = false;

    loop {
        match reader.read_event().expect("output must be well-formed XML") {
            Event::Start(e) => match e.name().as_ref() {
                b"Worksheet" => {
                    let name = e
                        .try_get_attribute("ss:Name")
                        .unwrap()
                        .expect("Worksheet must carry ss:Name")
                        .decode_and_unescape_value(&reader)
                        .unwrap()
                        .into_owned();
                    sheets.push(ParsedSheet {
                        name,
                        rows: Vec::new(),
                    });
                }
                b"Row" => sheets.last_mut().unwrap().rows.push(Vec::new()),
                b"Cell" => sheets
                    .last_mut()
                    .unwrap()
                    .rows
                    .last_mut()
                    .unwrap()
                    .push(None),
                b"Data" => {
                    let kind = e
                        .try_get_attribute("ss:Type")
                        .unwrap()
                        .expect("Data must carry ss:Type")
                        .decode_and_unescape_value(&reader)
                        .unwrap()
                        .into_owned();
                    let cell = sheets
                        .last_mut()
                        .unwrap()
                        .rows
                        .last_mut()
                        .unwrap()
                        .last_mut()
                        .unwrap();
                    *cell = Some((kind, String::new()));
                    in_data = true;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"Cell" => sheets
                    .last_mut()
                    .unwrap()
                    .rows
                    .last_mut()
                    .unwrap()
                    .push(None),
                b"Row" => sheets.last_mut().unwrap().rows.push(Vec::new()),
                _ => {}
            },
            Event::Text(t) if in_data => {
                let text = t.unescape().unwrap();
                if let Some(Some((_, content))) = sheets
                    .last_mut()
                    .and_then(|s| s.rows.last_mut())
                    .and_then(|r| r.last_mut())
                {
                    content.push_str(&text);
                }
            }
            Event::End(e) if e.name().as_ref() == b"Data" => in_data = false,
            Event::Eof => break,
            _ => {}
        }
    }

    sheets
}

fn cell(kind: &str, text: &str) -> ParsedCell {
    Some((kind.to_string(), text.to_string()))
}

fn to_xml(workbook: &Workbook) -> String {
    let converter = ConverterBuilder::new().build().unwrap();
    String::from_utf8(converter.to_bytes(workbook).unwrap()).unwrap()
}

fn demo_workbook() -> Workbook {
    Workbook::from(Sheet::from_rows(
        "Demo",
        ["A", "B"],
        vec![
            vec![CellValue::from("x"), CellValue::from(1)],
            vec![CellValue::from("y"), CellValue::from(2)],
        ],
    ))
}

#[test]
fn test_end_to_end_demo_sheet() {
    let xml = to_xml(&demo_workbook());

    assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<?mso-application progid=\"Excel.Sheet\"?>\n"));

    let sheets = parse_document(&xml);
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].name, "Demo");
    assert_eq!(
        sheets[0].rows,
        vec![
            vec![cell("String", "A"), cell("String", "B")],
            vec![cell("String", "x"), cell("Number", "1")],
            vec![cell("String", "y"), cell("Number", "2")],
        ]
    );
}

#[test]
fn test_workbook_root_and_default_style() {
    let xml = to_xml(&demo_workbook());

    assert!(xml.contains("<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\""));
    assert!(xml.contains("xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\""));
    assert!(xml.contains("xmlns:html=\"http://www.w3.org/TR/REC-html40\""));
    assert!(xml.contains("<Style ss:ID=\"Default\"/>"));
    // Stylesは最初のWorksheetより前
    assert!(xml.find("<Styles>").unwrap() < xml.find("<Worksheet").unwrap());
}

#[test]
fn test_typed_cells_round_trip() {
    let sheet = Sheet::from_rows(
        "Types",
        Vec::<String>::new(),
        vec![vec![
            CellValue::Float(1.1),
            CellValue::Bool(true),
            CellValue::Bool(false),
            CellValue::Null,
            CellValue::Int(-7),
        ]],
    );
    let sheets = parse_document(&to_xml(&Workbook::from(sheet)));

    assert_eq!(
        sheets[0].rows,
        vec![vec![
            cell("Number", "1.1"),
            cell("Boolean", "1"),
            cell("Boolean", "0"),
            None,
            cell("Number", "-7"),
        ]]
    );
}

#[test]
fn test_null_cell_is_self_closed() {
    let sheet = Sheet::from_rows("S", ["H"], vec![vec![CellValue::Null]]);
    let xml = to_xml(&Workbook::from(sheet));

    assert!(xml.contains("<Cell/>"));
    assert_eq!(xml.matches("<Data").count(), 1); // header only
}

#[test]
fn test_special_characters_are_escaped() {
    let sheet = Sheet::from_rows(
        "R&D <\"Q1\">",
        ["a<b"],
        vec![vec![CellValue::from("Tom & \"Jerry\" <tag>")]],
    );
    let xml = to_xml(&Workbook::from(sheet));

    assert!(!xml.contains("<tag>"));
    let sheets = parse_document(&xml);
    assert_eq!(sheets[0].name, "R&D <\"Q1\">");
    assert_eq!(
        sheets[0].rows,
        vec![
            vec![cell("String", "a<b")],
            vec![cell("String", "Tom & \"Jerry\" <tag>")],
        ]
    );
}

#[test]
fn test_multiple_sheets_keep_order() {
    let workbook = Workbook::from(vec![Sheet::new("B"), Sheet::new("A"), Sheet::new("B")]);
    let names: Vec<String> = parse_document(&to_xml(&workbook))
        .into_iter()
        .map(|s| s.name)
        .collect();

    // 重複した名前もそのまま出力する
    assert_eq!(names, vec!["B", "A", "B"]);
}

#[test]
fn test_write_file_overwrites_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xls");
    fs::write(&path, "stale content that is much longer than nothing".repeat(1000)).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let workbook = demo_workbook();
    converter.write_file(&path, &workbook).unwrap();

    let written = fs::read(&path).unwrap();
    assert_eq!(written, converter.to_bytes(&workbook).unwrap());
}

#[test]
fn test_convert_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("payments.CSV");
    fs::write(&input, "AccountNo,Amount\n1234567890,1200.50\n").unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let xml = String::from_utf8(converter.convert_path_to_bytes(&input).unwrap()).unwrap();
    let sheets = parse_document(&xml);

    assert_eq!(sheets[0].name, "Sheet1");
    // 区切り文字形式の値はすべて文字列
    assert_eq!(
        sheets[0].rows,
        vec![
            vec![cell("String", "AccountNo"), cell("String", "Amount")],
            vec![cell("String", "1234567890"), cell("String", "1200.50")],
        ]
    );
}

#[test]
fn test_convert_tsv_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.tsv");
    let output = dir.path().join("data.xls");
    fs::write(&input, "A\tB\nx,1\t2\n").unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    converter.convert_path_to_file(&input, &output).unwrap();

    let sheets = parse_document(&fs::read_to_string(&output).unwrap());
    assert_eq!(
        sheets[0].rows[1],
        vec![cell("String", "x,1"), cell("String", "2")]
    );
}

#[test]
fn test_convert_unsupported_extension() {
    let converter = ConverterBuilder::new().build().unwrap();

    match converter.convert_path_to_bytes("legacy.xls") {
        Err(err @ XlsRetroError::UnsupportedFormat(_)) => {
            assert_eq!(err.to_string(), "unsupported input format: .xls");
        }
        other => panic!("Expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn test_xlsx_typed_table() {
    let data = fixtures::generate_typed_table().unwrap();
    let workbook = read_xlsx(Cursor::new(data)).unwrap();

    assert_eq!(workbook.len(), 1);
    let sheet = &workbook.sheets()[0];
    assert_eq!(sheet.name, "Typed");
    assert_eq!(sheet.headers, vec!["Name", "2024", "Active"]);
    assert_eq!(sheet.rows.len(), 2);

    let sheets = parse_document(&to_xml(&workbook));
    assert_eq!(
        sheets[0].rows,
        vec![
            vec![cell("String", "Name"), cell("String", "2024"), cell("String", "Active")],
            vec![cell("String", "x"), cell("Number", "1.5"), cell("Boolean", "1")],
            vec![cell("String", "y"), cell("Number", "2"), cell("Boolean", "0")],
        ]
    );
}

#[test]
fn test_xlsx_multi_sheets_and_empty_sheet() {
    let data = fixtures::generate_multi_sheets().unwrap();
    let workbook = read_xlsx(Cursor::new(data)).unwrap();

    let names: Vec<&str> = workbook.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Blank", "Third"]);

    let blank = &workbook.sheets()[1];
    assert!(blank.headers.is_empty());
    assert!(blank.rows.is_empty());

    let xml = to_xml(&workbook);
    assert!(xml.contains("<Worksheet ss:Name=\"Blank\">"));
    assert!(xml.contains("Third_Data"));
}

#[test]
fn test_xlsx_sheet_selector_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("multi.xlsx");
    fs::write(&input, fixtures::generate_multi_sheets().unwrap()).unwrap();

    let converter = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Names(vec![
            "Third".to_string(),
            "First".to_string(),
        ]))
        .build()
        .unwrap();
    let sheets = parse_document(
        &String::from_utf8(converter.convert_xlsx_to_bytes(&input).unwrap()).unwrap(),
    );

    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Third", "First"]);
}

#[test]
fn test_xlsx_sheet_selector_unknown_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("multi.xlsx");
    fs::write(&input, fixtures::generate_multi_sheets().unwrap()).unwrap();

    let converter = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("Missing".to_string()))
        .build()
        .unwrap();

    assert!(matches!(
        converter.read_path(&input),
        Err(XlsRetroError::Config(_))
    ));
}

#[test]
fn test_xlsx_offset_range_keeps_positions() {
    let data = fixtures::generate_offset_range().unwrap();
    let workbook = read_xlsx(Cursor::new(data)).unwrap();
    let sheet = &workbook.sheets()[0];

    // 先頭の空行がヘッダーになるためヘッダーは空
    assert!(sheet.headers.is_empty());
    assert_eq!(
        sheet.rows,
        vec![
            Vec::new(),
            vec![CellValue::Null, CellValue::String("x".to_string())],
        ]
    );
}

#[test]
fn test_xlsx_blank_first_row_shifts_data_rows_up() {
    let data = fixtures::generate_offset_range().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();
    let workbook = read_xlsx(Cursor::new(data)).unwrap();
    let xml = String::from_utf8(converter.to_bytes(&workbook).unwrap()).unwrap();
    let sheets = parse_document(&xml);

    // 元のシートではB3だが、空の先頭行がヘッダーとして消費され2行目に出力される
    assert_eq!(sheets[0].rows.len(), 2);
    assert!(sheets[0].rows[0].is_empty());
    assert_eq!(
        sheets[0].rows[1],
        vec![None, Some(("String".to_string(), "x".to_string()))]
    );
}

#[test]
fn test_xlsx_boolean_headers_are_upper_case() {
    let data = fixtures::generate_boolean_header().unwrap();
    let workbook = read_xlsx(Cursor::new(data)).unwrap();
    let sheet = &workbook.sheets()[0];

    assert_eq!(sheet.headers, vec!["TRUE", "FALSE"]);
    assert_eq!(sheet.rows, vec![vec![CellValue::Bool(true)]]);
}

#[test]
fn test_xlsx_dates_become_iso_strings() {
    let data = fixtures::generate_dates().unwrap();
    let workbook = read_xlsx(Cursor::new(data)).unwrap();

    assert_eq!(
        workbook.sheets()[0].rows,
        vec![vec![CellValue::String("2025-11-20".to_string())]]
    );
}

#[test]
fn test_xlsx_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("typed.xlsx");
    let output = dir.path().join("typed.xls");
    fs::write(&input, fixtures::generate_typed_table().unwrap()).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    converter.convert_xlsx_to_file(&input, &output).unwrap();

    let sheets = parse_document(&fs::read_to_string(&output).unwrap());
    assert_eq!(sheets[0].name, "Typed");
    assert_eq!(sheets[0].rows.len(), 3);
}

#[test]
fn test_corrupt_xlsx_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.xlsx");
    fs::write(&input, b"PK\x03\x04 definitely not a workbook").unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    assert!(matches!(
        converter.convert_path_to_bytes(&input),
        Err(XlsRetroError::Parse(_))
    ));
}
