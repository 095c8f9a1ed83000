//! End-to-end decoding of workbooks built in memory.
//!
//! Small fixtures are assembled byte by byte as stored entries; larger ones
//! are written with the `zip` crate so that the DEFLATE streams come from a
//! real encoder.

use rawsheet::{decode, decode_file, list_sheets, read_table, DecodeOptions, Error, SheetSelector};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#;

/// Concatenate stored local file entries without a central directory.
fn stored_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, payload) in entries {
        out.extend_from_slice(b"PK\x03\x04");
        out.extend_from_slice(&20u16.to_le_bytes()); // version needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&0u16.to_le_bytes()); // stored
        out.extend_from_slice(&[0; 8]); // time, date, crc
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(payload.as_bytes());
    }
    out
}

/// Write a complete archive with the `zip` crate.
fn zip_archive(entries: &[(&str, String)], method: CompressionMethod) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(method);

    for (name, payload) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(payload.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buffer
}

/// A worksheet of `rows` rows: a shared-string label, a number and a boolean.
fn generated_sheet(rows: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for r in 1..=rows {
        xml.push_str(&format!(
            r#"<row r="{r}"><c r="A{r}" t="s"><v>{}</v></c><c r="B{r}"><v>{}</v></c><c r="C{r}" t="b"><v>{}</v></c></row>"#,
            r % 3,
            r * 7,
            r % 2
        ));
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn generated_workbook(rows: usize, method: CompressionMethod) -> Vec<u8> {
    zip_archive(
        &[
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            (
                "xl/workbook.xml",
                r#"<workbook><sheets><sheet name="Data" sheetId="1" r:id="rId1"/><sheet name="Notes" sheetId="2" r:id="rId2"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<Relationships><Relationship Id="rId1" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Target="worksheets/sheet2.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/sharedStrings.xml",
                "<sst><si><t>zero</t></si><si><t>one</t></si><si><t>two</t></si></sst>".to_string(),
            ),
            ("xl/worksheets/sheet1.xml", generated_sheet(rows)),
            (
                "xl/worksheets/sheet2.xml",
                r#"<worksheet><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>note</t></is></c></row></sheetData></worksheet>"#.to_string(),
            ),
        ],
        method,
    )
}

#[test]
fn test_shared_string_at_b2() {
    let data = stored_archive(&[
        ("xl/sharedStrings.xml", "<sst><si><t>hi</t></si></sst>"),
        (
            "xl/worksheets/sheet1.xml",
            r#"<worksheet><sheetData><row r="2"><c r="B2" t="s"><v>0</v></c></row></sheetData></worksheet>"#,
        ),
    ]);

    let matrix = decode(&data, &DecodeOptions::default()).unwrap();
    assert_eq!(matrix.rows, vec![vec!["", ""], vec!["", "hi"]]);
}

#[test]
fn test_decode_is_idempotent() {
    let data = generated_workbook(50, CompressionMethod::Deflated);
    let options = DecodeOptions::default();

    let first = decode(&data, &options).unwrap();
    let second = decode(&data, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_deflated_workbook() {
    // Large enough for the encoder to emit dynamic Huffman blocks.
    let data = generated_workbook(2000, CompressionMethod::Deflated);

    let matrix = decode(&data, &DecodeOptions::default()).unwrap();
    assert_eq!(matrix.height(), 2000);
    assert_eq!(matrix.width(), 3);
    assert_eq!(matrix.rows[0], vec!["one", "7", "1"]);
    assert_eq!(matrix.rows[1], vec!["two", "14", "0"]);
    assert_eq!(matrix.rows[1999], vec!["two", "14000", "0"]);
}

#[test]
fn test_stored_and_deflated_agree() {
    let stored = decode(
        &generated_workbook(300, CompressionMethod::Stored),
        &DecodeOptions::default(),
    )
    .unwrap();
    let deflated = decode(
        &generated_workbook(300, CompressionMethod::Deflated),
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(stored, deflated);
}

#[test]
fn test_sheet_selection() {
    let data = generated_workbook(3, CompressionMethod::Deflated);

    let notes = decode(&data, &DecodeOptions::new().with_sheet_name("Notes")).unwrap();
    assert_eq!(notes.rows, vec![vec!["note"]]);

    let by_index = decode(&data, &DecodeOptions::new().with_sheet_index(2)).unwrap();
    assert_eq!(by_index, notes);

    let missing = decode(&data, &DecodeOptions::new().with_sheet(SheetSelector::Index(9)));
    assert!(matches!(missing, Err(Error::MissingRequiredEntry(_))));
}

#[test]
fn test_list_sheets() {
    let data = generated_workbook(3, CompressionMethod::Deflated);
    let sheets = list_sheets(&data).unwrap();

    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Data", "Notes"]);
    assert_eq!(sheets[1].path, "xl/worksheets/sheet2.xml");
}

#[test]
fn test_transpose_and_trim() {
    let data = stored_archive(&[(
        "xl/worksheets/sheet1.xml",
        r#"<row r="1"><c r="A1" t="inlineStr"><is><t> a </t></is></c><c r="B1"><v>1</v></c></row>"#,
    )]);
    let options = DecodeOptions::new().with_trim_cells(true).with_transpose(true);

    let matrix = decode(&data, &options).unwrap();
    assert_eq!(matrix.rows, vec![vec!["a"], vec!["1"]]);
}

#[test]
fn test_workbook_without_cells() {
    let data = stored_archive(&[("xl/worksheets/sheet1.xml", "<worksheet><sheetData/></worksheet>")]);
    let matrix = decode(&data, &DecodeOptions::default()).unwrap();
    assert!(matrix.is_empty());
}

#[test]
fn test_far_corner_cell_exceeds_cell_limit() {
    let data = stored_archive(&[(
        "xl/worksheets/sheet1.xml",
        r#"<c r="XFD1048576"><v>x</v></c>"#,
    )]);

    let result = decode(&data, &DecodeOptions::default());
    assert!(matches!(
        result,
        Err(Error::TooManyCells {
            rows: 1_048_576,
            columns: 16_384,
            ..
        })
    ));

    let data = stored_archive(&[(
        "xl/worksheets/sheet1.xml",
        r#"<c r="C4"><v>x</v></c>"#,
    )]);
    assert!(decode(&data, &DecodeOptions::new().with_max_cells(11)).is_err());
    let matrix = decode(&data, &DecodeOptions::new().with_max_cells(12)).unwrap();
    assert_eq!(matrix.get(3, 2), Some("x"));
}

#[test]
fn test_missing_worksheet() {
    let data = stored_archive(&[("xl/sharedStrings.xml", "<sst/>")]);
    let result = decode(&data, &DecodeOptions::default());
    assert!(matches!(result, Err(Error::MissingRequiredEntry(_))));
}

#[test]
fn test_not_a_zip() {
    let result = decode(b"hello world", &DecodeOptions::default());
    assert!(matches!(result, Err(Error::NotAZipContainer)));
}

#[test]
fn test_truncated_archive() {
    let data = generated_workbook(200, CompressionMethod::Deflated);
    // Cut inside the first entry's payload.
    let result = decode(&data[..60], &DecodeOptions::default());
    assert!(matches!(result, Err(Error::CorruptZipHeader(_))));
}

#[test]
fn test_corrupt_deflate_stream() {
    let mut data = stored_archive(&[("xl/worksheets/sheet1.xml", "")]);
    // Switch the entry to deflate and give it a reserved block type.
    data[8] = 8;
    data[18..22].copy_from_slice(&1u32.to_le_bytes());
    data.push(0x07);

    let result = decode(&data, &DecodeOptions::default());
    assert!(matches!(result, Err(Error::InvalidBlockType(3))));
}

#[test]
fn test_read_table_dispatch() {
    let data = generated_workbook(2, CompressionMethod::Deflated);
    let from_xlsx = read_table(&data, &DecodeOptions::default()).unwrap();
    assert_eq!(from_xlsx.height(), 2);

    let from_text = read_table(b"x;y\n", &DecodeOptions::default()).unwrap();
    assert_eq!(from_text.rows, vec![vec!["x", "y"]]);
}

#[test]
fn test_decode_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    std::fs::write(&path, generated_workbook(10, CompressionMethod::Deflated)).unwrap();

    let matrix = decode_file(&path, &DecodeOptions::default()).unwrap();
    assert_eq!(matrix.height(), 10);
    assert_eq!(matrix.get(9, 1), Some("70"));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_decode_file_async() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    std::fs::write(&path, generated_workbook(5, CompressionMethod::Deflated)).unwrap();

    let matrix = rawsheet::decode_file_async(&path, &DecodeOptions::default())
        .await
        .unwrap();
    assert_eq!(matrix.height(), 5);
}
