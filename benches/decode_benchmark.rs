//! Benchmarks for rawsheet decoding performance.
//!
//! Run with: cargo bench
//!
//! Workbooks are generated with the `zip` crate at several row counts so
//! that inflation and cell scanning are measured on realistic streams.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rawsheet::render::{to_csv, RenderOptions};
use rawsheet::{DecodeOptions, Matrix};
use std::io::Cursor;

const COLUMNS: usize = 8;

/// Worksheet XML with `row_count` rows of shared strings and numbers.
fn create_sheet_xml(row_count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for r in 1..=row_count {
        xml.push_str(&format!(r#"<row r="{}">"#, r));
        for c in 0..COLUMNS {
            let col = (b'A' + c as u8) as char;
            if c % 2 == 0 {
                xml.push_str(&format!(r#"<c r="{}{}" t="s"><v>{}</v></c>"#, col, r, (r + c) % 50));
            } else {
                xml.push_str(&format!(r#"<c r="{}{}"><v>{}.{}</v></c>"#, col, r, r * c, c));
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Creates a synthetic XLSX workbook with the given number of rows.
fn create_test_xlsx(row_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("xl/sharedStrings.xml", options).unwrap();
    let mut sst = String::from("<sst>");
    for i in 0..50 {
        sst.push_str(&format!("<si><t>label {}</t></si>", i));
    }
    sst.push_str("</sst>");
    zip.write_all(sst.as_bytes()).unwrap();

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(create_sheet_xml(row_count).as_bytes())
        .unwrap();

    zip.finish().unwrap();
    buffer
}

/// Creates delimited text with the given number of rows.
fn create_test_csv(row_count: usize) -> Vec<u8> {
    let mut text = String::new();
    for r in 0..row_count {
        let fields: Vec<String> = (0..COLUMNS).map(|c| format!("v{}-{}", r, c)).collect();
        text.push_str(&fields.join(";"));
        text.push('\n');
    }
    text.into_bytes()
}

/// Benchmark full XLSX decoding at various sizes.
fn bench_xlsx_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("xlsx_decoding");

    for row_count in [10, 100, 1000, 5000].iter() {
        let data = create_test_xlsx(*row_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = rawsheet::decode(black_box(data), &DecodeOptions::default());
            });
        });
    }

    group.finish();
}

/// Benchmark raw DEFLATE inflation of the worksheet stream.
fn bench_inflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("inflate");

    for row_count in [100, 1000, 5000].iter() {
        let data = create_test_xlsx(*row_count);
        let entries = rawsheet::container::read_local_entries(&data).unwrap();
        let payload = entries["xl/worksheets/sheet1.xml"].payload.to_vec();

        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("rows", row_count),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let _ = rawsheet::inflate::inflate(black_box(payload));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark delimited text reading with delimiter detection.
fn bench_delimited_reading(c: &mut Criterion) {
    let mut group = c.benchmark_group("delimited_reading");

    for row_count in [100, 1000, 10000].iter() {
        let data = create_test_csv(*row_count);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = rawsheet::read_delimited(black_box(data), &DecodeOptions::default());
            });
        });
    }

    group.finish();
}

/// Benchmark matrix rendering to CSV.
fn bench_csv_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_rendering");

    for row_count in [100, 1000].iter() {
        let data = create_test_xlsx(*row_count);
        let matrix: Matrix = rawsheet::decode(&data, &DecodeOptions::default()).unwrap();

        group.bench_with_input(
            BenchmarkId::new("rows", row_count),
            &matrix,
            |b, matrix| {
                b.iter(|| {
                    let options = RenderOptions::default();
                    let _ = to_csv(black_box(matrix), &options);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_xlsx_decoding,
    bench_inflate,
    bench_delimited_reading,
    bench_csv_rendering,
);
criterion_main!(benches);
