//! Integration tests for PDF assembly from a directory of page images

mod support;

use lopdf::{Document, Object};
use manual_downloader::config::OutputFormat;
use manual_downloader::output::{assemble_directory, AssembleError};
use manual_downloader::{assemble_outcome, Artifact, WalkOutcome};
use support::{file_names, png, test_config};
use tempfile::TempDir;

fn number(object: &Object) -> f32 {
    match object {
        Object::Integer(value) => *value as f32,
        Object::Real(value) => *value as f32,
        other => panic!("expected a number, got {:?}", other),
    }
}

/// Page widths in points, in page order
fn page_widths(path: &std::path::Path) -> Vec<f32> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_object(*id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            number(&media_box[2])
        })
        .collect()
}

/// Writes `<n>.png` for every page, `n * 10` pixels wide
fn write_pages(dir: &TempDir, pages: std::ops::RangeInclusive<u32>) {
    for page in pages {
        std::fs::write(
            dir.path().join(format!("{}.png", page)),
            png(page * 10, 20, page as u8),
        )
        .unwrap();
    }
}

#[test]
fn test_range_becomes_pages_in_ascending_order() {
    let source = TempDir::new().unwrap();
    write_pages(&source, 1..=12);
    let output = TempDir::new().unwrap();
    let pdf = output.path().join("part.pdf");

    let artifact = assemble_directory(source.path(), 3, 11, &pdf, 72.0).unwrap();

    assert_eq!(
        artifact,
        Artifact::Document {
            path: pdf.clone(),
            page_count: 9
        }
    );
    // Numeric order, so 10 and 11 come after 9
    let expected: Vec<f32> = (3..=11).map(|page| (page * 10) as f32).collect();
    assert_eq!(page_widths(&pdf), expected);
}

#[test]
fn test_missing_image_writes_nothing() {
    let source = TempDir::new().unwrap();
    write_pages(&source, 1..=4);
    std::fs::remove_file(source.path().join("3.png")).unwrap();
    let output = TempDir::new().unwrap();
    let pdf = output.path().join("manual.pdf");

    let result = assemble_directory(source.path(), 1, 4, &pdf, 100.0);

    assert!(matches!(
        result,
        Err(AssembleError::MissingAsset { page: 3, .. })
    ));
    assert!(file_names(output.path()).is_empty());
}

#[test]
fn test_conversion_is_reproducible() {
    let source = TempDir::new().unwrap();
    write_pages(&source, 1..=3);
    let output = TempDir::new().unwrap();
    let first = output.path().join("first.pdf");
    let second = output.path().join("second.pdf");

    assemble_directory(source.path(), 1, 3, &first, 100.0).unwrap();
    assemble_directory(source.path(), 1, 3, &second, 100.0).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_quality_scales_page_size() {
    let source = TempDir::new().unwrap();
    write_pages(&source, 1..=1);
    let output = TempDir::new().unwrap();
    let coarse = output.path().join("coarse.pdf");
    let fine = output.path().join("fine.pdf");

    assemble_directory(source.path(), 1, 1, &coarse, 72.0).unwrap();
    assemble_directory(source.path(), 1, 1, &fine, 144.0).unwrap();

    assert_eq!(page_widths(&coarse), vec![10.0]);
    assert_eq!(page_widths(&fine), vec![5.0]);
}

#[test]
fn test_walk_outcome_assembly_matches_direct_conversion() {
    let dir = TempDir::new().unwrap();
    write_pages(&dir, 2..=4);
    let mut config = test_config(dir.path());
    config.output.format = OutputFormat::Pdf;
    config.output.document_name = "from-walk.pdf".to_string();

    let outcome = WalkOutcome {
        first_page: 2,
        last_page: Some(4),
        total_pages: Some(4),
        pages_saved: 3,
    };
    let artifact = assemble_outcome(&config, &outcome)
        .unwrap()
        .expect("Expected a document");

    let direct = dir.path().join("direct.pdf");
    assemble_directory(dir.path(), 2, 4, &direct, config.output.quality).unwrap();

    let walked = dir.path().join("from-walk.pdf");
    assert_eq!(
        artifact,
        Artifact::Document {
            path: walked.clone(),
            page_count: 3
        }
    );
    assert_eq!(std::fs::read(walked).unwrap(), std::fs::read(direct).unwrap());
}
