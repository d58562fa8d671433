use placard::layout::PageSizePolicy;
use placard::{
    read_records, DocumentRenderer, Field, PlacardError, Record, RendererConfig, StyleConfig,
};
use serde_json::json;
use std::fs;
use std::path::Path;

fn renderer(base: &Path) -> DocumentRenderer {
    let config = RendererConfig::from_base(base);
    config.ensure_dirs().unwrap();
    DocumentRenderer::new(config)
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn invalid_records_are_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let records = vec![
        Record::new("Arroz tipo 1", "24,90", "15/03/2024"),
        Record::new("Feijão carioca", "", "15/03/2024"),
        Record::new("Café torrado", "18.5", "20/03/2024").with_barcode("7891234567895"),
    ];

    let (document, report) = renderer
        .process(&records, &StyleConfig::default(), None)
        .unwrap();

    assert_eq!(document.labels, 2);
    assert_eq!(document.pages, 2);
    assert_eq!(report.total, 3);
    assert_eq!(report.valid_count, 2);
    assert_eq!(report.invalid_count, 1);
    assert_eq!(report.entries[0].index, 1);
    assert_eq!(report.entries[0].name, "Feijão carioca");
    assert_eq!(report.entries[0].issues[0].field, Field::Price);

    let name = document.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("placas_") && name.ends_with(".pdf"), "{name}");
    let pdf = fs::read(&document.path).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&pdf).contains("/Count 2"));
    assert_eq!(files_in(&renderer.config().output_dir), vec![name]);
}

#[test]
fn nothing_is_written_without_valid_records() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let records = vec![Record::new("", "", ""), Record::new("X", "abc", "2024-01-01")];

    let result = renderer.process(&records, &StyleConfig::default(), None);
    assert!(matches!(result, Err(PlacardError::NoValidRecords)));
    assert!(files_in(&renderer.config().output_dir).is_empty());
}

#[test]
fn a6_packs_four_labels_per_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let records: Vec<Record> = (0..9)
        .map(|i| Record::new(format!("Produto {i}"), "1,99", "01/01/2025"))
        .collect();
    let style = StyleConfig::from_json(&json!({ "tamanho": "A6" }));
    assert_eq!(style.page_size, PageSizePolicy::A6);

    let document = renderer.render(&records, &style).unwrap();
    assert_eq!(document.pages, 3);
    assert_eq!(document.labels, 9);
    let pdf = fs::read(&document.path).unwrap();
    assert!(String::from_utf8_lossy(&pdf).contains("/Count 3"));
}

#[test]
fn selection_picks_records_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let records = vec![
        Record::new("Arroz", "24,90", "15/03/2024"),
        Record::new("", "", ""),
        Record::new("Leite", "4,99", "15/03/2024"),
    ];

    let (document, report) = renderer
        .process(&records, &StyleConfig::default(), Some(&[2, 0][..]))
        .unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.invalid_count, 0);
    assert_eq!(document.labels, 2);
}

#[test]
fn raster_barcodes_are_cached_once() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let records = vec![
        Record::new("Arroz", "24,90", "15/03/2024").with_barcode("7891234567895"),
        Record::new("Arroz integral", "26,90", "15/03/2024").with_barcode("7891234567895"),
    ];
    let style = StyleConfig::from_json(&json!({ "usar_imagem_codigo": true, "tamanho": "A5" }));

    let document = renderer.render(&records, &style).unwrap();
    assert!(document.fallbacks.is_empty());
    assert_eq!(document.pages, 1);
    assert_eq!(
        files_in(&renderer.config().barcodes_dir),
        vec!["barcode_7891234567895.png"]
    );
}

#[test]
fn missing_background_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let records = vec![Record::new("Arroz", "24,90", "15/03/2024")];
    let style = StyleConfig::from_json(&json!({ "fundo": "natal.png" }));

    let document = renderer.render(&records, &style).unwrap();
    assert_eq!(document.fallbacks.len(), 1);
    assert!(document.path.is_file());
}

#[test]
fn csv_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path());
    let csv = dir.path().join("produtos.csv");
    fs::write(
        &csv,
        "Nome do Produto,Preço,Data da Oferta,Código de Barras\n\
         Arroz,\"24,90\",15/03/2024,7891234567895\n\
         Feijão,\"8,49\",31/02/2024,\n",
    )
    .unwrap();

    let records = read_records(&csv).unwrap();
    let (document, report) = renderer
        .process(&records, &StyleConfig::default(), None)
        .unwrap();
    assert_eq!(document.labels, 1);
    assert_eq!(report.entries[0].issues[0].message, "date invalid");
}
