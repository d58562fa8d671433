//! Batch rendering: validated records in, a label PDF (and preview images) out.

use crate::assets::Assets;
use crate::barcode::BarcodeCache;
use crate::colour::Colour;
use crate::compose::{note, Fallback, LabelCompositor};
use crate::config::RendererConfig;
use crate::document::Document;
use crate::info::Info;
use crate::layout::{plan, wrap};
use crate::page::Page;
use crate::publish::write_atomically;
use crate::raster::{save_png, Canvas};
use crate::record::Record;
use crate::rect::Rect;
use crate::style::{StyleConfig, DEFAULT_COLOUR};
use crate::validate::{validate, ValidationIssue};
use crate::PlacardError;
use chrono::Local;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use image::RgbImage;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

const PREVIEW_WIDTH: u32 = 400;
const PREVIEW_HEIGHT: u32 = 300;
const PREVIEW_NAME_WRAP: usize = 30;
const PREVIEW_NAME_WIDTH: f32 = 300.0;
const PREVIEW_LINE_SPACING: i32 = 25;

/// A PDF that was written to disk
#[derive(Clone, Debug, Serialize)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub pages: usize,
    pub labels: usize,
    pub fallbacks: Vec<Fallback>,
}

/// A record that was left out of a batch
#[derive(Clone, Debug, Serialize)]
pub struct ReportEntry {
    /// Position within the (selected) batch
    pub index: usize,
    pub name: String,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RenderReport {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub entries: Vec<ReportEntry>,
}

/// A single-label preview image
pub struct Preview {
    pub image: RgbImage,
    /// Set when the real preview could not be drawn and a placeholder was used
    pub fallback: Option<Fallback>,
}

/// Outcome of checking a single record before printing it
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Confirmation {
    Invalid {
        issues: Vec<ValidationIssue>,
    },
    Valid {
        preview: PathBuf,
        /// 1-based position of the record in the batch
        position: usize,
        total: usize,
    },
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S_%3f").to_string()
}

pub struct DocumentRenderer {
    config: RendererConfig,
    assets: Assets,
    barcodes: BarcodeCache,
}

impl DocumentRenderer {
    pub fn new(config: RendererConfig) -> DocumentRenderer {
        DocumentRenderer {
            assets: Assets::new(&config),
            barcodes: BarcodeCache::new(&config.barcodes_dir),
            config,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn barcodes(&self) -> &BarcodeCache {
        &self.barcodes
    }

    /// Lay out `records` (assumed valid) and write them to a new PDF in the output
    /// directory. The file only appears once it is complete.
    #[instrument(skip_all, fields(records = records.len(), page_size = %style.page_size))]
    pub fn render(
        &self,
        records: &[Record],
        style: &StyleConfig,
    ) -> Result<RenderedDocument, PlacardError> {
        if records.is_empty() {
            return Err(PlacardError::NoValidRecords);
        }

        let policy = style.page_size;
        let mut document = Document::default();
        document.set_info(Info::for_batch(policy.as_str(), records.len()));

        let mut compositor = LabelCompositor::new(&self.assets, &self.barcodes);
        let mut fallbacks = Vec::new();
        let mut page = Page::new(policy.physical_page());

        for (index, record) in records.iter().enumerate() {
            let placement = plan(policy, index);
            if placement.new_page {
                let finished = std::mem::replace(&mut page, Page::new(policy.physical_page()));
                document.add_page(finished);
            }

            let rect = Rect::from_origin(
                placement.origin_x,
                placement.origin_y,
                placement.width,
                placement.height,
            );
            debug!(index, page = placement.page_index, "composing label");
            fallbacks.extend(compositor.compose(&mut document, &mut page, record, rect, style));
        }
        document.add_page(page);

        let pages = document.page_count();
        let path = self
            .config
            .output_dir
            .join(format!("placas_{}.pdf", timestamp()));
        write_atomically(&path, |writer| document.write(writer))?;

        info!(path = %path.display(), pages, labels = records.len(), "labels rendered");
        Ok(RenderedDocument {
            path,
            pages,
            labels: records.len(),
            fallbacks,
        })
    }

    /// Select, validate and render a batch. Records that fail validation are left out
    /// and described in the report; if none pass, nothing is written.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn process(
        &self,
        records: &[Record],
        style: &StyleConfig,
        selection: Option<&[usize]>,
    ) -> Result<(RenderedDocument, RenderReport), PlacardError> {
        let selected: Vec<&Record> = match selection {
            None => records.iter().collect(),
            Some(indices) => indices
                .iter()
                .map(|&index| {
                    records.get(index).ok_or(PlacardError::IndexOutOfRange {
                        index,
                        total: records.len(),
                    })
                })
                .collect::<Result<_, _>>()?,
        };

        let mut report = RenderReport {
            total: selected.len(),
            ..RenderReport::default()
        };
        let mut valid: Vec<Record> = Vec::with_capacity(selected.len());

        for (index, record) in selected.into_iter().enumerate() {
            let issues = validate(record);
            if issues.is_empty() {
                valid.push(record.clone());
            } else {
                debug!(index, ?issues, "record excluded");
                report.entries.push(ReportEntry {
                    index,
                    name: record.name.clone(),
                    issues,
                });
            }
        }
        report.valid_count = valid.len();
        report.invalid_count = report.entries.len();

        if valid.is_empty() {
            return Err(PlacardError::NoValidRecords);
        }

        let rendered = self.render(&valid, style)?;
        Ok((rendered, report))
    }

    /// Draw a 400×300 preview of one label. Never fails: if the preview cannot be
    /// drawn, a placeholder image is returned instead.
    #[instrument(skip_all)]
    pub fn render_preview(&self, record: &Record, style: &StyleConfig) -> Preview {
        match draw_preview(record, style) {
            Ok(image) => Preview {
                image,
                fallback: None,
            },
            Err(err) => {
                let mut fallbacks = Vec::new();
                note(
                    &mut fallbacks,
                    Fallback::PlaceholderPreview {
                        reason: err.to_string(),
                    },
                );
                let mut canvas = Canvas::new(PREVIEW_WIDTH, PREVIEW_HEIGHT);
                canvas.text("Label Preview", 50, 150, 12.0, Rgb888::BLACK);
                Preview {
                    image: canvas.into_image(),
                    fallback: fallbacks.pop(),
                }
            }
        }
    }

    /// Write a preview into the previews directory, returning its path
    pub fn save_preview(&self, preview: &Preview) -> Result<PathBuf, PlacardError> {
        let path = self
            .config
            .previews_dir
            .join(format!("preview_{}.png", timestamp()));
        save_png(&preview.image, &path)?;
        debug!(path = %path.display(), "preview saved");
        Ok(path)
    }

    /// Validate the record at `index` and, if it passes, save a preview of it
    #[instrument(skip(self, records, style))]
    pub fn confirm(
        &self,
        records: &[Record],
        index: usize,
        style: &StyleConfig,
    ) -> Result<Confirmation, PlacardError> {
        let record = records.get(index).ok_or(PlacardError::IndexOutOfRange {
            index,
            total: records.len(),
        })?;

        let issues = validate(record);
        if !issues.is_empty() {
            return Ok(Confirmation::Invalid { issues });
        }

        let preview = self.render_preview(record, style);
        Ok(Confirmation::Valid {
            preview: self.save_preview(&preview)?,
            position: index + 1,
            total: records.len(),
        })
    }
}

fn draw_preview(record: &Record, style: &StyleConfig) -> Result<RgbImage, PlacardError> {
    let mut canvas = Canvas::new(PREVIEW_WIDTH, PREVIEW_HEIGHT);

    if style.name.visible {
        let size = style.name.size_or(20.0);
        let colour = Colour::from_hex_or_name(style.name.colour_or(DEFAULT_COLOUR))?.to_rgb888();
        let x = style.name.x as i32;
        let y = style.name.y.unwrap_or(50.0) as i32;

        if record.name.chars().count() > PREVIEW_NAME_WRAP {
            let lines = wrap(&record.name, PREVIEW_NAME_WIDTH, size);
            for (i, line) in lines.iter().take(2).enumerate() {
                canvas.text(line, x, y + i as i32 * PREVIEW_LINE_SPACING, size, colour);
            }
        } else {
            canvas.text(&record.name, x, y, size, colour);
        }
    }

    if style.price.visible {
        let size = style.price.size_or(28.0);
        let colour = Colour::from_hex_or_name(style.price.colour_or("#FF0000"))?.to_rgb888();
        let x = style.price.x as i32;
        let y = style.price.y.unwrap_or(100.0) as i32;
        canvas.text(&format!("R$ {}", record.price), x, y, size, colour);
    }

    Ok(canvas.into_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use serde_json::json;

    fn renderer() -> (tempfile::TempDir, DocumentRenderer) {
        let dir = tempfile::tempdir().unwrap();
        let config = RendererConfig::from_base(dir.path());
        config.ensure_dirs().unwrap();
        (dir, DocumentRenderer::new(config))
    }

    fn has_colour(image: &RgbImage, colour: [u8; 3]) -> bool {
        image.pixels().any(|p| *p == Rgb(colour))
    }

    #[test]
    fn preview_draws_name_and_red_price() {
        let (_dir, renderer) = renderer();
        let record = Record::new("Arroz", "24,90", "15/03/2024");
        let preview = renderer.render_preview(&record, &StyleConfig::default());
        assert!(preview.fallback.is_none());
        assert_eq!(preview.image.dimensions(), (400, 300));
        assert!(has_colour(&preview.image, [0, 0, 0]));
        assert!(has_colour(&preview.image, [255, 0, 0]));
    }

    #[test]
    fn preview_accepts_named_colours() {
        let (_dir, renderer) = renderer();
        let style = StyleConfig::from_json(&json!({ "nome_cor": "blue", "valor_cor": "green" }));
        let record = Record::new("Arroz", "24,90", "15/03/2024");
        let preview = renderer.render_preview(&record, &style);

        assert!(preview.fallback.is_none());
        assert!(has_colour(&preview.image, [0, 0, 255]));
        assert!(has_colour(&preview.image, [0, 128, 0]));
    }

    #[test]
    fn preview_with_bad_colour_is_a_placeholder() {
        let (_dir, renderer) = renderer();
        let style = StyleConfig::from_json(&json!({ "nome_cor": "bluish" }));
        let record = Record::new("Arroz", "24,90", "15/03/2024");
        let preview = renderer.render_preview(&record, &style);

        assert!(matches!(
            preview.fallback,
            Some(Fallback::PlaceholderPreview { .. })
        ));
        assert!(!has_colour(&preview.image, [255, 0, 0]));
        // placeholder text sits at (50, 150)
        let inked_rows: Vec<u32> = preview
            .image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == [0, 0, 0])
            .map(|(_, y, _)| y)
            .collect();
        assert!(inked_rows.iter().all(|y| (150..160).contains(y)));
    }

    #[test]
    fn confirm_reports_issues_or_saves_preview() {
        let (_dir, renderer) = renderer();
        let records = vec![
            Record::new("Arroz", "24,90", "15/03/2024"),
            Record::new("Feijão", "", "15/03/2024"),
        ];
        let style = StyleConfig::default();

        match renderer.confirm(&records, 0, &style).unwrap() {
            Confirmation::Valid {
                preview,
                position,
                total,
            } => {
                assert!(preview.is_file());
                assert_eq!((position, total), (1, 2));
            }
            other => panic!("unexpected {other:?}"),
        }

        match renderer.confirm(&records, 1, &style).unwrap() {
            Confirmation::Invalid { issues } => assert_eq!(issues[0].message, "price blank"),
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            renderer.confirm(&records, 2, &style),
            Err(PlacardError::IndexOutOfRange { index: 2, total: 2 })
        ));
    }

    #[test]
    fn selection_out_of_range_is_an_error() {
        let (_dir, renderer) = renderer();
        let records = vec![Record::new("Arroz", "24,90", "15/03/2024")];
        let result = renderer.process(&records, &StyleConfig::default(), Some(&[0, 3][..]));
        assert!(matches!(result, Err(PlacardError::IndexOutOfRange { index: 3, .. })));
    }
}
