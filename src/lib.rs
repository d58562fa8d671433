//! Price-tag label layout and rendering.
//!
//! Product records are validated, laid out onto label slots of printed sheets and
//! written out as a PDF. Single labels can also be previewed as small raster images.
//!
//! ```no_run
//! use placard::{read_records, DocumentRenderer, RendererConfig, StyleConfig};
//! use std::path::Path;
//!
//! let renderer = DocumentRenderer::new(RendererConfig::from_base("."));
//! let records = read_records(Path::new("produtos.csv"))?;
//! let (document, _report) = renderer.process(&records, &StyleConfig::default(), None)?;
//! println!("{} labels in {}", document.labels, document.path.display());
//! # Ok::<(), placard::PlacardError>(())
//! ```

mod assets;
pub use assets::*;

pub mod barcode;
pub use barcode::BarcodeCache;

mod colour;
pub use colour::*;

mod compose;
pub use compose::*;

mod config;
pub use config::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Where labels go on a sheet, and how field text is fitted to a label
pub mod layout;

mod page;
pub use page::*;

/// Physical sheet sizes
pub mod pagesize;

mod profile;
pub use profile::*;

mod publish;

pub mod raster;

mod record;
pub use record::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

mod source;
pub use source::*;

mod style;
pub use style::*;

mod units;
pub use units::*;

mod validate;
pub use validate::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
