use crate::PlacardError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the renderer reads assets from and writes its output to
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// `<id>.ttf` files that styles may ask for by id
    pub fonts_dir: PathBuf,
    pub backgrounds_dir: PathBuf,
    pub output_dir: PathBuf,
    pub previews_dir: PathBuf,
    pub barcodes_dir: PathBuf,
    pub profiles_dir: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig::from_base(".")
    }
}

impl RendererConfig {
    /// The conventional directory layout under `base`
    pub fn from_base<P: AsRef<Path>>(base: P) -> RendererConfig {
        let base = base.as_ref();
        RendererConfig {
            fonts_dir: base.join("assets").join("fonts"),
            backgrounds_dir: base.join("assets").join("backgrounds"),
            output_dir: base.join("outputs"),
            previews_dir: base.join("previews"),
            barcodes_dir: base.join("barcodes"),
            profiles_dir: base.join("perfis"),
        }
    }

    /// Load a config from a JSON file; keys left out keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<RendererConfig, PlacardError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Create every directory the renderer may write to or list
    pub fn ensure_dirs(&self) -> Result<(), PlacardError> {
        for dir in [
            &self.fonts_dir,
            &self.backgrounds_dir,
            &self.output_dir,
            &self.previews_dir,
            &self.barcodes_dir,
            &self.profiles_dir,
        ] {
            std::fs::create_dir_all(dir)?;
            debug!(dir = %dir.display(), "directory ready");
        }
        Ok(())
    }
}
