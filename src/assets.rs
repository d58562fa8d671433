use crate::config::RendererConfig;
use crate::font::BuiltinFont;
use std::path::{Component, Path, PathBuf};

/// Read-only view of the background and font asset directories
#[derive(Clone, Debug)]
pub struct Assets {
    backgrounds_dir: PathBuf,
    fonts_dir: PathBuf,
}

/// A single, plain file name with no directory parts
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Sorted file names in `dir` whose extension is one of `extensions`. A missing
/// directory lists as empty.
fn list_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    files.sort();
    files
}

impl Assets {
    pub fn new(config: &RendererConfig) -> Assets {
        Assets {
            backgrounds_dir: config.backgrounds_dir.clone(),
            fonts_dir: config.fonts_dir.clone(),
        }
    }

    /// Path of the background called `name`, if it is a plain file name that exists
    pub fn resolve_background(&self, name: &str) -> Option<PathBuf> {
        if !is_plain_name(name) {
            return None;
        }
        let path = self.backgrounds_dir.join(name);
        path.is_file().then_some(path)
    }

    /// Path of the `<id>.ttf` font file, if it exists
    pub fn resolve_font(&self, id: &str) -> Option<PathBuf> {
        let file = format!("{id}.ttf");
        if !is_plain_name(&file) {
            return None;
        }
        let path = self.fonts_dir.join(file);
        path.is_file().then_some(path)
    }

    /// Background images, by file name
    pub fn list_backgrounds(&self) -> Vec<String> {
        list_files(&self.backgrounds_dir, &["png", "jpg", "jpeg"])
            .into_iter()
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    /// Built-in fonts followed by the ids of the TrueType fonts on disk
    pub fn list_fonts(&self) -> Vec<String> {
        let builtin = BuiltinFont::ALL.iter().map(|f| f.base_name().to_string());
        let custom = list_files(&self.fonts_dir, &["ttf"])
            .into_iter()
            .filter_map(|path| path.file_stem().map(|n| n.to_string_lossy().into_owned()));
        builtin.chain(custom).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Assets) {
        let dir = tempfile::tempdir().unwrap();
        let config = RendererConfig::from_base(dir.path());
        config.ensure_dirs().unwrap();
        (dir, Assets::new(&config))
    }

    #[test]
    fn backgrounds_must_be_plain_names() {
        let (dir, assets) = setup();
        fs::write(dir.path().join("assets/backgrounds/promo.png"), b"x").unwrap();
        fs::write(dir.path().join("secret.png"), b"x").unwrap();

        assert!(assets.resolve_background("promo.png").is_some());
        assert!(assets.resolve_background("missing.png").is_none());
        assert!(assets.resolve_background("../../secret.png").is_none());
        assert!(assets.resolve_background("/etc/passwd").is_none());
    }

    #[test]
    fn listings_filter_by_extension() {
        let (dir, assets) = setup();
        fs::write(dir.path().join("assets/backgrounds/b.JPG"), b"x").unwrap();
        fs::write(dir.path().join("assets/backgrounds/a.png"), b"x").unwrap();
        fs::write(dir.path().join("assets/backgrounds/notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("assets/fonts/Roboto.ttf"), b"x").unwrap();

        assert_eq!(assets.list_backgrounds(), vec!["a.png", "b.JPG"]);
        let fonts = assets.list_fonts();
        assert_eq!(fonts[0], "Helvetica-Bold");
        assert_eq!(fonts.last().map(String::as_str), Some("Roboto"));
        assert!(assets.resolve_font("Roboto").is_some());
        assert!(assets.resolve_font("../Roboto").is_none());
    }
}
