use crate::PlacardError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a file through a uniquely named temporary sibling that is renamed over `path`
/// once `fill` succeeds. Readers see either the old file, no file, or a complete new
/// one; concurrent writers of the same path each stage separately and the last rename
/// wins.
pub(crate) fn write_atomically<F>(path: &Path, fill: F) -> Result<(), PlacardError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), PlacardError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // dropped (and removed) on any early return
    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
