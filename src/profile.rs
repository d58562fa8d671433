//! Named style presets saved as JSON files.

use crate::publish::write_atomically;
use crate::style::StyleConfig;
use crate::PlacardError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A saved style, as stored on disk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "nome")]
    pub name: String,
    pub config: Map<String, Value>,
    /// RFC 3339 timestamp
    #[serde(rename = "criado_em")]
    pub created_at: String,
}

impl Profile {
    pub fn style(&self) -> StyleConfig {
        StyleConfig::from_map(&self.config)
    }
}

#[derive(Clone, Debug)]
pub struct ProfileStore {
    dir: PathBuf,
}

/// Reduce a profile name to a safe file stem: whitespace becomes `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading dots are stripped
pub fn sanitize_name(name: &str) -> Result<String, PlacardError> {
    let stem: String = name
        .trim()
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
        .collect();
    let stem = stem.trim_start_matches('.');

    if stem.is_empty() {
        return Err(PlacardError::InvalidProfileName(name.to_string()));
    }
    Ok(stem.to_string())
}

impl ProfileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> ProfileStore {
        ProfileStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, PlacardError> {
        Ok(self.dir.join(format!("{}.json", sanitize_name(name)?)))
    }

    /// Save `config` under `name`, replacing any profile with the same file name
    pub fn save(&self, name: &str, config: Map<String, Value>) -> Result<Profile, PlacardError> {
        let path = self.path_for(name)?;
        let profile = Profile {
            name: name.to_string(),
            config,
            created_at: Local::now().to_rfc3339(),
        };

        write_atomically(&path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, &profile)?;
            writer.write_all(b"\n")?;
            Ok(())
        })?;
        info!(path = %path.display(), "profile saved");
        Ok(profile)
    }

    pub fn load(&self, name: &str) -> Result<Profile, PlacardError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(PlacardError::ProfileNotFound(name.to_string()));
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Every readable profile, sorted by file name. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<Profile>, PlacardError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut profiles = Vec::with_capacity(paths.len());
        for path in paths {
            let parsed = std::fs::read_to_string(&path)
                .map_err(PlacardError::from)
                .and_then(|text| Ok(serde_json::from_str::<Profile>(&text)?));
            match parsed {
                Ok(profile) => profiles.push(profile),
                Err(err) => warn!(path = %path.display(), "skipping profile: {err}"),
            }
        }
        Ok(profiles)
    }

    pub fn delete(&self, name: &str) -> Result<(), PlacardError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(PlacardError::ProfileNotFound(name.to_string()));
        }
        std::fs::remove_file(&path)?;
        info!(path = %path.display(), "profile deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageSizePolicy;
    use serde_json::json;

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(sanitize_name("Ofertas da Semana").unwrap(), "Ofertas_da_Semana");
        assert_eq!(sanitize_name("../../etc/passwd").unwrap(), "etcpasswd");
        assert_eq!(sanitize_name("promoção").unwrap(), "promoo");
        assert!(matches!(
            sanitize_name("///"),
            Err(PlacardError::InvalidProfileName(_))
        ));
    }

    #[test]
    fn save_load_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        store
            .save("Semana", config(json!({ "tamanho": "A6", "bordas": false })))
            .unwrap();
        store.save("Natal", config(json!({}))).unwrap();

        let loaded = store.load("Semana").unwrap();
        assert_eq!(loaded.name, "Semana");
        assert_eq!(loaded.style().page_size, PageSizePolicy::A6);
        assert!(!loaded.style().borders);

        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("Semana.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk["nome"], "Semana");
        assert!(on_disk["criado_em"].is_string());

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Natal", "Semana"]);

        store.delete("Natal").unwrap();
        assert!(matches!(
            store.load("Natal"),
            Err(PlacardError::ProfileNotFound(_))
        ));
        assert!(matches!(
            store.delete("Natal"),
            Err(PlacardError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn missing_directory_lists_empty() {
        let store = ProfileStore::new("/definitely/not/here");
        assert!(store.list().unwrap().is_empty());
    }
}
