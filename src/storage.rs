use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::NormalizedArtwork;

/// The visitor's exhibition: artwork snapshots keyed by artwork id, persisted
/// as a JSON array. Every successful mutation is written through to disk.
///
/// Snapshots are copies, not references, and are never refreshed from the
/// museum APIs.
#[derive(Debug)]
pub struct ExhibitionStore {
    path: PathBuf,
    artworks: Vec<NormalizedArtwork>,
}

impl ExhibitionStore {
    /// Load the store from `path`. A missing file is an empty exhibition.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let artworks = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Vec::new()
        };

        info!(path = %path.display(), count = artworks.len(), "Exhibition loaded");
        Ok(Self { path, artworks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a snapshot. Returns `false` if an artwork with the same id is
    /// already present; the existing snapshot is kept. If the write fails the
    /// store is left as it was.
    pub fn add(&mut self, artwork: NormalizedArtwork) -> Result<bool> {
        if self.contains(&artwork.id) {
            return Ok(false);
        }
        debug!(id = %artwork.id, "Adding to exhibition");
        self.artworks.push(artwork);
        if let Err(e) = self.persist() {
            self.artworks.pop();
            return Err(e);
        }
        Ok(true)
    }

    /// Remove by id. Returns whether anything was removed. If the write fails
    /// the artwork stays in place.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.artworks.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        let removed = self.artworks.remove(index);
        if let Err(e) = self.persist() {
            self.artworks.insert(index, removed);
            return Err(e);
        }
        debug!(id, "Removed from exhibition");
        Ok(true)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.artworks.iter().any(|a| a.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&NormalizedArtwork> {
        self.artworks.iter().find(|a| a.id == id)
    }

    /// Snapshots in insertion order
    pub fn list(&self) -> &[NormalizedArtwork] {
        &self.artworks
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    /// Write the exhibition to disk via a temp file and rename.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.artworks)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(id: &str) -> NormalizedArtwork {
        NormalizedArtwork {
            id: id.to_string(),
            title: "Untitled".into(),
            artist: "Unknown".into(),
            date: None,
            medium: None,
            department: None,
            culture: None,
            image: None,
            location: None,
            creditline: None,
            description: String::new(),
            kind: None,
            source: "Cleveland Museum of Art".into(),
            source_url: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ExhibitionStore::init(dir.path().join("exhibition.json")).unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ExhibitionStore::init(dir.path().join("exhibition.json")).unwrap();

        assert!(store.add(artwork("cleveland-1")).unwrap());
        assert!(!store.add(artwork("cleveland-1")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exhibition.json");
        let mut store = ExhibitionStore::init(&path).unwrap();

        assert!(!store.remove("harvard-1").unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut store = ExhibitionStore::init(blocker.join("exhibition.json")).unwrap();

        assert!(store.add(artwork("cleveland-1")).is_err());
        assert!(!store.contains("cleveland-1"));
        assert!(store.is_empty());
        // A retry reports the same failure instead of "already present"
        assert!(store.add(artwork("cleveland-1")).is_err());
    }

    #[test]
    fn test_failed_remove_keeps_artwork_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery").join("exhibition.json");
        let mut store = ExhibitionStore::init(&path).unwrap();
        store.add(artwork("cleveland-1")).unwrap();
        store.add(artwork("harvard-2")).unwrap();
        store.add(artwork("cleveland-3")).unwrap();

        // Swap the parent directory for a plain file so the next write fails
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path.parent().unwrap(), "not a directory").unwrap();

        assert!(store.remove("harvard-2").is_err());
        let ids: Vec<_> = store.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["cleveland-1", "harvard-2", "cleveland-3"]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exhibition.json");
        fs::write(&path, "{not json").unwrap();
        assert!(ExhibitionStore::init(&path).is_err());
    }
}
