//! Durable key-value persistence.
//!
//! The engine serializes its state under two logical keys:
//! - `"playlist"` - the track array (metadata fields only; asset
//!   handles are not durable and must be re-supplied after reload)
//! - `"playlists"` - the named playlists as `[name, trackRefs]` pairs
//!
//! A third settings key belongs to the visual-theming collaborator and
//! is opaque to this crate. Writes overwrite wholesale; reads return
//! `None` for absent keys.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::library::Library;
use crate::model::{Artwork, Track};

/// Key for the serialized track array.
pub const KEY_LIBRARY: &str = "playlist";

/// Key for the serialized named-playlist pairs.
pub const KEY_PLAYLISTS: &str = "playlists";

/// A durable key-value store.
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key` wholesale.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one JSON document per key in a single directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open a store in the OS-standard data directory, or fall back to
    /// the current directory when the platform has none.
    pub fn open_default() -> Result<Self> {
        let dir = default_store_dir();
        tracing::info!("opening store at {:?}", dir);
        Self::open(dir)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// Data directory for the default store.
pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("tunedeck"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        // Write atomically (write to temp, then rename)
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable form of a track: metadata only, no asset handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Option<String>,
}

impl From<&Track> for SavedTrack {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            artwork: track.artwork.as_data_uri().map(str::to_string),
        }
    }
}

impl From<SavedTrack> for Track {
    fn from(saved: SavedTrack) -> Self {
        Track {
            source: None, // handles are not durable
            title: saved.title,
            artist: saved.artist,
            album: saved.album,
            artwork: saved
                .artwork
                .map(Artwork::DataUri)
                .unwrap_or_default(),
        }
    }
}

/// Persist the track array under [`KEY_LIBRARY`].
pub fn save_library(store: &mut impl KeyValueStore, library: &Library) -> Result<()> {
    let saved: Vec<SavedTrack> = library.tracks().iter().map(SavedTrack::from).collect();
    store.set(KEY_LIBRARY, &serde_json::to_string(&saved)?)
}

/// Restore the track array. Tracks come back metadata-only.
pub fn load_library(store: &impl KeyValueStore) -> Result<Vec<Track>> {
    let Some(raw) = store.get(KEY_LIBRARY)? else {
        return Ok(Vec::new());
    };
    let saved: Vec<SavedTrack> = serde_json::from_str(&raw)?;
    Ok(saved.into_iter().map(Track::from).collect())
}

/// Persist the named playlists under [`KEY_PLAYLISTS`] as
/// `[name, trackRefs]` pairs.
pub fn save_playlists(store: &mut impl KeyValueStore, library: &Library) -> Result<()> {
    let pairs: Vec<(&String, &Vec<usize>)> = library.playlists().iter().collect();
    store.set(KEY_PLAYLISTS, &serde_json::to_string(&pairs)?)
}

/// Restore the named playlists.
pub fn load_playlists(store: &impl KeyValueStore) -> Result<BTreeMap<String, Vec<usize>>> {
    let Some(raw) = store.get(KEY_PLAYLISTS)? else {
        return Ok(BTreeMap::new());
    };
    let pairs: Vec<(String, Vec<usize>)> = serde_json::from_str(&raw)?;
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_track;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let mut store = JsonFileStore::open(dir.path()).unwrap();

        assert!(store.get(KEY_LIBRARY).unwrap().is_none());
        store.set(KEY_LIBRARY, "[]").unwrap();
        assert_eq!(store.get(KEY_LIBRARY).unwrap().as_deref(), Some("[]"));

        // Reopening sees the same data
        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(KEY_LIBRARY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_library_roundtrip_preserves_metadata() {
        let mut lib = Library::new();
        let mut with_art = mock_track("Song", "Artist", "Album");
        with_art.artwork = Artwork::DataUri("data:image/png;base64,AAAA".to_string());
        lib.push(with_art);
        lib.push(mock_track("Other", "Someone", "Elsewhere"));
        lib.rebuild_indices();

        let mut store = MemoryStore::new();
        save_library(&mut store, &lib).unwrap();
        let restored = load_library(&store).unwrap();

        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].title, "Song");
        assert_eq!(restored[0].artist, "Artist");
        assert_eq!(restored[0].album, "Album");
        assert_eq!(
            restored[0].artwork.as_data_uri(),
            Some("data:image/png;base64,AAAA")
        );
        // Asset handles are excluded by design
        assert!(restored.iter().all(|t| !t.playable()));
    }

    #[test]
    fn test_playlists_roundtrip() {
        let mut lib = Library::new();
        lib.create_playlist("Morning").unwrap();
        lib.create_playlist("Evening").unwrap();

        let mut store = MemoryStore::new();
        save_playlists(&mut store, &lib).unwrap();
        let restored = load_playlists(&store).unwrap();

        assert_eq!(restored.len(), 2);
        assert!(restored.contains_key("Morning"));
        assert!(restored.contains_key("Evening"));
    }
}
