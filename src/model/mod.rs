//! Core data models for the playback engine.
//!
//! Defines the primary entities: [`AssetHandle`], [`AudioAsset`],
//! [`Artwork`], and [`Track`]. Tracks are owned exclusively by the
//! [`Library`](crate::library::Library); everything else in the crate
//! references them by index.

use std::path::PathBuf;
use std::sync::Arc;

use crate::metadata::MetadataRecord;

/// Default artist for tracks without tag data.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Default album for tracks without tag data.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Opaque reference to the binary audio data behind a track.
///
/// Handles are cheap to clone but not durable: persistence stores only
/// metadata, so a track restored from disk has no handle until the user
/// re-ingests the asset.
#[derive(Debug, Clone)]
pub enum AssetHandle {
    /// Audio bytes held in memory (e.g. received from a file picker).
    Memory(Arc<[u8]>),
    /// Audio file on disk.
    File(PathBuf),
}

/// A raw audio asset queued for ingestion: the user-visible name plus
/// the handle to its bytes.
#[derive(Debug, Clone)]
pub struct AudioAsset {
    /// Original filename, used for the heuristic metadata fallback.
    pub name: String,
    /// Handle to the audio data.
    pub handle: AssetHandle,
}

impl AudioAsset {
    /// Create an in-memory asset.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            handle: AssetHandle::Memory(bytes.into()),
        }
    }

    /// Create an asset backed by a file on disk. The asset name is the
    /// file name component of the path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            handle: AssetHandle::File(path),
        }
    }
}

/// Cover art reference for a track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Artwork {
    /// Sentinel placeholder shown when no cover is embedded.
    #[default]
    Placeholder,
    /// Embedded cover encoded as a `data:<mime>;base64,` URI.
    DataUri(String),
}

impl Artwork {
    /// The data URI, or `None` for the placeholder.
    pub fn as_data_uri(&self) -> Option<&str> {
        match self {
            Artwork::Placeholder => None,
            Artwork::DataUri(uri) => Some(uri),
        }
    }
}

/// A track in the library.
#[derive(Debug, Clone)]
pub struct Track {
    /// Handle to the audio data. `None` for tracks restored from
    /// persistence (metadata-only, not playable until re-ingested).
    pub source: Option<AssetHandle>,
    /// Track title (from tags or filename)
    pub title: String,
    /// Artist name (never empty; defaults to [`UNKNOWN_ARTIST`])
    pub artist: String,
    /// Album name (never empty; defaults to [`UNKNOWN_ALBUM`])
    pub album: String,
    /// Cover art reference
    pub artwork: Artwork,
}

impl Track {
    /// Build a track from a resolved metadata record and the asset it
    /// was resolved from.
    pub fn from_record(record: MetadataRecord, source: AssetHandle) -> Self {
        Self {
            source: Some(source),
            title: record.title,
            artist: record.artist,
            album: record.album,
            artwork: record.artwork,
        }
    }

    /// Whether this track has a live asset handle bound to it.
    pub fn playable(&self) -> bool {
        self.source.is_some()
    }
}

/// Strip the final extension from a filename, leaving the stem.
///
/// Mirrors `Path::file_stem` but operates on the raw asset name, which
/// may not be a valid path on this platform.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_strips_extension() {
        assert_eq!(file_stem("song.mp3"), "song");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("noext"), "noext");
        assert_eq!(file_stem(".mp3"), ".mp3");
    }

    #[test]
    fn test_artwork_default_is_placeholder() {
        assert_eq!(Artwork::default(), Artwork::Placeholder);
        assert!(Artwork::default().as_data_uri().is_none());
    }

    #[test]
    fn test_asset_from_path_takes_file_name() {
        let asset = AudioAsset::from_path("/music/Artist - Song.flac");
        assert_eq!(asset.name, "Artist - Song.flac");
        assert!(matches!(asset.handle, AssetHandle::File(_)));
    }

    #[test]
    fn test_track_from_record_is_playable() {
        let record = MetadataRecord {
            title: "T".into(),
            artist: "A".into(),
            album: "B".into(),
            artwork: Artwork::Placeholder,
        };
        let track = Track::from_record(record, AssetHandle::Memory(vec![0u8; 4].into()));
        assert!(track.playable());
        assert_eq!(track.title, "T");
    }
}
