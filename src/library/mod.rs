//! The library store: the ordered track collection, its derived
//! artist/album indices, and the named playlists.
//!
//! Insertion order is playback order for non-shuffled sequencing. The
//! artist and album sets are materialized views over the track list:
//! they are rebuilt with a full scan after every mutation instead of
//! being maintained incrementally, because an edit or delete can remove
//! the last holder of a value and incremental bookkeeping goes stale.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::model::Track;

/// Field updates for [`Library::edit`]. `None` or blank values retain
/// the prior field.
#[derive(Debug, Clone, Default)]
pub struct TrackEdit {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// The track collection with derived indices and named playlists.
#[derive(Debug, Default)]
pub struct Library {
    /// Tracks in insertion order
    tracks: Vec<Track>,
    /// Derived artist set, rebuilt on every mutation
    artists: BTreeSet<String>,
    /// Derived album set, rebuilt on every mutation
    albums: BTreeSet<String>,
    /// Named playlists: name -> track indices
    playlists: BTreeMap<String, Vec<usize>>,
}

impl Library {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a library from persisted tracks and playlists.
    pub fn from_parts(tracks: Vec<Track>, playlists: BTreeMap<String, Vec<usize>>) -> Self {
        let mut library = Self {
            tracks,
            playlists,
            ..Self::default()
        };
        library.rebuild_indices();
        library
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get a track by index.
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in playback order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Append a track. The caller is expected to call
    /// [`rebuild_indices`](Self::rebuild_indices) once its batch of
    /// appends is complete.
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove the track at `index` and rebuild the derived sets.
    /// Returns `None` (and leaves the library untouched) when the index
    /// is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            tracing::debug!("remove ignored: index {index} out of range");
            return None;
        }
        let track = self.tracks.remove(index);
        self.rebuild_indices();
        Some(track)
    }

    /// Apply an in-place edit. Blank or omitted fields retain their
    /// prior value. Returns false when the index is out of range.
    pub fn edit(&mut self, index: usize, edit: &TrackEdit) -> bool {
        let Some(track) = self.tracks.get_mut(index) else {
            tracing::debug!("edit ignored: index {index} out of range");
            return false;
        };

        if let Some(title) = non_blank(&edit.title) {
            track.title = title;
        }
        if let Some(artist) = non_blank(&edit.artist) {
            track.artist = artist;
        }
        if let Some(album) = non_blank(&edit.album) {
            track.album = album;
        }

        self.rebuild_indices();
        true
    }

    /// Rebuild the artist and album sets from the current track list.
    ///
    /// O(n) scan into fresh sets; never mutate the sets incrementally
    /// on delete, the removed value may still have other holders.
    pub fn rebuild_indices(&mut self) {
        self.artists = self.tracks.iter().map(|t| t.artist.clone()).collect();
        self.albums = self.tracks.iter().map(|t| t.album.clone()).collect();
    }

    /// Sorted artist names.
    pub fn artists(&self) -> impl Iterator<Item = &str> {
        self.artists.iter().map(String::as_str)
    }

    /// Sorted album names.
    pub fn albums(&self) -> impl Iterator<Item = &str> {
        self.albums.iter().map(String::as_str)
    }

    /// Create an empty playlist under `name`.
    pub fn create_playlist(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::EmptyPlaylistName);
        }
        if self.playlists.contains_key(name) {
            return Err(Error::DuplicatePlaylist(name.to_string()));
        }
        self.playlists.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Delete the playlist named `name`. No-op when absent.
    pub fn delete_playlist(&mut self, name: &str) -> bool {
        self.playlists.remove(name).is_some()
    }

    /// Sorted playlist names.
    pub fn playlist_names(&self) -> impl Iterator<Item = &str> {
        self.playlists.keys().map(String::as_str)
    }

    /// The playlist map, for persistence.
    pub fn playlists(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.playlists
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
