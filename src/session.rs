//! A playback session: the single serialization point for library and
//! playback-state mutation.
//!
//! Library edits and media-subsystem callbacks both touch the current
//! index, so every index-touching operation goes through one `Session`
//! and is indivisible from the caller's perspective. Boundary feedback
//! (render events, progress ticks, the empty-library prompt) flows out
//! over a crossbeam channel.

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::library::{Library, TrackEdit};
use crate::metadata;
use crate::model::{AudioAsset, Track};
use crate::player::{LoopPoint, MediaOutput, PlaybackController, PlaybackState};
use crate::store::{self, KeyValueStore};

/// Events delivered to the boundary for rendering and user feedback.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Full track list plus the current index, for external rendering
    Library {
        tracks: Vec<Track>,
        current: Option<usize>,
    },
    /// Sorted derived indices
    Indices {
        artists: Vec<String>,
        albums: Vec<String>,
        playlists: Vec<String>,
    },
    /// Elapsed/total formatted as `m:ss`
    Progress { elapsed: String, total: String },
    /// Playback was requested on an empty library; present as a prompt
    NoTracks,
}

/// An active session over one library, one playback controller, and
/// one durable store.
pub struct Session<S: KeyValueStore> {
    library: Library,
    player: PlaybackController,
    store: S,
    events: Sender<UiEvent>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session, restoring the library and playlists from the
    /// store. Restored tracks are metadata-only; a corrupt payload is
    /// logged and treated as absent rather than failing startup.
    pub fn new(store: S, output: Box<dyn MediaOutput>) -> (Self, Receiver<UiEvent>) {
        let tracks = store::load_library(&store).unwrap_or_else(|e| {
            tracing::error!("could not restore library: {e}");
            Vec::new()
        });
        let playlists = store::load_playlists(&store).unwrap_or_else(|e| {
            tracing::error!("could not restore playlists: {e}");
            Default::default()
        });
        let library = Library::from_parts(tracks, playlists);

        let (events, receiver) = unbounded();
        let mut session = Self {
            library,
            player: PlaybackController::new(output),
            store,
            events,
        };

        if !session.library.is_empty() {
            session.player.load(&session.library, 0);
        }
        session.emit_library();
        session.emit_indices();

        (session, receiver)
    }

    /// The library owned by this session.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Observable playback state.
    pub fn state(&self) -> &PlaybackState {
        self.player.state()
    }

    // ------------------------------------------------------------------
    // Library mutation
    // ------------------------------------------------------------------

    /// Ingest assets in input order, appending one track per asset.
    ///
    /// Resolution is awaited per asset before the next one starts, so
    /// the final ordering never depends on resolution latency. When the
    /// library was previously empty, index 0 is loaded (not played).
    pub async fn ingest(&mut self, assets: Vec<AudioAsset>) -> Result<()> {
        if assets.is_empty() {
            return Ok(());
        }
        let was_empty = self.library.is_empty();

        let count = assets.len();
        for asset in assets {
            let record = metadata::resolve(asset.clone()).await;
            self.library.push(Track::from_record(record, asset.handle));
        }
        tracing::info!("ingested {count} asset(s)");

        self.library.rebuild_indices();
        store::save_library(&mut self.store, &self.library)?;

        if was_empty {
            self.player.load(&self.library, 0);
        }
        self.emit_library();
        self.emit_indices();
        Ok(())
    }

    /// Edit track fields in place. Blank fields retain prior values.
    pub fn edit_track(&mut self, index: usize, edit: &TrackEdit) -> Result<()> {
        if !self.library.edit(index, edit) {
            return Ok(());
        }
        store::save_library(&mut self.store, &self.library)?;
        self.emit_library();
        self.emit_indices();
        Ok(())
    }

    /// Delete the track at `index` and re-establish the cursor
    /// invariant. Confirmation happens at the boundary before this is
    /// called.
    pub fn delete_track(&mut self, index: usize) -> Result<()> {
        if self.library.remove(index).is_none() {
            return Ok(());
        }
        self.player.on_removed(&self.library, index);
        store::save_library(&mut self.store, &self.library)?;
        self.emit_library();
        self.emit_indices();
        Ok(())
    }

    /// Create an empty named playlist.
    pub fn create_playlist(&mut self, name: &str) -> Result<()> {
        self.library.create_playlist(name)?;
        store::save_playlists(&mut self.store, &self.library)?;
        self.emit_indices();
        Ok(())
    }

    /// Delete a named playlist. No-op when absent.
    pub fn delete_playlist(&mut self, name: &str) -> Result<()> {
        if !self.library.delete_playlist(name) {
            return Ok(());
        }
        store::save_playlists(&mut self.store, &self.library)?;
        self.emit_indices();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Load the track at `index` without changing transport.
    pub fn load(&mut self, index: usize) {
        self.player.load(&self.library, index);
        self.emit_library();
    }

    /// Toggle play/pause. An empty library becomes a [`UiEvent::NoTracks`]
    /// prompt instead of an error.
    pub fn toggle_play(&mut self) {
        match self.player.toggle_play(&self.library) {
            Ok(()) => {}
            Err(Error::NoTracks) => self.emit(UiEvent::NoTracks),
            Err(e) => tracing::warn!("toggle_play failed: {e}"),
        }
    }

    /// Advance to the next track.
    pub fn next(&mut self) {
        self.player.next(&self.library);
        self.emit_library();
    }

    /// Move to the previous track (or restart the current one).
    pub fn previous(&mut self) {
        self.player.previous(&self.library);
        self.emit_library();
    }

    pub fn toggle_shuffle(&mut self) {
        self.player.toggle_shuffle();
    }

    pub fn toggle_repeat(&mut self) {
        self.player.toggle_repeat();
    }

    /// Store a loop point at the current playback position.
    pub fn set_loop_point(&mut self, point: LoopPoint) {
        self.player.set_loop_point(point);
    }

    pub fn clear_loop_points(&mut self) {
        self.player.clear_loop_points();
    }

    /// Seek the current track to an absolute position.
    pub fn seek(&mut self, position: Duration) {
        self.player.seek(position);
    }

    // ------------------------------------------------------------------
    // Media subsystem callbacks
    // ------------------------------------------------------------------

    /// Progress tick from the media subsystem. Applies loop enforcement
    /// and republishes the formatted position.
    pub fn on_progress(&mut self, position: Duration, duration: Duration) {
        self.player.on_progress(position, duration);
        let state = self.player.state();
        self.emit(UiEvent::Progress {
            elapsed: state.position_str(),
            total: state.duration_str(),
        });
    }

    /// End-of-track callback from the media subsystem.
    pub fn on_track_end(&mut self) {
        self.player.on_track_end(&self.library);
        self.emit_library();
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    fn emit(&self, event: UiEvent) {
        // A detached boundary is fine; the engine keeps running
        let _ = self.events.send(event);
    }

    fn emit_library(&self) {
        self.emit(UiEvent::Library {
            tracks: self.library.tracks().to_vec(),
            current: self.player.state().current,
        });
    }

    fn emit_indices(&self) {
        self.emit(UiEvent::Indices {
            artists: self.library.artists().map(str::to_string).collect(),
            albums: self.library.albums().map(str::to_string).collect(),
            playlists: self.library.playlist_names().map(str::to_string).collect(),
        });
    }
}
