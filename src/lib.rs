//! Tunedeck - a local audio library and playback engine.
//!
//! The crate owns canonical track and playlist data, resolves metadata
//! from raw audio assets (embedded tags with a filename-heuristic
//! fallback), and drives the playback state machine: sequencing,
//! shuffle/repeat, and bounded A/B loop regions. UI rendering, input
//! wiring, and the audio decode pipeline stay with the host; the engine
//! talks to them through [`session::UiEvent`]s and the
//! [`player::MediaOutput`] seam.
//!
//! # Typical embedding
//!
//! ```no_run
//! use tunedeck::model::AudioAsset;
//! use tunedeck::player::NullOutput;
//! use tunedeck::session::Session;
//! use tunedeck::store::JsonFileStore;
//!
//! # async fn run() -> tunedeck::error::Result<()> {
//! let store = JsonFileStore::open_default()?;
//! let (mut session, _events) = Session::new(store, Box::new(NullOutput));
//!
//! session.ingest(vec![AudioAsset::from_path("/music/song.flac")]).await?;
//! session.toggle_play();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod player;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
pub use library::{Library, TrackEdit};
pub use metadata::MetadataRecord;
pub use model::{Artwork, AssetHandle, AudioAsset, Track};
pub use player::{
    LoopPoint, LoopRegion, MediaOutput, NullOutput, PlaybackController, PlaybackState,
    RepeatMode, Transport,
};
pub use session::{Session, UiEvent};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
