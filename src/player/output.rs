//! Seam to the audio backend.
//!
//! The engine drives playback through this trait; the actual decode and
//! output pipeline lives with the host (media element, cpal stack,
//! whatever the platform offers). Progress and end-of-track callbacks
//! flow back through the session, not through this trait.

use std::time::Duration;

use crate::error::Result;
use crate::model::AssetHandle;

/// Commands the playback controller issues to the audio backend.
pub trait MediaOutput: Send {
    /// Bind the output to a new audio source. Fails when the backend
    /// cannot decode the asset; the controller logs and leaves transport
    /// unchanged.
    fn bind(&mut self, handle: &AssetHandle) -> Result<()>;

    /// Start or resume playback of the bound source.
    fn play(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Seek the bound source to an absolute position.
    fn seek(&mut self, position: Duration);
}

/// An output that accepts every command and plays nothing. Useful for
/// headless sessions and tests.
#[derive(Debug, Default)]
pub struct NullOutput;

impl MediaOutput for NullOutput {
    fn bind(&mut self, _handle: &AssetHandle) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _position: Duration) {}
}
