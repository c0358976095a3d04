//! Test utilities and fixtures for tunedeck tests.
//!
//! Provides mock factories and a recording audio output so state-machine
//! tests can assert on the commands the controller issued.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::model::{AssetHandle, AudioAsset, Artwork, Track};
use crate::player::MediaOutput;

/// A playable track with the given metadata and a dummy in-memory asset.
pub fn mock_track(title: &str, artist: &str, album: &str) -> Track {
    Track {
        source: Some(AssetHandle::Memory(vec![0u8; 16].into())),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        artwork: Artwork::Placeholder,
    }
}

/// An asset whose bytes are not valid audio, forcing the resolver onto
/// the filename heuristic. Resolution stays deterministic, which is
/// what ingest-ordering tests need.
pub fn garbage_asset(name: &str) -> AudioAsset {
    AudioAsset::from_bytes(name, vec![0u8; 32])
}

/// A command the controller sent to its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCall {
    Bind,
    Play,
    Pause,
    Seek(Duration),
}

/// Audio output that records every command. Clones share the same call
/// log, so tests keep a handle while the controller owns the boxed
/// output.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    calls: Arc<Mutex<Vec<OutputCall>>>,
    fail_bind: bool,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output whose bind always fails, simulating an unsupported or
    /// corrupt asset.
    pub fn failing() -> Self {
        Self {
            fail_bind: true,
            ..Self::default()
        }
    }
}

/// Snapshot of the commands recorded so far.
pub fn recorded_calls(output: &RecordingOutput) -> Vec<OutputCall> {
    output.calls.lock().expect("call log poisoned").clone()
}

impl MediaOutput for RecordingOutput {
    fn bind(&mut self, _handle: &AssetHandle) -> Result<()> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(OutputCall::Bind);
        if self.fail_bind {
            return Err(Error::playback("decode failed"));
        }
        Ok(())
    }

    fn play(&mut self) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(OutputCall::Play);
    }

    fn pause(&mut self) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(OutputCall::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(OutputCall::Seek(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_is_playable() {
        let track = mock_track("T", "A", "B");
        assert!(track.playable());
        assert_eq!(track.artist, "A");
    }

    #[test]
    fn test_recording_output_shares_log_across_clones() {
        let mut output = RecordingOutput::new();
        let handle = output.clone();
        output.play();
        output.seek(Duration::from_secs(3));
        assert_eq!(
            recorded_calls(&handle),
            vec![OutputCall::Play, OutputCall::Seek(Duration::from_secs(3))]
        );
    }

    #[test]
    fn test_failing_output_rejects_bind() {
        let mut output = RecordingOutput::failing();
        let handle = AssetHandle::Memory(vec![0u8].into());
        assert!(output.bind(&handle).is_err());
    }
}
