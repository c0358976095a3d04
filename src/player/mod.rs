//! The playback controller: the state machine over the loaded track,
//! transport, shuffle/repeat modes, and the A/B loop region.
//!
//! The controller never owns tracks; every sequencing decision queries
//! the [`Library`] passed in by the session, so index bookkeeping stays
//! in one place. Invalid indices are defensive no-ops rather than
//! errors, they can arise from legitimate races between a deletion and
//! a pending boundary action.

mod output;
mod state;

pub use output::{MediaOutput, NullOutput};
pub use state::{
    LoopPoint, LoopRegion, PlaybackState, RepeatMode, Transport, format_timestamp,
};

use std::time::Duration;

use crate::error::{Error, Result};
use crate::library::Library;

/// `previous()` restarts the current track instead of moving back once
/// playback has passed this point.
const RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Drives the audio backend according to transport, shuffle, repeat,
/// and loop-region state.
pub struct PlaybackController {
    output: Box<dyn MediaOutput>,
    state: PlaybackState,
    /// Whether the output currently has a decodable source bound
    source_bound: bool,
}

impl PlaybackController {
    pub fn new(output: Box<dyn MediaOutput>) -> Self {
        Self {
            output,
            state: PlaybackState::default(),
            source_bound: false,
        }
    }

    /// Observable playback state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Load the track at `index`. Silently ignores out-of-range
    /// indices. The loop region is track-scoped and resets when the
    /// loaded track changes; transport is preserved, so a playing
    /// session keeps playing into the new source.
    pub fn load(&mut self, library: &Library, index: usize) {
        let Some(track) = library.get(index) else {
            tracing::debug!("load ignored: index {index} out of range");
            return;
        };

        if self.state.current != Some(index) {
            self.state.loop_region.clear();
        }
        self.state.current = Some(index);
        self.state.position = Duration::ZERO;
        self.source_bound = false;

        match &track.source {
            Some(handle) => match self.output.bind(handle) {
                Ok(()) => {
                    self.source_bound = true;
                    if self.state.transport == Transport::Playing {
                        self.output.play();
                    }
                }
                Err(e) => {
                    // Unsupported or corrupt asset: keep transport untouched
                    tracing::warn!("could not bind {:?}: {e}", track.title);
                }
            },
            None => {
                tracing::debug!(
                    "{:?} is metadata-only; re-ingest the asset to play it",
                    track.title
                );
            }
        }
    }

    /// Toggle between playing and paused. Starting playback with no
    /// bound source loads the current index first; an empty library is
    /// the one user-surfaced failure in the engine.
    pub fn toggle_play(&mut self, library: &Library) -> Result<()> {
        if self.state.transport == Transport::Playing {
            self.output.pause();
            self.state.transport = Transport::Paused;
            return Ok(());
        }

        if !self.source_bound {
            if library.is_empty() {
                return Err(Error::NoTracks);
            }
            let index = self.state.current.unwrap_or(0);
            self.load(library, index);
            if !self.source_bound {
                // Bind failed; stay in the current transport state
                return Ok(());
            }
        }

        self.output.play();
        self.state.transport = Transport::Playing;
        Ok(())
    }

    /// Advance to the next track: uniformly random over the whole
    /// library when shuffling (immediate repeats allowed by contract),
    /// otherwise the next index with wraparound.
    pub fn next(&mut self, library: &Library) {
        if library.is_empty() {
            return;
        }
        let len = library.len();
        let index = if self.state.shuffle {
            let mut rng = rand::rng();
            rand::Rng::random_range(&mut rng, 0..len)
        } else {
            (self.state.current.unwrap_or(0) + 1) % len
        };
        self.load(library, index);
    }

    /// Move to the previous track, or restart the current one when
    /// playback is past the restart threshold.
    pub fn previous(&mut self, library: &Library) {
        if library.is_empty() {
            return;
        }
        if self.state.position > RESTART_THRESHOLD {
            self.output.seek(Duration::ZERO);
            self.state.position = Duration::ZERO;
            return;
        }
        let len = library.len();
        let index = (self.state.current.unwrap_or(0) + len - 1) % len;
        self.load(library, index);
    }

    /// Flip the shuffle flag. Does not affect the current track.
    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
    }

    /// Cycle the repeat mode: Off -> One -> All -> Off.
    pub fn toggle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.next();
    }

    /// Store a loop point at the current playback position.
    pub fn set_loop_point(&mut self, point: LoopPoint) {
        let at = self.state.position;
        self.state.loop_region.set(point, at);
    }

    /// Reset both loop points.
    pub fn clear_loop_points(&mut self) {
        self.state.loop_region.clear();
    }

    /// Seek the bound source to an absolute position.
    pub fn seek(&mut self, position: Duration) {
        self.output.seek(position);
        self.state.position = position;
    }

    /// Progress callback from the media subsystem. Loop enforcement
    /// takes precedence over everything else while a region is active.
    pub fn on_progress(&mut self, position: Duration, duration: Duration) {
        self.state.position = position;
        self.state.duration = duration;

        if let Some(target) = self.state.loop_region.wrap_target(position) {
            self.output.seek(target);
            self.state.position = target;
        }
    }

    /// End-of-track callback from the media subsystem.
    pub fn on_track_end(&mut self, library: &Library) {
        match self.state.repeat {
            RepeatMode::One => {
                self.output.seek(Duration::ZERO);
                self.state.position = Duration::ZERO;
                self.output.play();
                self.state.transport = Transport::Playing;
            }
            RepeatMode::All => self.next(library),
            RepeatMode::Off => {
                // Successor check uses the static sequence even when
                // shuffling; next() itself may then pick at random
                let has_next = self
                    .state
                    .current
                    .is_some_and(|i| i + 1 < library.len());
                if has_next {
                    self.next(library);
                } else {
                    self.output.pause();
                    self.state.transport = Transport::Paused;
                }
            }
        }
    }

    /// Re-establish the cursor invariant after the track at `removed`
    /// left the library. The library has already been mutated.
    pub fn on_removed(&mut self, library: &Library, removed: usize) {
        let Some(current) = self.state.current else {
            return;
        };

        if removed == current {
            // The loaded track is gone; the reload below is a track
            // change even when the index value stays the same
            self.state.loop_region.clear();
            if library.is_empty() {
                self.state.current = None;
                self.state.transport = Transport::Stopped;
                self.state.position = Duration::ZERO;
                self.source_bound = false;
                self.output.pause();
            } else {
                self.state.current = None;
                self.load(library, removed.saturating_sub(1));
            }
        } else if removed < current {
            self.state.current = Some(current - 1);
        }
    }
}
