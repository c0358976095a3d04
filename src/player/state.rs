//! Playback state types.

use std::time::Duration;

/// Transport state of the playback state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Repeat mode, cycled Off -> One -> All -> Off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Repeat current track
    One,
    /// Repeat entire library
    All,
}

impl RepeatMode {
    /// The next mode in the cycle.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

/// Which loop point a set request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPoint {
    A,
    B,
}

/// A/B loop region within the current track.
///
/// Enforced only while both bounds are set and `b > a`; an inverted
/// region is inert rather than an error. Track-scoped: cleared whenever
/// the loaded track changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopRegion {
    pub a: Option<Duration>,
    pub b: Option<Duration>,
}

impl LoopRegion {
    /// Set one of the loop points at the given playback position.
    pub fn set(&mut self, point: LoopPoint, at: Duration) {
        match point {
            LoopPoint::A => self.a = Some(at),
            LoopPoint::B => self.b = Some(at),
        }
    }

    /// Reset both points to unset.
    pub fn clear(&mut self) {
        self.a = None;
        self.b = None;
    }

    /// The seek target when `position` has crossed an active region's
    /// end, or `None` when the region is unset, inverted, or not yet
    /// reached.
    pub fn wrap_target(&self, position: Duration) -> Option<Duration> {
        match (self.a, self.b) {
            (Some(a), Some(b)) if b > a && position >= b => Some(a),
            _ => None,
        }
    }
}

/// Observable playback state.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    /// Index of the loaded track, `None` only while the library is empty
    pub current: Option<usize>,
    /// Transport state
    pub transport: Transport,
    /// Shuffle flag
    pub shuffle: bool,
    /// Repeat mode
    pub repeat: RepeatMode,
    /// A/B loop region for the current track
    pub loop_region: LoopRegion,
    /// Last observed playback position
    pub position: Duration,
    /// Duration of the current track as reported by the media subsystem
    pub duration: Duration,
}

impl PlaybackState {
    /// Format the last observed position as `m:ss`.
    pub fn position_str(&self) -> String {
        format_timestamp(self.position)
    }

    /// Format the current track duration as `m:ss`.
    pub fn duration_str(&self) -> String {
        format_timestamp(self.duration)
    }
}

/// Format a playback timestamp as `minutes:seconds` with zero-padded
/// seconds.
pub fn format_timestamp(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(Duration::from_secs(0)), "0:00");
        assert_eq!(format_timestamp(Duration::from_secs(65)), "1:05");
        assert_eq!(format_timestamp(Duration::from_secs(600)), "10:00");
        // No hour grouping: long tracks keep accumulating minutes
        assert_eq!(format_timestamp(Duration::from_secs(3661)), "61:01");
    }

    #[test]
    fn test_repeat_cycle_law() {
        let start = RepeatMode::default();
        assert_eq!(start.next().next().next(), start);
        assert_eq!(RepeatMode::Off.next(), RepeatMode::One);
        assert_eq!(RepeatMode::One.next(), RepeatMode::All);
        assert_eq!(RepeatMode::All.next(), RepeatMode::Off);
    }

    #[test]
    fn test_loop_region_wrap() {
        let mut region = LoopRegion::default();
        region.set(LoopPoint::A, Duration::from_secs(10));
        region.set(LoopPoint::B, Duration::from_secs(20));

        assert_eq!(region.wrap_target(Duration::from_secs(19)), None);
        assert_eq!(
            region.wrap_target(Duration::from_secs(20)),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_inverted_loop_region_is_inert() {
        let region = LoopRegion {
            a: Some(Duration::from_secs(20)),
            b: Some(Duration::from_secs(10)),
        };
        assert_eq!(region.wrap_target(Duration::from_secs(30)), None);
        assert_eq!(region.wrap_target(Duration::from_secs(10)), None);
    }

    #[test]
    fn test_partial_loop_region_is_inert() {
        let region = LoopRegion {
            a: Some(Duration::from_secs(5)),
            b: None,
        };
        assert_eq!(region.wrap_target(Duration::from_secs(60)), None);
    }
}
