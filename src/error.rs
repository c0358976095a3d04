//! Crate-wide error types.
//!
//! No error here is fatal: invalid indices are absorbed as no-ops
//! before an error is ever constructed, playlist-name rejections and
//! the empty-library playback attempt are surfaced to the boundary as
//! non-blocking user feedback, and store failures propagate so the
//! host can decide whether to retry.

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level engine error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error from the persistence adapter
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error from the persistence adapter
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Playback was requested on an empty library
    #[error("No tracks loaded")]
    NoTracks,

    /// Playlist creation with an empty name
    #[error("Playlist name cannot be empty")]
    EmptyPlaylistName,

    /// Playlist creation with a name already in use
    #[error("Playlist already exists: {0}")]
    DuplicatePlaylist(String),

    /// Audio backend failure (unsupported or missing asset)
    #[error("Playback error: {0}")]
    Playback(String),
}

impl Error {
    /// Create a playback error.
    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicatePlaylist("Favourites".to_string());
        assert!(err.to_string().contains("Favourites"));
    }

    #[test]
    fn test_playback_helper() {
        let err = Error::playback("no source bound");
        assert!(err.to_string().contains("no source bound"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
