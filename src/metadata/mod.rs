//! Audio asset metadata resolution.
//!
//! Uses the lofty crate for format-independent tag access. Resolution
//! never fails: when an asset has no readable tags the filename is
//! parsed against the common `Artist - Album - Title` pattern, and
//! anything less structured degrades to title-only with the Unknown
//! defaults.
//!
//! Embedded front covers are decoded into `data:<mime>;base64,` URIs so
//! the boundary can display them without touching the asset again.

use std::io::Cursor;

use anyhow::{Context, Result};
use base64::prelude::*;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Accessor;

use crate::model::{Artwork, AssetHandle, AudioAsset, UNKNOWN_ALBUM, UNKNOWN_ARTIST, file_stem};

/// Normalized metadata descriptor produced for every ingested asset.
///
/// All fields are mandatory (defaulted at this boundary) so downstream
/// code never branches on field presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Artwork,
}

/// Resolve metadata for an asset. Never fails; always returns a
/// best-effort record.
///
/// Tag parsing is blocking I/O, so it runs on the blocking pool. Ingest
/// awaits each resolution before starting the next, which is what keeps
/// library order deterministic.
pub async fn resolve(asset: AudioAsset) -> MetadataRecord {
    let name = asset.name.clone();
    match tokio::task::spawn_blocking(move || resolve_blocking(&asset)).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("metadata task for {name:?} failed: {e}");
            parse_filename(&name)
        }
    }
}

/// Synchronous resolution: embedded tags first, filename heuristic as
/// the fallback.
pub fn resolve_blocking(asset: &AudioAsset) -> MetadataRecord {
    match read_tags(asset) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("no readable tags in {:?}: {e:#}", asset.name);
            parse_filename(&asset.name)
        }
    }
}

/// Read embedded tag metadata. Missing individual fields fall back to
/// per-field defaults; a missing or unreadable tag block is an error so
/// the caller can switch to the filename heuristic.
fn read_tags(asset: &AudioAsset) -> Result<MetadataRecord> {
    let tagged_file = match &asset.handle {
        AssetHandle::File(path) => Probe::open(path)
            .context("Failed to open file for probing")?
            .read()
            .context("Failed to read file metadata")?,
        AssetHandle::Memory(bytes) => Probe::new(Cursor::new(bytes.as_ref()))
            .guess_file_type()
            .context("Failed to identify audio format")?
            .read()
            .context("Failed to read asset metadata")?,
    };

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .context("No tags present")?;

    let title = tag
        .title()
        .map(|s| s.to_string())
        .unwrap_or_else(|| file_stem(&asset.name).to_string());

    let artist = tag
        .artist()
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    let album = tag
        .album()
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    // Prefer the front cover, fall back to the first picture
    let pictures = tag.pictures();
    let artwork = pictures
        .iter()
        .find(|p| p.pic_type() == lofty::picture::PictureType::CoverFront)
        .or_else(|| pictures.first())
        .map(|p| Artwork::DataUri(picture_data_uri(p)))
        .unwrap_or_default();

    Ok(MetadataRecord {
        title,
        artist,
        album,
        artwork,
    })
}

/// Encode an embedded picture as a displayable data URI.
fn picture_data_uri(picture: &lofty::picture::Picture) -> String {
    let mime_type = match picture.mime_type() {
        Some(lofty::picture::MimeType::Jpeg) => "image/jpeg",
        Some(lofty::picture::MimeType::Png) => "image/png",
        Some(lofty::picture::MimeType::Gif) => "image/gif",
        Some(lofty::picture::MimeType::Bmp) => "image/bmp",
        Some(lofty::picture::MimeType::Tiff) => "image/tiff",
        _ => "image/jpeg", // Default assumption
    };
    format!(
        "data:{};base64,{}",
        mime_type,
        BASE64_STANDARD.encode(picture.data())
    )
}

/// Heuristic fallback: parse the extension-stripped filename against
/// the `Artist - Album - Title` pattern.
///
/// With three or more `" - "` segments the remainder past the album is
/// re-joined into the title; two segments mean artist and title; fewer
/// leave the whole stem as the title.
pub fn parse_filename(name: &str) -> MetadataRecord {
    let stem = file_stem(name);
    let parts: Vec<&str> = stem.split(" - ").collect();

    let (artist, album, title) = match parts.len() {
        n if n >= 3 => (
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2..].join(" - "),
        ),
        2 => (
            parts[0].to_string(),
            UNKNOWN_ALBUM.to_string(),
            parts[1].to_string(),
        ),
        _ => (
            UNKNOWN_ARTIST.to_string(),
            UNKNOWN_ALBUM.to_string(),
            stem.to_string(),
        ),
    };

    MetadataRecord {
        title,
        artist,
        album,
        artwork: Artwork::Placeholder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AudioAsset;

    #[test]
    fn test_parse_filename_three_parts() {
        let rec = parse_filename("Artist - Album - Track Title.mp3");
        assert_eq!(rec.artist, "Artist");
        assert_eq!(rec.album, "Album");
        assert_eq!(rec.title, "Track Title");
        assert_eq!(rec.artwork, Artwork::Placeholder);
    }

    #[test]
    fn test_parse_filename_joins_extra_segments() {
        let rec = parse_filename("Artist - Album - Part 1 - Part 2.flac");
        assert_eq!(rec.artist, "Artist");
        assert_eq!(rec.album, "Album");
        assert_eq!(rec.title, "Part 1 - Part 2");
    }

    #[test]
    fn test_parse_filename_two_parts() {
        let rec = parse_filename("Artist - Song.ogg");
        assert_eq!(rec.artist, "Artist");
        assert_eq!(rec.album, UNKNOWN_ALBUM);
        assert_eq!(rec.title, "Song");
    }

    #[test]
    fn test_parse_filename_single_part() {
        let rec = parse_filename("SoloTitle.mp3");
        assert_eq!(rec.artist, UNKNOWN_ARTIST);
        assert_eq!(rec.album, UNKNOWN_ALBUM);
        assert_eq!(rec.title, "SoloTitle");
    }

    #[test]
    fn test_resolve_blocking_falls_back_on_garbage() {
        let asset = AudioAsset::from_bytes("Band - LP - Tune.mp3", vec![0u8; 64]);
        let rec = resolve_blocking(&asset);
        assert_eq!(rec.artist, "Band");
        assert_eq!(rec.album, "LP");
        assert_eq!(rec.title, "Tune");
    }

    #[test]
    fn test_read_tags_rejects_non_audio() {
        let asset = AudioAsset::from_bytes("notes.txt", b"just some text".to_vec());
        assert!(read_tags(&asset).is_err());
    }

    #[tokio::test]
    async fn test_resolve_never_fails() {
        let asset = AudioAsset::from_bytes("Mystery.wav", vec![1, 2, 3]);
        let rec = resolve(asset).await;
        assert_eq!(rec.title, "Mystery");
        assert_eq!(rec.artist, UNKNOWN_ARTIST);
    }
}
