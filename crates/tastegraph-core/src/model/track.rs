use serde::{Deserialize, Serialize};

use crate::model::ids::TrackId;

/// One cover-art rendition of an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A search result from the track catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: TrackId,
    pub name: String,

    /// Artist display names, in credit order.
    pub artists: Vec<String>,

    /// Album cover art, largest first.
    pub images: Vec<AlbumImage>,

    /// 30-second preview clip, when the catalog offers one.
    pub preview_url: Option<String>,

    /// Catalog popularity, 0 to 100.
    pub popularity: u32,
}

impl TrackSummary {
    #[must_use]
    pub fn new(id: impl Into<TrackId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artists: Vec::new(),
            images: Vec::new(),
            preview_url: None,
            popularity: 0,
        }
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artists.push(artist.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(AlbumImage {
            url: url.into(),
            width: None,
            height: None,
        });
        self
    }

    /// All artist names joined with `", "`.
    #[must_use]
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Largest cover image, used on graph nodes.
    #[must_use]
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }

    /// Smallest cover image (the third rendition), used in result lists.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.images.get(2).map(|image| image.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_line_joins_names() {
        let track = TrackSummary::new("t1", "Under Pressure")
            .with_artist("Queen")
            .with_artist("David Bowie");
        assert_eq!(track.artist_line(), "Queen, David Bowie");
    }

    #[test]
    fn test_artist_line_empty() {
        assert_eq!(TrackSummary::new("t1", "Untitled").artist_line(), "");
    }

    #[test]
    fn test_cover_and_thumbnail() {
        let track = TrackSummary::new("t1", "Song")
            .with_image("https://i.scdn.co/640")
            .with_image("https://i.scdn.co/300")
            .with_image("https://i.scdn.co/64");
        assert_eq!(track.cover_url(), Some("https://i.scdn.co/640"));
        assert_eq!(track.thumbnail_url(), Some("https://i.scdn.co/64"));
    }

    #[test]
    fn test_thumbnail_missing_when_fewer_than_three_images() {
        let track = TrackSummary::new("t1", "Song").with_image("https://i.scdn.co/640");
        assert!(track.thumbnail_url().is_none());
    }
}
