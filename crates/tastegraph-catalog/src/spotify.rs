//! Spotify Web API client.
//!
//! Covers the four calls the song graph needs: track search, track lookup,
//! audio features (single and batch) and recommendations. Authentication is
//! a bearer token supplied by configuration; obtaining or refreshing it is
//! left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use tastegraph_core::model::{AlbumImage, FeatureVector, TrackId, TrackSummary};

use crate::error::{CatalogError, CatalogResult};
use crate::resilience::RateLimiter;
use crate::source::{FeatureSource, TrackCatalog};

const SOURCE_NAME: &str = "Spotify";

/// Most seed tracks the recommendations endpoint accepts.
pub const MAX_SEED_TRACKS: usize = 5;

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    items: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
    album: Option<ApiAlbum>,
    preview_url: Option<String>,
    #[serde(default)]
    popularity: u32,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    #[serde(default)]
    images: Vec<AlbumImage>,
}

#[derive(Debug, Deserialize)]
struct AudioFeaturesResponse {
    #[serde(default)]
    audio_features: Vec<Option<FeatureVector>>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<ApiTrack>,
}

impl From<ApiTrack> for TrackSummary {
    fn from(track: ApiTrack) -> Self {
        Self {
            id: TrackId::new(track.id),
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            images: track.album.map(|a| a.images).unwrap_or_default(),
            preview_url: track.preview_url,
            popularity: track.popularity,
        }
    }
}

/// Pair a batch response with the ids that were asked for.
///
/// Missing trailing entries become `None`; surplus entries are dropped.
fn align_batch(
    requested: usize,
    mut features: Vec<Option<FeatureVector>>,
) -> Vec<Option<FeatureVector>> {
    features.resize(requested, None);
    features
}

/// Error for a non-success response status, or `None` on success.
fn status_error(status: StatusCode, entity: &str) -> Option<CatalogError> {
    let source_name = SOURCE_NAME.to_string();
    match status {
        status if status.is_success() => None,
        StatusCode::UNAUTHORIZED => Some(CatalogError::Unauthorized { source_name }),
        StatusCode::TOO_MANY_REQUESTS => Some(CatalogError::RateLimited { source_name }),
        StatusCode::NOT_FOUND => Some(CatalogError::NotFound {
            entity: entity.to_string(),
            source_name,
        }),
        status => Some(CatalogError::Http {
            source_name,
            message: format!("{} for {}", status, entity),
        }),
    }
}

/// A track without features answers 404; that is an absent value, not a failure.
fn absent_when_not_found<T>(result: CatalogResult<Option<T>>) -> CatalogResult<Option<T>> {
    match result {
        Err(e) if e.is_not_found() => Ok(None),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Spotify Web API client.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base: Url,
    access_token: String,
    rate_limiter: RateLimiter,
}

impl SpotifyClient {
    /// Create a client for the API rooted at `api_base`.
    ///
    /// # Errors
    /// Returns an error if the base URL is unusable or the HTTP client
    /// cannot be created.
    pub fn new(api_base: &str, access_token: impl Into<String>) -> CatalogResult<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| CatalogError::InvalidEndpoint(format!("{}: {}", api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::InvalidEndpoint(api_base.to_string()));
        }

        let http = Client::builder()
            .user_agent("tastegraph/0.1.0 (https://github.com/oxur/tastegraph)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base,
            access_token: access_token.into(),
            rate_limiter: RateLimiter::new(10),
        })
    }

    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns [`CatalogError::MissingToken`] when no token is configured.
    pub fn from_config(config: &crate::Config) -> CatalogResult<Self> {
        let token = config
            .spotify_access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(CatalogError::MissingToken)?;
        Self::new(&config.spotify_api_base, token)
    }

    fn endpoint(&self, segments: &[&str]) -> CatalogResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        entity: &str,
    ) -> CatalogResult<T> {
        self.rate_limiter.acquire().await;

        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        if let Some(error) = status_error(response.status(), entity) {
            return Err(error);
        }

        response.json().await.map_err(|e| CatalogError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TrackCatalog for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<TrackSummary>> {
        let url = self.endpoint(&["search"])?;
        let response: SearchResponse = self
            .get_json(
                url,
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
                "search results",
            )
            .await?;

        Ok(response
            .tracks
            .map(|page| page.items.into_iter().map(TrackSummary::from).collect())
            .unwrap_or_default())
    }

    async fn track(&self, id: &TrackId) -> CatalogResult<TrackSummary> {
        let url = self.endpoint(&["tracks", id.as_str()])?;
        let track: ApiTrack = self
            .get_json(url, &[], &format!("track {}", id))
            .await?;
        Ok(track.into())
    }

    async fn recommendations(
        &self,
        seeds: &[TrackId],
        limit: u32,
    ) -> CatalogResult<Vec<TrackSummary>> {
        if seeds.is_empty() {
            return Ok(Vec::new());
        }
        let seed_tracks = seeds
            .iter()
            .take(MAX_SEED_TRACKS)
            .map(TrackId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let url = self.endpoint(&["recommendations"])?;
        let response: RecommendationsResponse = self
            .get_json(
                url,
                &[("seed_tracks", seed_tracks), ("limit", limit.to_string())],
                "recommendations",
            )
            .await?;
        Ok(response.tracks.into_iter().map(TrackSummary::from).collect())
    }
}

#[async_trait]
impl FeatureSource for SpotifyClient {
    async fn features(&self, id: &TrackId) -> CatalogResult<Option<FeatureVector>> {
        let url = self.endpoint(&["audio-features", id.as_str()])?;
        absent_when_not_found(
            self.get_json::<Option<FeatureVector>>(url, &[], &format!("audio features for {}", id))
                .await,
        )
    }

    async fn features_batch(&self, ids: &[TrackId]) -> CatalogResult<Vec<Option<FeatureVector>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.iter().map(TrackId::as_str).collect::<Vec<_>>().join(",");
        let url = self.endpoint(&["audio-features"])?;
        let response: AudioFeaturesResponse = self
            .get_json(url, &[("ids", joined)], "audio features")
            .await?;
        Ok(align_batch(ids.len(), response.audio_features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SpotifyClient {
        SpotifyClient::new("https://api.spotify.com/v1", "token").unwrap()
    }

    #[test]
    fn test_client_creation() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("SpotifyClient"));
        assert!(debug.contains("RateLimiter"));
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        assert!(matches!(
            SpotifyClient::new("not a url", "token"),
            Err(CatalogError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            SpotifyClient::new("mailto:someone@example.com", "token"),
            Err(CatalogError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_from_config_requires_token() {
        let mut config = crate::Config::default();
        assert!(matches!(
            SpotifyClient::from_config(&config),
            Err(CatalogError::MissingToken)
        ));
        config.spotify_access_token = Some("   ".to_string());
        assert!(matches!(
            SpotifyClient::from_config(&config),
            Err(CatalogError::MissingToken)
        ));
        config.spotify_access_token = Some("abc".to_string());
        assert!(SpotifyClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let url = client().endpoint(&["audio-features", "abc123"]).unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/audio-features/abc123");

        let trailing = SpotifyClient::new("http://localhost:8080/v1/", "t").unwrap();
        let url = trailing.endpoint(&["search"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/search");
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let url = client().endpoint(&["tracks", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/tracks/a%2Fb");
    }

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "tracks": {
                "items": [{
                    "id": "3n3Ppam7vgaVa1iaRUc9Lp",
                    "name": "Mr. Brightside",
                    "artists": [{"id": "0C0XlULifJtAgn6ZNCW2eu", "name": "The Killers"}],
                    "album": {
                        "id": "4OHNH3sDzIxnmUADXzv2kT",
                        "name": "Hot Fuss",
                        "images": [
                            {"url": "https://i.scdn.co/640", "height": 640, "width": 640},
                            {"url": "https://i.scdn.co/300", "height": 300, "width": 300},
                            {"url": "https://i.scdn.co/64", "height": 64, "width": 64}
                        ]
                    },
                    "preview_url": null,
                    "popularity": 87
                }]
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let tracks: Vec<TrackSummary> = response
            .tracks
            .unwrap()
            .items
            .into_iter()
            .map(TrackSummary::from)
            .collect();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id.as_str(), "3n3Ppam7vgaVa1iaRUc9Lp");
        assert_eq!(tracks[0].artist_line(), "The Killers");
        assert_eq!(tracks[0].cover_url(), Some("https://i.scdn.co/640"));
        assert_eq!(tracks[0].thumbnail_url(), Some("https://i.scdn.co/64"));
        assert_eq!(tracks[0].popularity, 87);
        assert!(tracks[0].preview_url.is_none());
    }

    #[test]
    fn test_search_response_without_tracks() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.tracks.is_none());
    }

    #[test]
    fn test_audio_features_with_nulls() {
        let json = r#"{"audio_features": [
            {"danceability": 0.5, "energy": 0.6, "valence": 0.7, "tempo": 120.0,
             "acousticness": 0.1, "instrumentalness": 0.0},
            null
        ]}"#;
        let response: AudioFeaturesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.audio_features.len(), 2);
        assert!(response.audio_features[0].is_some());
        assert!(response.audio_features[1].is_none());
    }

    #[test]
    fn test_align_batch() {
        let f = FeatureVector {
            danceability: 0.5,
            energy: 0.5,
            valence: 0.5,
            tempo: 100.0,
            acousticness: 0.5,
            instrumentalness: 0.5,
        };
        assert_eq!(align_batch(3, vec![Some(f)]), vec![Some(f), None, None]);
        assert_eq!(align_batch(1, vec![None, Some(f)]), vec![None]);
    }

    #[tokio::test]
    async fn test_empty_requests_skip_network() {
        let client = client();
        assert!(client.features_batch(&[]).await.unwrap().is_empty());
        assert!(client.recommendations(&[], 10).await.unwrap().is_empty());
    }

    #[test]
    fn test_status_error_success_is_none() {
        assert!(status_error(StatusCode::OK, "track abc").is_none());
        assert!(status_error(StatusCode::NO_CONTENT, "track abc").is_none());
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "search results"),
            Some(CatalogError::Unauthorized { .. })
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "search results"),
            Some(CatalogError::RateLimited { .. })
        ));
        match status_error(StatusCode::NOT_FOUND, "track abc") {
            Some(CatalogError::NotFound { entity, source_name }) => {
                assert_eq!(entity, "track abc");
                assert_eq!(source_name, "Spotify");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        match status_error(StatusCode::BAD_GATEWAY, "recommendations") {
            Some(CatalogError::Http { message, .. }) => {
                assert!(message.contains("502"));
                assert!(message.contains("recommendations"));
            }
            other => panic!("expected Http, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_features_are_absent_not_errors() {
        let not_found = status_error(StatusCode::NOT_FOUND, "audio features for abc")
            .map_or(Ok(Some(0)), Err);
        assert!(matches!(absent_when_not_found(not_found), Ok(None)));

        let unauthorized = status_error(StatusCode::UNAUTHORIZED, "audio features for abc")
            .map_or(Ok(Some(0)), Err);
        assert!(matches!(
            absent_when_not_found(unauthorized),
            Err(CatalogError::Unauthorized { .. })
        ));

        assert!(matches!(absent_when_not_found::<u8>(Ok(Some(7))), Ok(Some(7))));
    }
}
