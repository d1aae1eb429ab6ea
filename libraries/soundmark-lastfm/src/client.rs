//! Last.fm HTTP client
//!
//! One GET endpoint, method selected by query parameter. The service
//! wraps everything in nested envelopes and is loose with types
//! (numbers as strings, single items instead of one-element arrays);
//! the wire structs here absorb that so the mapping stays readable.

use crate::error::{LastfmError, Result};
use crate::types::{AlbumMatch, ArtistMatch, TopAlbum};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use soundmark_core::types::{AlbumMetadata, AlbumTrack, SimilarArtist};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const USER_AGENT: &str = "soundmark/0.1 (+https://github.com/yourusername/soundmark)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MIN_REQUEST_INTERVAL_MS: u64 = 250;
const SEARCH_LIMIT: &str = "5";
const TOP_ALBUMS_LIMIT: &str = "50";
const SIMILAR_ARTIST_LIMIT: usize = 5;

/// Spaces requests out to stay friendly with the upstream
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the interval
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Client for the Last.fm web service
pub struct LastfmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl LastfmClient {
    /// Create a client against the production endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LastfmError::Build(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            rate_limiter: RateLimiter::new(MIN_REQUEST_INTERVAL_MS),
        })
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: &[(&str, &str)]) -> Result<T> {
        self.rate_limiter.wait().await;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("method", method),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
            ])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LastfmError::Api {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Search artists by name, best five matches
    pub async fn search_artists(&self, query: &str) -> Result<Vec<ArtistMatch>> {
        let response: ArtistSearchResponse = self
            .request("artist.search", &[("artist", query), ("limit", SEARCH_LIMIT)])
            .await?;

        let matches = response
            .results
            .map(|r| r.artistmatches.artist)
            .unwrap_or_default();

        Ok(matches
            .into_iter()
            .map(|artist| ArtistMatch {
                image: largest_image(&artist.image),
                name: artist.name,
                listeners: artist.listeners.map_or(0, |v| v.as_u64()),
                url: artist.url,
            })
            .collect())
    }

    /// Search albums by title, best five matches
    pub async fn search_albums(&self, query: &str) -> Result<Vec<AlbumMatch>> {
        let response: AlbumSearchResponse = self
            .request("album.search", &[("album", query), ("limit", SEARCH_LIMIT)])
            .await?;

        let matches = response
            .results
            .map(|r| r.albummatches.album)
            .unwrap_or_default();

        Ok(matches
            .into_iter()
            .map(|album| AlbumMatch {
                image: largest_image(&album.image),
                name: album.name,
                artist: album.artist,
                url: album.url,
            })
            .collect())
    }

    /// An artist's most-played albums
    ///
    /// The service pads its listings with placeholder entries; albums
    /// named "(null)" or carrying no image are dropped.
    pub async fn artist_top_albums(&self, artist: &str) -> Result<Vec<TopAlbum>> {
        let response: TopAlbumsResponse = self
            .request(
                "artist.gettopalbums",
                &[("artist", artist), ("limit", TOP_ALBUMS_LIMIT)],
            )
            .await?;

        let albums = response.topalbums.map(|t| t.album).unwrap_or_default();

        Ok(albums
            .into_iter()
            .filter_map(|album| {
                if album.name == "(null)" {
                    return None;
                }
                let image = largest_image(&album.image)?;
                Some(TopAlbum {
                    name: album.name,
                    artist: album.artist.name,
                    url: album.url,
                    image,
                    playcount: album.playcount.map_or(0, |v| v.as_u64()),
                })
            })
            .collect())
    }

    /// Fetch everything known about one album, mapped for merging
    ///
    /// Runs `album.getinfo` and `artist.getinfo` concurrently. Upstream
    /// failures degrade to `Ok(None)` (the album lookup) or an empty
    /// similar-artists list (the artist lookup); callers treat `None`
    /// as "no data".
    pub async fn fetch_album_metadata(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<Option<AlbumMetadata>> {
        let (info, similar) = tokio::join!(
            self.album_info_raw(artist, album),
            self.artist_similar(artist)
        );

        let wire = match info {
            Ok(Some(wire)) => wire,
            Ok(None) => return Ok(None),
            Err(err) => {
                tracing::warn!("Album lookup failed for {} - {}: {}", artist, album, err);
                return Ok(None);
            }
        };

        let similar_artists = match similar {
            Ok(list) => list,
            Err(err) => {
                tracing::debug!("Similar-artist lookup failed for {}: {}", artist, err);
                Vec::new()
            }
        };

        let (genre, subgenre) = extract_tags(wire.tags);
        let summary = wire.wiki.map(|w| w.summary).unwrap_or_default();

        let tracks = wire
            .tracks
            .map(|t| t.track.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|track| AlbumTrack {
                name: track.name,
                duration_seconds: track.duration.map_or(0, |d| d.as_u64() as u32),
            })
            .collect();

        Ok(Some(AlbumMetadata {
            cover_image_url: largest_image(&wire.image),
            lastfm_url: none_if_empty(wire.url),
            genre,
            subgenre,
            release_year: extract_year(&summary),
            album_wiki: clean_wiki(&summary),
            tracks,
            similar_artists,
            listeners: wire.listeners.map_or(0, |v| v.as_u64()),
            playcount: wire.playcount.map_or(0, |v| v.as_u64()),
            title: wire.name,
            artist: wire.artist,
        }))
    }

    async fn album_info_raw(&self, artist: &str, album: &str) -> Result<Option<WireAlbumInfo>> {
        let response: AlbumInfoResponse = self
            .request("album.getinfo", &[("artist", artist), ("album", album)])
            .await?;
        Ok(response.album)
    }

    async fn artist_similar(&self, artist: &str) -> Result<Vec<SimilarArtist>> {
        let response: ArtistInfoResponse =
            self.request("artist.getinfo", &[("artist", artist)]).await?;

        let similar = response
            .artist
            .map(|a| a.similar.artist)
            .unwrap_or_default();

        Ok(similar
            .into_iter()
            .take(SIMILAR_ARTIST_LIMIT)
            .map(|s| SimilarArtist {
                name: s.name,
                url: s.url,
            })
            .collect())
    }
}

// ---- wire envelopes ----

/// A number the service may send as a bare number or a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNum {
    Num(u64),
    Str(String),
}

impl StringOrNum {
    fn as_u64(&self) -> u64 {
        match self {
            Self::Num(n) => *n,
            Self::Str(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// A list the service collapses to a bare object when it has one item
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct WireImage {
    #[serde(rename = "#text", default)]
    text: String,
    #[serde(default)]
    size: String,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    results: Option<ArtistSearchResults>,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResults {
    #[serde(default)]
    artistmatches: ArtistMatches,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistMatches {
    #[serde(default)]
    artist: Vec<WireArtistMatch>,
}

#[derive(Debug, Deserialize)]
struct WireArtistMatch {
    name: String,
    #[serde(default)]
    listeners: Option<StringOrNum>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    image: Vec<WireImage>,
}

#[derive(Debug, Deserialize)]
struct AlbumSearchResponse {
    results: Option<AlbumSearchResults>,
}

#[derive(Debug, Deserialize)]
struct AlbumSearchResults {
    #[serde(default)]
    albummatches: AlbumMatches,
}

#[derive(Debug, Default, Deserialize)]
struct AlbumMatches {
    #[serde(default)]
    album: Vec<WireAlbumMatch>,
}

#[derive(Debug, Deserialize)]
struct WireAlbumMatch {
    name: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    image: Vec<WireImage>,
}

#[derive(Debug, Deserialize)]
struct TopAlbumsResponse {
    topalbums: Option<TopAlbumsEnvelope>,
}

#[derive(Debug, Deserialize)]
struct TopAlbumsEnvelope {
    #[serde(default)]
    album: Vec<WireTopAlbum>,
}

#[derive(Debug, Deserialize)]
struct WireTopAlbum {
    name: String,
    #[serde(default)]
    playcount: Option<StringOrNum>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    artist: WireTopAlbumArtist,
    #[serde(default)]
    image: Vec<WireImage>,
}

#[derive(Debug, Default, Deserialize)]
struct WireTopAlbumArtist {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumInfoResponse {
    album: Option<WireAlbumInfo>,
}

#[derive(Debug, Deserialize)]
struct WireAlbumInfo {
    name: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    listeners: Option<StringOrNum>,
    #[serde(default)]
    playcount: Option<StringOrNum>,
    #[serde(default)]
    image: Vec<WireImage>,
    #[serde(default)]
    tracks: Option<WireTracks>,
    #[serde(default)]
    tags: Option<WireTags>,
    #[serde(default)]
    wiki: Option<WireWiki>,
}

#[derive(Debug, Deserialize)]
struct WireTracks {
    #[serde(default)]
    track: OneOrMany<WireTrack>,
}

#[derive(Debug, Deserialize)]
struct WireTrack {
    name: String,
    #[serde(default)]
    duration: Option<StringOrNum>,
}

#[derive(Debug, Deserialize)]
struct WireTags {
    #[serde(default)]
    tag: OneOrMany<WireTag>,
}

#[derive(Debug, Deserialize)]
struct WireTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireWiki {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct ArtistInfoResponse {
    artist: Option<WireArtistInfo>,
}

#[derive(Debug, Deserialize)]
struct WireArtistInfo {
    #[serde(default)]
    similar: WireSimilar,
}

#[derive(Debug, Default, Deserialize)]
struct WireSimilar {
    #[serde(default)]
    artist: Vec<WireSimilarArtist>,
}

#[derive(Debug, Deserialize)]
struct WireSimilarArtist {
    name: String,
    #[serde(default)]
    url: String,
}

// ---- mapping helpers ----

/// Largest usable image URL, preferring extralarge down to small
fn largest_image(images: &[WireImage]) -> Option<String> {
    for size in ["extralarge", "large", "medium", "small"] {
        if let Some(image) = images.iter().find(|i| i.size == size && !i.text.is_empty()) {
            return Some(image.text.clone());
        }
    }
    None
}

/// First tag becomes the genre, second the subgenre
fn extract_tags(tags: Option<WireTags>) -> (Option<String>, Option<String>) {
    let names: Vec<String> = tags
        .map(|t| t.tag.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.name)
        .collect();

    let genre = names.first().cloned();
    let subgenre = names.get(1).cloned();
    (genre, subgenre)
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year pattern is valid"))
}

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// First plausible release year mentioned in wiki text
fn extract_year(text: &str) -> Option<i32> {
    year_regex()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Wiki summary with HTML tags stripped; empty summaries become None
fn clean_wiki(summary: &str) -> Option<String> {
    let stripped = html_tag_regex().replace_all(summary, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
