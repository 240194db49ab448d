use std::{collections::BTreeMap, fmt};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{
    entities::{Playlist, User},
    errors::Result,
};

/// Query parameters forwarded verbatim to a listing call.
///
/// Values are JSON primitives; arrays are joined with commas on the wire.
pub type Params = BTreeMap<String, Value>;

/// Kind of item a "top" listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Top artists
    Artists,
    /// Top tracks
    Tracks,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Artists => "artists",
            ItemType::Tracks => "tracks",
        }
    }
}

/// Time window Spotify computes a user's top items over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Roughly the last four weeks
    #[value(name = "short_term")]
    ShortTerm,
    /// Roughly the last six months
    #[value(name = "medium_term")]
    MediumTerm,
    /// Several years of history
    #[value(name = "long_term")]
    LongTerm,
}

impl TimeRange {
    /// All windows, shortest first.
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

/// Listing endpoints the feeds read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SavedTracks,
    SavedAlbums,
    Top(ItemType),
    FollowedArtists,
    Recommendations,
}

impl Endpoint {
    /// Path relative to the Web API base URL.
    pub fn path(self) -> String {
        match self {
            Endpoint::SavedTracks => "me/tracks".to_string(),
            Endpoint::SavedAlbums => "me/albums".to_string(),
            Endpoint::Top(item_type) => format!("me/top/{}", item_type.as_str()),
            Endpoint::FollowedArtists => "me/following".to_string(),
            Endpoint::Recommendations => "recommendations".to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Remote operations the playlist generator depends on.
///
/// Listing calls return raw JSON pages; the caller picks items and cursors out of them,
/// since each endpoint nests those fields differently.
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    /// Fetch the first page of a listing.
    async fn call(&self, endpoint: Endpoint, params: &Params) -> Result<Value>;

    /// Fetch a continuation page from a cursor URL returned by a previous page.
    async fn fetch(&self, url: &str) -> Result<Value>;

    /// Profile of the user the access token belongs to.
    async fn current_user(&self) -> Result<User>;

    /// Create an empty playlist owned by `user_id`.
    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<Playlist>;

    /// Append tracks to a playlist. Callers keep `track_ids` within the per-request limit.
    async fn add_tracks(&self, user_id: &str, playlist_id: &str, track_ids: &[String])
    -> Result<()>;
}

impl<T: SpotifyApi> SpotifyApi for &T {
    async fn call(&self, endpoint: Endpoint, params: &Params) -> Result<Value> {
        (**self).call(endpoint, params).await
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        (**self).fetch(url).await
    }

    async fn current_user(&self) -> Result<User> {
        (**self).current_user().await
    }

    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<Playlist> {
        (**self).create_playlist(user_id, name, public).await
    }

    async fn add_tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        (**self).add_tracks(user_id, playlist_id, track_ids).await
    }
}

/// Render params as query pairs.
pub fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), query_value(value)))
        .collect()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(values) => values
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
