use log::debug;
use rspotify::http::{BaseHttpClient, Headers, HttpClient, Query};
use serde_json::{Value, json};

use crate::clients::{
    api::{Endpoint, Params, SpotifyApi, query_pairs},
    entities::{Playlist, User},
    errors::Result,
};

/// Base URL of the Spotify Web API.
pub const API_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Bearer-token client for the Spotify Web API.
///
/// The token is assumed to stay valid for the lifetime of the client; refreshing it is
/// the caller's job (see [`crate::auth`]).
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: HttpClient,
    access_token: String,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        SpotifyClient {
            http: HttpClient::default(),
            access_token: access_token.into(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root, e.g. a local stub server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert(
            "authorization".to_string(),
            format!("Bearer {}", self.access_token),
        );
        headers
    }

    async fn get(&self, url: &str, pairs: &[(String, String)]) -> Result<Value> {
        let query: Query = pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        debug!("GET {url} {query:?}");
        let body = self.http.get(url, Some(&self.auth_headers()), &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<Value> {
        debug!("POST {url}");
        let body = self
            .http
            .post(url, Some(&self.auth_headers()), payload)
            .await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl SpotifyApi for SpotifyClient {
    async fn call(&self, endpoint: Endpoint, params: &Params) -> Result<Value> {
        let url = self.endpoint_url(&endpoint.path());
        self.get(&url, &query_pairs(params)).await
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        // Cursor URLs already carry their query string
        self.get(url, &[]).await
    }

    async fn current_user(&self) -> Result<User> {
        let url = self.endpoint_url("me");
        let user = self.get(&url, &[]).await?;
        Ok(serde_json::from_value(user)?)
    }

    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<Playlist> {
        let url = self.endpoint_url(&format!("users/{user_id}/playlists"));
        let playlist = self
            .post(&url, &json!({ "name": name, "public": public }))
            .await?;
        Ok(serde_json::from_value(playlist)?)
    }

    async fn add_tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        let url = self.endpoint_url(&format!("playlists/{playlist_id}/tracks"));
        let uris: Vec<String> = track_ids.iter().map(|id| track_uri(id)).collect();
        debug!(
            "Adding {} tracks to playlist {playlist_id} of user {user_id}",
            uris.len()
        );
        self.post(&url, &json!({ "uris": uris })).await?;
        Ok(())
    }
}

/// Spotify URI for a bare track id. Values that already are URIs pass through.
pub fn track_uri(track_id: &str) -> String {
    if track_id.starts_with("spotify:") {
        track_id.to_string()
    } else {
        format!("spotify:track:{track_id}")
    }
}
