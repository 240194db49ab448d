#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap};

use serde_json::{Value, json};
use spotifetch::clients::{
    api::{Endpoint, Params, SpotifyApi, query_pairs},
    entities::{Playlist, User},
    errors::{Error, Result},
};

pub const USER_ID: &str = "listener";
pub const PLAYLIST_ID: &str = "pl1";
pub const PLAYLIST_URI: &str = "spotify:playlist:pl1";

/// In-memory Spotify that serves canned pages and records every request.
#[derive(Default)]
pub struct MockSpotify {
    pages: HashMap<String, Value>,
    urls: HashMap<String, Value>,
    failing: Vec<String>,
    /// Every listing request as `path?query`, and every cursor URL fetched.
    pub requests: RefCell<Vec<String>>,
    /// Playlists created, as (user id, name, public).
    pub created: RefCell<Vec<(String, String, bool)>>,
    /// Track id batches written to the playlist, in order.
    pub added: RefCell<Vec<Vec<String>>>,
}

impl MockSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for the first request to `endpoint`. `selector` is matched against the
    /// `time_range` or `seed_artists` param, whichever the request carries.
    pub fn with_page(mut self, endpoint: Endpoint, selector: &str, page: Value) -> Self {
        self.pages
            .insert(format!("{} {selector}", endpoint.path()), page);
        self
    }

    /// Serve `page` for a cursor URL.
    pub fn with_url(mut self, url: &str, page: Value) -> Self {
        self.urls.insert(url.to_string(), page);
        self
    }

    /// Make requests to `target` (a listing key or a cursor URL) fail.
    pub fn failing_on(mut self, target: &str) -> Self {
        self.failing.push(target.to_string());
        self
    }

    fn key(endpoint: Endpoint, params: &Params) -> String {
        let selector = params
            .get("time_range")
            .or_else(|| params.get("seed_artists"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        format!("{} {selector}", endpoint.path())
    }

    fn check(&self, target: &str) -> Result<()> {
        if self.failing.iter().any(|f| f == target) {
            return Err(Error::MalformedResponse(format!("mock failure for {target}")));
        }
        Ok(())
    }
}

impl SpotifyApi for MockSpotify {
    async fn call(&self, endpoint: Endpoint, params: &Params) -> Result<Value> {
        let query: Vec<String> = query_pairs(params)
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        self.requests
            .borrow_mut()
            .push(format!("{}?{}", endpoint.path(), query.join("&")));
        let key = Self::key(endpoint, params);
        self.check(&key)?;
        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::MalformedResponse(format!("no mock page for {key}")))
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        self.requests.borrow_mut().push(url.to_string());
        self.check(url)?;
        self.urls
            .get(url)
            .cloned()
            .ok_or_else(|| Error::MalformedResponse(format!("no mock page for {url}")))
    }

    async fn current_user(&self) -> Result<User> {
        Ok(User {
            id: USER_ID.to_string(),
            display_name: Some("Listener".to_string()),
        })
    }

    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<Playlist> {
        self.created
            .borrow_mut()
            .push((user_id.to_string(), name.to_string(), public));
        Ok(Playlist {
            id: PLAYLIST_ID.to_string(),
            uri: PLAYLIST_URI.to_string(),
            name: name.to_string(),
        })
    }

    async fn add_tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        assert_eq!(user_id, USER_ID);
        assert_eq!(playlist_id, PLAYLIST_ID);
        self.check("add_tracks")?;
        self.added.borrow_mut().push(track_ids.to_vec());
        Ok(())
    }
}

/// A listing page with default `items`/`next` keys.
pub fn page(items: Vec<Value>, next: Option<&str>) -> Value {
    json!({ "items": items, "next": next })
}

pub fn artist(id: &str) -> Value {
    json!({ "id": id, "name": format!("Artist {id}") })
}

/// A recommendations response. It has no cursor at all.
pub fn recommendations(track_ids: &[&str]) -> Value {
    let tracks: Vec<Value> = track_ids
        .iter()
        .map(|id| json!({ "id": id, "name": format!("Track {id}") }))
        .collect();
    json!({ "tracks": tracks, "seeds": [] })
}
