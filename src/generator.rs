use std::{path::Path, time::Duration};

use futures::stream::{LocalBoxStream, Stream, StreamExt};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    chunk::{WRITE_CHUNK_SIZE, chunked},
    clients::{
        api::{ItemType, Params, SpotifyApi, TimeRange},
        entities::{Playlist, User},
        errors::{Error, Result},
        spotify::SpotifyClient,
    },
    feeds::{chain_feeds, get_followed_artists, get_saved_album_artists, get_top},
    recommendations::{RECOMMENDATION_LIMIT, get_recommendations, seed_artist_ids},
    shrink::{TRACK_LIMIT, track_list},
};

/// Name given to playlists when none is configured.
pub const DEFAULT_PLAYLIST_NAME: &str = "Spotifetch generated playlist";

/// Pause between two playlist write requests.
pub const WRITE_PAUSE: Duration = Duration::from_millis(300);

// Spotify caps the recommendations endpoint at 100 tracks per request
const MAX_RECOMMENDATION_LIMIT: u32 = 100;

/// What to seed a playlist from and how to name it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    pub playlist_name: String,
    pub public: bool,
    /// Top artist windows used as seeds, in order.
    #[serde(alias = "top_artists_time_range")]
    pub time_range: Vec<TimeRange>,
    /// Recommendation tuning parameters, e.g. `target_energy`, passed through as is.
    pub tuneable: Params,
    #[serde(alias = "followed_artists")]
    pub use_followed_artists: bool,
    pub saved_album_artists: bool,
    pub track_limit: usize,
    pub recommendation_limit: u32,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        PlaylistConfig {
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            public: true,
            time_range: Vec::new(),
            tuneable: Params::new(),
            use_followed_artists: false,
            saved_album_artists: false,
            track_limit: TRACK_LIMIT,
            recommendation_limit: RECOMMENDATION_LIMIT,
        }
    }
}

impl PlaylistConfig {
    /// Load a JSON config file. Keys left out keep their defaults.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        let config: PlaylistConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigurationError(format!("{}: {e}", path.as_ref().display())))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recommendation_limit == 0 || self.recommendation_limit > MAX_RECOMMENDATION_LIMIT {
            return Err(Error::ConfigurationError(format!(
                "recommendation_limit must be between 1 and {MAX_RECOMMENDATION_LIMIT}, got {}",
                self.recommendation_limit
            )));
        }
        for (key, value) in &self.tuneable {
            if matches!(value, Value::Null | Value::Object(_)) {
                return Err(Error::ConfigurationError(format!(
                    "tuneable `{key}` must be a string, number or boolean, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Configured time windows with repeats dropped.
    pub fn time_ranges(&self) -> Vec<TimeRange> {
        let mut ranges = Vec::with_capacity(self.time_range.len());
        for range in &self.time_range {
            if !ranges.contains(range) {
                ranges.push(*range);
            }
        }
        ranges
    }
}

/// Builds one playlist from the user's listening history.
pub struct PlaylistGenerator<C> {
    client: C,
    config: PlaylistConfig,
    write_pause: Duration,
}

impl<C: SpotifyApi> PlaylistGenerator<C> {
    pub fn new(client: C, config: PlaylistConfig) -> Self {
        PlaylistGenerator {
            client,
            config,
            write_pause: WRITE_PAUSE,
        }
    }

    #[must_use]
    pub fn with_write_pause(mut self, write_pause: Duration) -> Self {
        self.write_pause = write_pause;
        self
    }

    /// Create the playlist and fill it. Returns the playlist URI.
    ///
    /// The playlist is created first; if a later step fails it is left as is.
    pub async fn generate(&self) -> Result<String> {
        self.config.validate()?;
        let user = self.client.current_user().await?;
        info!("User: \"{}\" starts generating playlist", user.id);

        let playlist = self.create_playlist(&user).await?;
        info!("Playlist: \"{}\" ({}) created", playlist.name, playlist.uri);

        info!("Begin getting seeds");
        let artist_ids = seed_artist_ids(self.seed_artists()).await?;

        info!("Begin getting recommendations");
        let recommendations = get_recommendations(
            &self.client,
            &artist_ids,
            &self.config.tuneable,
            self.config.recommendation_limit,
        )
        .await?;
        info!(
            "Playlist: \"{}\" Total seeds: {}",
            playlist.uri,
            recommendations.len()
        );

        let tracks = track_list(recommendations, self.config.track_limit, &mut rand::rng());
        info!(
            "Playlist: \"{}\" Total tracks after shrink: {}",
            playlist.uri,
            tracks.len()
        );

        info!("Playlist: \"{}\" begin adding tracks", playlist.uri);
        self.add_to_playlist(&user, &playlist, tracks).await?;

        Ok(playlist.uri)
    }

    /// Seed artists from every enabled feed: top artists per window, then followed
    /// artists, then saved album artists.
    pub fn seed_artists(&self) -> impl Stream<Item = Result<Value>> + '_ {
        let mut feeds: Vec<LocalBoxStream<'_, Result<Value>>> = self
            .config
            .time_ranges()
            .into_iter()
            .map(|range| get_top(&self.client, ItemType::Artists, range).boxed_local())
            .collect();
        if self.config.use_followed_artists {
            feeds.push(get_followed_artists(&self.client).boxed_local());
        }
        if self.config.saved_album_artists {
            feeds.push(get_saved_album_artists(&self.client).boxed_local());
        }
        debug!("Collecting seed artists from {} feeds", feeds.len());
        chain_feeds(feeds)
    }

    async fn create_playlist(&self, user: &User) -> Result<Playlist> {
        self.client
            .create_playlist(&user.id, &self.config.playlist_name, self.config.public)
            .await
    }

    /// Append `tracks` in chunks, pausing between requests. Returns the number added.
    pub async fn add_to_playlist(
        &self,
        user: &User,
        playlist: &Playlist,
        tracks: Vec<String>,
    ) -> Result<usize> {
        let mut count = 0;
        for (i, chunk) in chunked(&tracks, WRITE_CHUNK_SIZE).enumerate() {
            if i > 0 && !self.write_pause.is_zero() {
                tokio::time::sleep(self.write_pause).await;
            }
            self.client.add_tracks(&user.id, &playlist.id, chunk).await?;
            count += chunk.len();
        }
        info!("{count} tracks added to {}", playlist.uri);
        Ok(count)
    }
}

/// Generate a playlist for the owner of `access_token`. Returns the playlist URI.
pub async fn generate_playlist(access_token: &str, config: PlaylistConfig) -> Result<String> {
    PlaylistGenerator::new(SpotifyClient::new(access_token), config)
        .generate()
        .await
}

/// Profile of the owner of `access_token`.
pub async fn get_current_user(access_token: &str) -> Result<User> {
    SpotifyClient::new(access_token).current_user().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_a_bare_run() {
        let config = PlaylistConfig::default();
        assert_eq!(config.playlist_name, "Spotifetch generated playlist");
        assert!(config.public);
        assert!(config.time_range.is_empty());
        assert!(!config.use_followed_artists);
        assert!(!config.saved_album_artists);
        assert_eq!(config.track_limit, 10_000);
        assert_eq!(config.recommendation_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PlaylistConfig = serde_json::from_value(json!({
            "time_range": ["short_term", "long_term"],
            "tuneable": {"target_energy": 0.9, "max_popularity": 40},
            "followed_artists": true
        }))
        .unwrap();

        assert_eq!(config.playlist_name, DEFAULT_PLAYLIST_NAME);
        assert_eq!(
            config.time_range,
            vec![TimeRange::ShortTerm, TimeRange::LongTerm]
        );
        assert_eq!(config.tuneable.get("target_energy"), Some(&json!(0.9)));
        assert!(config.use_followed_artists);
        assert!(!config.saved_album_artists);
    }

    #[test]
    fn repeated_time_ranges_collapse() {
        let config = PlaylistConfig {
            time_range: vec![
                TimeRange::LongTerm,
                TimeRange::ShortTerm,
                TimeRange::LongTerm,
            ],
            ..PlaylistConfig::default()
        };
        assert_eq!(
            config.time_ranges(),
            vec![TimeRange::LongTerm, TimeRange::ShortTerm]
        );
    }

    #[test]
    fn structured_tuneables_are_rejected() {
        let mut config = PlaylistConfig::default();
        config
            .tuneable
            .insert("target_energy".into(), json!({"min": 0.2}));
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn recommendation_limit_is_bounded() {
        let config = PlaylistConfig {
            recommendation_limit: 101,
            ..PlaylistConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
