//! Spotifetch - Generate Spotify playlists from your listening history
//!
//! This library collects seed artists from a user's top, followed and saved-album artists,
//! asks Spotify for recommendations per artist, trims the combined result fairly to a
//! bounded size and writes it to a new playlist.

/// Token handling and the OAuth authorization flow
pub mod auth;
/// Fixed-size grouping for bulk write requests
pub mod chunk;
/// Client modules for interacting with the Spotify Web API
pub mod clients;
/// Lazy feeds over the user's library and history
pub mod feeds;
/// Playlist generation run and its configuration
pub mod generator;
/// Cursor-following pagination and nested field access
pub mod paging;
/// Per-artist recommendation fetching
pub mod recommendations;
/// Fair round-robin truncation of recommendation lists
pub mod shrink;

pub use generator::{PlaylistConfig, PlaylistGenerator, generate_playlist, get_current_user};
