/// Remote API seam and request descriptors
pub mod api;
/// Data entities for users and playlists
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Spotify Web API client
pub mod spotify;

pub use api::{Endpoint, ItemType, Params, SpotifyApi, TimeRange};
pub use entities::{Playlist, User};
pub use spotify::SpotifyClient;
