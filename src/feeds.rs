//! Read-only feeds over the user's library and listening history.
//!
//! Each feed is a lazy stream of raw JSON items, fetched 50 per page.

use futures::stream::{self, LocalBoxStream, Stream, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::{
    clients::{
        api::{Endpoint, ItemType, SpotifyApi, TimeRange},
        errors::{Error, Result},
    },
    paging::{FieldPath, PageRequest, get_nested, paginate},
};

/// Page size requested from every listing endpoint.
pub const PAGE_SIZE: u32 = 50;

/// Tracks in the user's "Liked Songs".
pub fn get_saved_tracks<C: SpotifyApi>(client: &C) -> impl Stream<Item = Result<Value>> + '_ {
    paginate(
        client,
        PageRequest::new(Endpoint::SavedTracks).param("limit", PAGE_SIZE),
    )
}

/// The user's top artists or tracks over one time window.
pub fn get_top<C: SpotifyApi>(
    client: &C,
    item_type: ItemType,
    time_range: TimeRange,
) -> impl Stream<Item = Result<Value>> + '_ {
    paginate(
        client,
        PageRequest::new(Endpoint::Top(item_type))
            .param("time_range", time_range.as_str())
            .param("limit", PAGE_SIZE),
    )
}

/// Top items over every time window, short term first.
///
/// An item that ranks in several windows appears once per window.
pub fn get_all_top<C: SpotifyApi>(
    client: &C,
    item_type: ItemType,
) -> impl Stream<Item = Result<Value>> + '_ {
    stream::iter(TimeRange::ALL)
        .map(move |time_range| get_top(client, item_type, time_range))
        .flatten()
}

/// Artists the user follows. This endpoint nests its page under `artists`.
pub fn get_followed_artists<C: SpotifyApi>(
    client: &C,
) -> impl Stream<Item = Result<Value>> + '_ {
    paginate(
        client,
        PageRequest::new(Endpoint::FollowedArtists)
            .param("type", "artist")
            .param("limit", PAGE_SIZE)
            .target_key(["artists", "items"])
            .next_key(["artists", "next"]),
    )
}

/// Every artist credited on the user's saved albums, album by album.
pub fn get_saved_album_artists<C: SpotifyApi>(
    client: &C,
) -> impl Stream<Item = Result<Value>> + '_ {
    paginate(
        client,
        PageRequest::new(Endpoint::SavedAlbums).param("limit", PAGE_SIZE),
    )
    .map(|saved| saved.and_then(|saved| album_artists(&saved)))
    .map_ok(|artists| stream::iter(artists.into_iter().map(Ok::<Value, Error>)))
    .try_flatten()
}

fn album_artists(saved: &Value) -> Result<Vec<Value>> {
    let path = FieldPath::from(["album", "artists"]);
    match get_nested(&path, saved)? {
        Value::Array(artists) => Ok(artists.clone()),
        other => Err(Error::MalformedResponse(format!(
            "expected a list of artists at `{path}`, got {other}"
        ))),
    }
}

/// Concatenate feeds into one stream, draining each before starting the next.
pub fn chain_feeds<'a, T: 'a>(feeds: Vec<LocalBoxStream<'a, T>>) -> impl Stream<Item = T> + 'a {
    stream::iter(feeds).flatten()
}
