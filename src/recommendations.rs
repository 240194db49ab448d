use std::{collections::HashSet, pin::pin};

use futures::stream::{Stream, TryStreamExt};
use log::{debug, info};
use serde_json::Value;

use crate::{
    clients::{
        api::{Endpoint, Params, SpotifyApi},
        errors::{Error, Result},
    },
    paging::{PageRequest, paginate},
};

/// Tracks requested per seed artist.
pub const RECOMMENDATION_LIMIT: u32 = 50;

/// Drain a feed of artist objects into their ids, keeping the first occurrence of each.
pub async fn seed_artist_ids<S>(seeds: S) -> Result<Vec<String>>
where
    S: Stream<Item = Result<Value>>,
{
    let mut seeds = pin!(seeds);
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    while let Some(artist) = seeds.try_next().await? {
        let id = item_id(&artist, "artist")?;
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Fetch recommended track ids for every seed artist, one list per artist.
///
/// Repeated artist ids are requested once, at their first position. Track ids are unique
/// across all lists: a track already listed for an earlier artist is skipped for every
/// later one. `tuneable` is forwarded to the API untouched.
pub async fn get_recommendations<C: SpotifyApi>(
    client: &C,
    artist_ids: &[String],
    tuneable: &Params,
    limit: u32,
) -> Result<Vec<Vec<String>>> {
    let mut seen = HashSet::new();
    let artist_ids: Vec<&String> = artist_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .collect();
    info!("Number of artists used as seed: {}", artist_ids.len());
    let mut added = HashSet::new();
    let mut recommendations = Vec::with_capacity(artist_ids.len());

    for artist_id in artist_ids {
        debug!("Getting recommendations for artist: {artist_id}");
        let request = PageRequest::new(Endpoint::Recommendations)
            .params(tuneable)
            .param("seed_artists", artist_id.as_str())
            .param("limit", limit)
            .target_key("tracks");
        let mut tracks = pin!(paginate(client, request));

        let mut list = Vec::new();
        while let Some(track) = tracks.try_next().await? {
            let id = item_id(&track, "track")?;
            if added.insert(id.clone()) {
                list.push(id);
            }
        }
        recommendations.push(list);
    }

    info!("Number of recommendation lists: {}", recommendations.len());
    Ok(recommendations)
}

fn item_id(item: &Value, kind: &str) -> Result<String> {
    item.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::MalformedResponse(format!("{kind} without an id: {item}")))
}
