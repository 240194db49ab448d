mod common;

use common::{MockSpotify, artist, page};
use futures::TryStreamExt;
use serde_json::{Value, json};
use spotifetch::{
    clients::api::{Endpoint, ItemType, TimeRange},
    feeds::{get_all_top, get_followed_artists, get_saved_album_artists, get_saved_tracks, get_top},
};

fn ids(items: &[Value]) -> Vec<&str> {
    items.iter().map(|item| item["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn top_feed_requests_window_and_page_size() {
    let spotify = MockSpotify::new().with_page(
        Endpoint::Top(ItemType::Tracks),
        "medium_term",
        page(vec![json!({ "id": "t1" })], None),
    );

    let items: Vec<Value> = get_top(&spotify, ItemType::Tracks, TimeRange::MediumTerm)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&items), vec!["t1"]);
    assert_eq!(
        *spotify.requests.borrow(),
        vec!["me/top/tracks?limit=50&time_range=medium_term"]
    );
}

#[tokio::test]
async fn all_top_concatenates_short_medium_long() {
    let spotify = MockSpotify::new()
        .with_page(
            Endpoint::Top(ItemType::Artists),
            "long_term",
            page(vec![artist("L")], None),
        )
        .with_page(
            Endpoint::Top(ItemType::Artists),
            "short_term",
            page(vec![artist("S1"), artist("S2")], Some("https://api/short2")),
        )
        .with_url("https://api/short2", page(vec![artist("S3")], None))
        .with_page(
            Endpoint::Top(ItemType::Artists),
            "medium_term",
            page(vec![artist("M")], None),
        );

    let items: Vec<Value> = get_all_top(&spotify, ItemType::Artists)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&items), vec!["S1", "S2", "S3", "M", "L"]);
}

#[tokio::test]
async fn followed_artists_read_the_nested_page() {
    let spotify = MockSpotify::new()
        .with_page(
            Endpoint::FollowedArtists,
            "",
            json!({ "artists": { "items": [artist("F1")], "next": "https://api/follow2" } }),
        )
        .with_url(
            "https://api/follow2",
            json!({ "artists": { "items": [artist("F2")], "next": null, "cursors": {} } }),
        );

    let items: Vec<Value> = get_followed_artists(&spotify).try_collect().await.unwrap();

    assert_eq!(ids(&items), vec!["F1", "F2"]);
    assert_eq!(
        spotify.requests.borrow()[0],
        "me/following?limit=50&type=artist"
    );
}

#[tokio::test]
async fn saved_album_artists_flatten_every_credit() {
    let album = |artists: Vec<Value>| json!({ "added_at": "2020-01-01", "album": { "artists": artists } });
    let spotify = MockSpotify::new()
        .with_page(
            Endpoint::SavedAlbums,
            "",
            page(
                vec![album(vec![artist("A")]), album(vec![])],
                Some("https://api/albums2"),
            ),
        )
        .with_url(
            "https://api/albums2",
            page(vec![album(vec![artist("B"), artist("C")])], None),
        );

    let items: Vec<Value> = get_saved_album_artists(&spotify)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids(&items), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn saved_tracks_page_through_the_library() {
    let saved = |id: &str| json!({ "added_at": "2021-05-01", "track": { "id": id } });
    let spotify = MockSpotify::new()
        .with_page(Endpoint::SavedTracks, "", page(vec![saved("t1")], Some("https://api/t2")))
        .with_url("https://api/t2", page(vec![saved("t2")], None));

    let items: Vec<Value> = get_saved_tracks(&spotify).try_collect().await.unwrap();

    let track_ids: Vec<&str> = items
        .iter()
        .map(|item| item["track"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(track_ids, vec!["t1", "t2"]);
    assert_eq!(spotify.requests.borrow()[0], "me/tracks?limit=50");
}
