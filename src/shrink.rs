use log::info;
use rand::{Rng, seq::SliceRandom};

/// Upper bound on the number of tracks in a generated playlist.
pub const TRACK_LIMIT: usize = 10_000;

/// Merge `lists` into one list of at most `cap` elements, round-robin.
///
/// Each sweep takes the next element of every list that still has one, in list order.
/// Merging stops mid-sweep once `cap` is reached, so when the cap binds every list has
/// contributed as evenly as its length allows.
pub fn shrink<T>(lists: Vec<Vec<T>>, cap: usize) -> Vec<T> {
    let total: usize = lists.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total.min(cap));
    let mut sources: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();

    while merged.len() < cap {
        let mut took_any = false;
        for source in &mut sources {
            if merged.len() == cap {
                break;
            }
            if let Some(item) = source.next() {
                merged.push(item);
                took_any = true;
            }
        }
        if !took_any {
            break;
        }
        sources.retain(|source| source.len() > 0);
    }
    merged
}

/// Shrink per-seed recommendations to `cap` tracks and shuffle them.
pub fn track_list<R: Rng + ?Sized>(
    recommendations: Vec<Vec<String>>,
    cap: usize,
    rng: &mut R,
) -> Vec<String> {
    info!(
        "Total tracks before shrink: {}",
        recommendations.iter().map(Vec::len).sum::<usize>()
    );
    let mut tracks = shrink(recommendations, cap);
    tracks.shuffle(rng);
    tracks
}
