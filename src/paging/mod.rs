//! Cursor-following pagination over Spotify listing endpoints.
//!
//! Every listing page carries its items and a `next` URL at some path inside the response.
//! [`paginate`] turns one listing call into a lazy stream of items across all pages.

mod path;

pub use path::{FieldPath, PathError, Segment, get_nested};

use futures::stream::{self, Stream};
use log::debug;
use serde_json::Value;

use crate::clients::{
    api::{Endpoint, Params, SpotifyApi},
    errors::{Error, Result},
};

/// Default path of the item list inside a page.
pub const DEFAULT_TARGET_KEY: &str = "items";
/// Default path of the next-page cursor inside a page.
pub const DEFAULT_NEXT_KEY: &str = "next";

/// A listing call plus the paths its pages keep items and cursors under.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub endpoint: Endpoint,
    pub params: Params,
    pub target_key: FieldPath,
    pub next_key: FieldPath,
}

impl PageRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        PageRequest {
            endpoint,
            params: Params::new(),
            target_key: FieldPath::from(DEFAULT_TARGET_KEY),
            next_key: FieldPath::from(DEFAULT_NEXT_KEY),
        }
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Merge in caller supplied params. Existing keys are overwritten.
    #[must_use]
    pub fn params(mut self, params: &Params) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    #[must_use]
    pub fn target_key(mut self, path: impl Into<FieldPath>) -> Self {
        self.target_key = path.into();
        self
    }

    #[must_use]
    pub fn next_key(mut self, path: impl Into<FieldPath>) -> Self {
        self.next_key = path.into();
        self
    }
}

enum Next {
    Call(Endpoint, Params),
    Fetch(String),
    Done,
}

struct PageState {
    pending: std::vec::IntoIter<Value>,
    next: Next,
    target_key: FieldPath,
    next_key: FieldPath,
}

/// Stream every item of a paginated listing, page by page.
///
/// Nothing is requested until the stream is first polled. The stream ends when a page has
/// no cursor at `next_key`, or the cursor is `null`/empty. Any failed call ends the
/// stream with that error.
pub fn paginate<'a, C: SpotifyApi>(
    client: &'a C,
    request: PageRequest,
) -> impl Stream<Item = Result<Value>> + 'a {
    let state = PageState {
        pending: Vec::new().into_iter(),
        next: Next::Call(request.endpoint, request.params),
        target_key: request.target_key,
        next_key: request.next_key,
    };
    stream::try_unfold(state, move |state| advance(client, state))
}

async fn advance<C: SpotifyApi>(
    client: &C,
    mut state: PageState,
) -> Result<Option<(Value, PageState)>> {
    loop {
        if let Some(item) = state.pending.next() {
            return Ok(Some((item, state)));
        }
        let page = match std::mem::replace(&mut state.next, Next::Done) {
            Next::Done => return Ok(None),
            Next::Call(endpoint, params) => {
                debug!("Requesting first page of {endpoint}");
                client.call(endpoint, &params).await?
            }
            Next::Fetch(url) => {
                debug!("Following cursor {url}");
                client.fetch(&url).await?
            }
        };
        state.pending = page_items(&page, &state.target_key)?.into_iter();
        state.next = next_cursor(&page, &state.next_key)?.map_or(Next::Done, Next::Fetch);
    }
}

fn page_items(page: &Value, target_key: &FieldPath) -> Result<Vec<Value>> {
    match get_nested(target_key, page)? {
        Value::Array(items) => Ok(items.clone()),
        other => Err(Error::MalformedResponse(format!(
            "expected a list of items at `{target_key}`, got {other}"
        ))),
    }
}

/// Cursor URL of the following page, `None` when this is the last one.
fn next_cursor(page: &Value, next_key: &FieldPath) -> Result<Option<String>> {
    let cursor = match get_nested(next_key, page) {
        Ok(cursor) => cursor,
        Err(PathError::Missing(_)) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    match cursor {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(url) if url.is_empty() => Ok(None),
        Value::String(url) => Ok(Some(url.clone())),
        other => Err(Error::MalformedResponse(format!(
            "expected a cursor URL at `{next_key}`, got {other}"
        ))),
    }
}
