//! Paged results and the walker that moves through them.
//!
//! Pages carry absolute `next` / `previous` URLs produced by the service. The
//! walker GETs one of them and decodes the answer over the page the caller
//! passed in, so every reference to that page sees the new batch. Nothing is
//! accumulated: after a move, `items` and `total` describe the fetched page
//! only.
//!
//! Some endpoints nest the page under a single key (`{"tracks": {...}}` for
//! search, `{"artists": {...}}` for followed artists) and keep doing so for
//! their `next` URLs. Both page types accept the bare and the nested shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;

use super::{Client, Error};

/// Which adjacent page to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// A decoded batch of results with links to its neighbours.
pub trait Pageable: DeserializeOwned {
    /// URL this page was fetched from; empty for a page that never was.
    fn endpoint(&self) -> &str;

    fn next_url(&self) -> Option<&str>;

    fn previous_url(&self) -> Option<&str>;

    fn has_next(&self) -> bool {
        self.next_url().is_some()
    }

    fn has_previous(&self) -> bool {
        self.previous_url().is_some()
    }
}

/// Offset based page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Envelope<RawPage<T>>",
    bound(deserialize = "T: DeserializeOwned")
)]
pub struct Page<T> {
    pub href: String,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            href: String::new(),
            limit: 0,
            offset: 0,
            total: 0,
            next: None,
            previous: None,
            items: Vec::new(),
        }
    }
}

impl<T: DeserializeOwned> Pageable for Page<T> {
    fn endpoint(&self) -> &str {
        &self.href
    }

    fn next_url(&self) -> Option<&str> {
        link(&self.next)
    }

    fn previous_url(&self) -> Option<&str> {
        link(&self.previous)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

/// Forward-only page for resources without random access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Envelope<RawCursorPage<T>>",
    bound(deserialize = "T: DeserializeOwned")
)]
pub struct CursorPage<T> {
    pub href: String,
    pub limit: u32,
    pub total: u32,
    pub next: Option<String>,
    pub cursors: Cursors,
    pub items: Vec<T>,
}

impl<T> Default for CursorPage<T> {
    fn default() -> Self {
        Self {
            href: String::new(),
            limit: 0,
            total: 0,
            next: None,
            cursors: Cursors::default(),
            items: Vec::new(),
        }
    }
}

impl<T: DeserializeOwned> Pageable for CursorPage<T> {
    fn endpoint(&self) -> &str {
        &self.href
    }

    fn next_url(&self) -> Option<&str> {
        link(&self.next)
    }

    fn previous_url(&self) -> Option<&str> {
        None
    }
}

fn link(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<R> {
    Bare(R),
    Nested(HashMap<String, R>),
}

impl<R> Envelope<R> {
    fn into_page(self) -> Result<R, String> {
        match self {
            Envelope::Bare(page) => Ok(page),
            Envelope::Nested(map) => {
                let keys = map.len();
                let mut pages = map.into_values();
                match (pages.next(), pages.next()) {
                    (Some(page), None) => Ok(page),
                    _ => Err(format!(
                        "expected a page or one key wrapping a page, found {keys} keys"
                    )),
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct RawPage<T> {
    href: String,
    #[serde(default)]
    limit: u32,
    #[serde(default)]
    offset: u32,
    #[serde(default)]
    total: u32,
    next: Option<String>,
    previous: Option<String>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> TryFrom<Envelope<RawPage<T>>> for Page<T> {
    type Error = String;

    fn try_from(envelope: Envelope<RawPage<T>>) -> Result<Self, Self::Error> {
        let raw = envelope.into_page()?;
        Ok(Page {
            href: raw.href,
            limit: raw.limit,
            offset: raw.offset,
            total: raw.total,
            next: raw.next,
            previous: raw.previous,
            items: raw.items,
        })
    }
}

#[derive(Deserialize)]
struct RawCursorPage<T> {
    href: String,
    #[serde(default)]
    limit: u32,
    #[serde(default)]
    total: u32,
    next: Option<String>,
    #[serde(default)]
    cursors: Option<Cursors>,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> TryFrom<Envelope<RawCursorPage<T>>> for CursorPage<T> {
    type Error = String;

    fn try_from(envelope: Envelope<RawCursorPage<T>>) -> Result<Self, Self::Error> {
        let raw = envelope.into_page()?;
        Ok(CursorPage {
            href: raw.href,
            limit: raw.limit,
            total: raw.total,
            next: raw.next,
            cursors: raw.cursors.unwrap_or_default(),
            items: raw.items,
        })
    }
}

impl Client {
    /// Replaces `page` with the page its `next` link points to.
    pub async fn next_page<P: Pageable>(
        &self,
        cancel: &CancellationToken,
        page: &mut P,
    ) -> Result<(), Error> {
        self.advance(cancel, page, Direction::Next).await
    }

    /// Replaces `page` with the page its `previous` link points to.
    pub async fn previous_page<P: Pageable>(
        &self,
        cancel: &CancellationToken,
        page: &mut P,
    ) -> Result<(), Error> {
        self.advance(cancel, page, Direction::Previous).await
    }

    /// Fetches the page adjacent to `page` in `direction` and decodes it over
    /// `page`.
    ///
    /// Returns [`Error::UnfetchedPage`] for a page that did not come from the
    /// service and [`Error::NoMorePages`] when there is no link to follow; no
    /// request is made in either case.
    pub async fn advance<P: Pageable>(
        &self,
        cancel: &CancellationToken,
        page: &mut P,
        direction: Direction,
    ) -> Result<(), Error> {
        if page.endpoint().is_empty() {
            return Err(Error::UnfetchedPage);
        }

        let url = match direction {
            Direction::Next => page.next_url(),
            Direction::Previous => page.previous_url(),
        }
        .ok_or(Error::NoMorePages)?
        .to_owned();

        tracing::debug!(%url, ?direction, "fetching adjacent page");
        self.get(cancel, &url, page).await
    }
}
