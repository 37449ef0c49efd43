use serde::de::DeserializeOwned;
use tabled::{Table, Tabled};
use tokio_util::sync::CancellationToken;

use super::{fail, spinner, walk};
use crate::{
    info,
    spotify::Client,
    types::{Album, AlbumTableRow, Artist, ArtistTableRow, SearchType, Track, TrackTableRow},
};

pub async fn search(
    client: &Client,
    cancel: &CancellationToken,
    query: &str,
    kind: SearchType,
    limit: u32,
    pages: u32,
) {
    match kind {
        SearchType::Track => {
            search_as::<Track, TrackTableRow>(client, cancel, query, kind, limit, pages).await
        }
        SearchType::Album => {
            search_as::<Album, AlbumTableRow>(client, cancel, query, kind, limit, pages).await
        }
        SearchType::Artist => {
            search_as::<Artist, ArtistTableRow>(client, cancel, query, kind, limit, pages).await
        }
    }
}

async fn search_as<T, R>(
    client: &Client,
    cancel: &CancellationToken,
    query: &str,
    kind: SearchType,
    limit: u32,
    pages: u32,
) where
    T: DeserializeOwned,
    R: Tabled + From<T>,
{
    let pb = spinner(&format!("Searching {}s...", kind.as_str()));
    let first = client.search::<T>(cancel, query, kind, limit).await;
    pb.finish_and_clear();

    let mut page = match first {
        Ok(page) => page,
        Err(e) => fail("Search failed", e),
    };
    info!("{} {} results for \"{}\"", page.total, kind.as_str(), query);

    let walked = walk(client, cancel, &mut page, pages, |page| {
        let rows: Vec<R> = std::mem::take(&mut page.items)
            .into_iter()
            .map(R::from)
            .collect();
        println!("{}", Table::new(rows));
    })
    .await;

    if let Err(e) = walked {
        fail("Failed to fetch more results", e);
    }
}
