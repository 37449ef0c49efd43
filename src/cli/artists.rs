use tabled::Table;
use tokio_util::sync::CancellationToken;

use super::{fail, spinner, walk};
use crate::{
    info,
    spotify::Client,
    success,
    types::{AlbumTableRow, ArtistTableRow},
};

pub async fn following(client: &Client, cancel: &CancellationToken, limit: u32, pages: u32) {
    let pb = spinner("Fetching followed artists...");
    let first = client.followed_artists(cancel, limit).await;
    pb.finish_and_clear();

    let mut page = match first {
        Ok(page) => page,
        Err(e) => fail("Failed to fetch followed artists", e),
    };
    info!("You follow {} artists", page.total);

    let mut shown = 0;
    let walked = walk(client, cancel, &mut page, pages, |page| {
        let mut artists = std::mem::take(&mut page.items);
        shown += artists.len();
        artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let rows: Vec<ArtistTableRow> = artists.into_iter().map(ArtistTableRow::from).collect();
        println!("{}", Table::new(rows));
    })
    .await;

    if let Err(e) = walked {
        fail("Failed to fetch more artists", e);
    }
    success!("Listed {} artists", shown);
}

pub async fn albums(
    client: &Client,
    cancel: &CancellationToken,
    artist_id: &str,
    limit: u32,
    pages: u32,
) {
    let pb = spinner("Fetching albums...");
    let first = client.artist_albums(cancel, artist_id, limit).await;
    pb.finish_and_clear();

    let mut page = match first {
        Ok(page) => page,
        Err(e) => fail("Failed to fetch albums", e),
    };
    if page.total == 0 {
        info!("No albums for artist {}", artist_id);
        return;
    }

    let walked = walk(client, cancel, &mut page, pages, |page| {
        info!(
            "Albums {}-{} of {}",
            page.offset + 1,
            page.offset as usize + page.items.len(),
            page.total
        );
        let rows: Vec<AlbumTableRow> = std::mem::take(&mut page.items)
            .into_iter()
            .map(AlbumTableRow::from)
            .collect();
        println!("{}", Table::new(rows));
    })
    .await;

    if let Err(e) = walked {
        fail("Failed to fetch more albums", e);
    }
}
