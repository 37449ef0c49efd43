use tokio_util::sync::CancellationToken;

use super::{fail, spinner};
use crate::{info, spotify::Client, spotify::playlist::MAX_TRACKS_PER_REQUEST, success, warning};

pub async fn create_playlist(
    client: &Client,
    cancel: &CancellationToken,
    user_id: &str,
    name: &str,
    public: bool,
    description: Option<&str>,
) {
    let pb = spinner("Creating playlist...");
    let created = client
        .create_playlist(cancel, user_id, name, public, description)
        .await;
    pb.finish_and_clear();

    match created {
        Ok(playlist) => {
            success!("Created playlist {} ({})", playlist.name, playlist.id);
            if !playlist.uri.is_empty() {
                info!("{}", playlist.uri);
            }
        }
        Err(e) => fail("Failed to create playlist", e),
    }
}

pub async fn add_tracks(
    client: &Client,
    cancel: &CancellationToken,
    playlist_id: &str,
    uris: &[String],
) {
    if uris.is_empty() {
        warning!("Nothing to add.");
        return;
    }

    let pb = spinner("Adding tracks...");
    let mut snapshot = None;
    for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
        match client.add_tracks_to_playlist(cancel, playlist_id, chunk).await {
            Ok(s) => snapshot = Some(s.snapshot_id),
            Err(e) => {
                pb.finish_and_clear();
                fail("Failed to add tracks", e);
            }
        }
    }
    pb.finish_and_clear();

    success!("Added {} tracks to {}", uris.len(), playlist_id);
    if let Some(snapshot) = snapshot {
        info!("Snapshot {}", snapshot);
    }
}
