use tokio_util::sync::CancellationToken;

use super::{fail, spinner};
use crate::{spotify::Client, success};

pub async fn transfer(client: &Client, cancel: &CancellationToken, device_id: &str, play: bool) {
    let pb = spinner("Transferring playback...");
    let result = client.transfer_playback(cancel, device_id, play).await;
    pb.finish_and_clear();

    if let Err(e) = result {
        fail("Failed to transfer playback", e);
    }
    success!("Playback transferred to {}", device_id);
}
