use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use super::{Client, Error};
use crate::types::TransferPlaybackRequest;

impl Client {
    /// Moves playback to `device_id`, starting it when `play` is set.
    ///
    /// The service answers 204, or 202 while the device is still picking the
    /// session up; both are success here and neither is retried.
    pub async fn transfer_playback(
        &self,
        cancel: &CancellationToken,
        device_id: &str,
        play: bool,
    ) -> Result<(), Error> {
        let request = self
            .http
            .put(self.endpoint("me/player"))
            .json(&TransferPlaybackRequest {
                device_ids: [device_id],
                play,
            });

        self.send(cancel, request, &[StatusCode::ACCEPTED]).await
    }
}
