use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use super::{Client, Error};
use crate::types::{AddTracksRequest, CreatePlaylistRequest, Playlist, SnapshotId};

/// Most items the service takes in one add request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

impl Client {
    /// Creates an empty playlist owned by `user_id`. The service answers 201.
    ///
    /// # Arguments
    ///
    /// * `cancel` - Token that aborts the request and any rate-limit wait
    /// * `user_id` - Spotify user ID of the owner; encoded as a single path segment
    /// * `name` - Display name of the new playlist
    /// * `public` - Whether the playlist shows up on the owner's profile
    /// * `description` - Optional description; omitted from the body when `None`
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Playlist)` - The created playlist, including its first snapshot ID
    /// - `Err(Error)` - Transport, service, decode or cancellation failure
    pub async fn create_playlist(
        &self,
        cancel: &CancellationToken,
        user_id: &str,
        name: &str,
        public: bool,
        description: Option<&str>,
    ) -> Result<Playlist, Error> {
        let body = CreatePlaylistRequest {
            name,
            public,
            collaborative: false,
            description,
        };
        let request = self
            .http
            .post(self.resource(&["users", user_id, "playlists"])?)
            .json(&body);

        let mut playlist = Playlist::default();
        self.execute(cancel, request, Some(&mut playlist), &[StatusCode::CREATED])
            .await?;
        Ok(playlist)
    }

    /// Appends `uris` to a playlist, at most [`MAX_TRACKS_PER_REQUEST`] per
    /// call, and returns the new snapshot.
    pub async fn add_tracks_to_playlist(
        &self,
        cancel: &CancellationToken,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotId, Error> {
        let request = self
            .http
            .post(self.resource(&["playlists", playlist_id, "tracks"])?)
            .json(&AddTracksRequest { uris });

        let mut snapshot = SnapshotId::default();
        self.execute(cancel, request, Some(&mut snapshot), &[StatusCode::CREATED])
            .await?;
        Ok(snapshot)
    }
}
