use tokio_util::sync::CancellationToken;

use super::{Client, CursorPage, Error, Page};
use crate::types::{Album, Artist};

impl Client {
    /// First page of artists the current user follows.
    ///
    /// The page is cursor based; follow it with [`Client::next_page`]. Its
    /// `total` is the number of followed artists, so a `limit` of 1 is the
    /// cheap way to count them.
    ///
    /// # Arguments
    ///
    /// * `cancel` - Token that aborts the request and any rate-limit wait
    /// * `limit` - Maximum number of artists per page (1-50)
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(CursorPage<Artist>)` - The first page, unwrapped from its `artists` envelope
    /// - `Err(Error)` - Transport, service, decode or cancellation failure
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sporlapi::spotify::{Client, Error, Pageable};
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn demo(client: Client) -> Result<(), Error> {
    /// let cancel = CancellationToken::new();
    /// let mut page = client.followed_artists(&cancel, 50).await?;
    /// let mut names: Vec<String> = page.items.iter().map(|a| a.name.clone()).collect();
    /// while page.has_next() {
    ///     client.next_page(&cancel, &mut page).await?;
    ///     names.extend(page.items.iter().map(|a| a.name.clone()));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn followed_artists(
        &self,
        cancel: &CancellationToken,
        limit: u32,
    ) -> Result<CursorPage<Artist>, Error> {
        let request = self
            .http
            .get(self.endpoint("me/following"))
            .query(&[("type", "artist"), ("limit", limit.to_string().as_str())]);

        let mut page = CursorPage::default();
        self.fetch(cancel, request, &mut page).await?;
        Ok(page)
    }

    /// First page of an artist's albums.
    ///
    /// # Arguments
    ///
    /// * `artist_id` - Spotify ID of the artist; encoded as a single path segment
    /// * `limit` - Maximum number of albums per page (1-50)
    pub async fn artist_albums(
        &self,
        cancel: &CancellationToken,
        artist_id: &str,
        limit: u32,
    ) -> Result<Page<Album>, Error> {
        let request = self
            .http
            .get(self.resource(&["artists", artist_id, "albums"])?)
            .query(&[("limit", limit.to_string())]);

        let mut page = Page::default();
        self.fetch(cancel, request, &mut page).await?;
        Ok(page)
    }
}
