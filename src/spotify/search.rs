use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{Client, Error, Page};
use crate::types::SearchType;

impl Client {
    /// Searches the catalog for one resource kind.
    ///
    /// `T` is the item shape of `kind`, e.g. [`Track`](crate::types::Track)
    /// for [`SearchType::Track`]. The service nests the page under the
    /// plural kind (`tracks`, `albums`, `artists`); [`Page`] unwraps it, and
    /// the returned page can be walked with [`Client::next_page`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sporlapi::{spotify::{Client, Error}, types::{SearchType, Track}};
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn demo(client: Client) -> Result<(), Error> {
    /// let page = client
    ///     .search::<Track>(&CancellationToken::new(), "artist:robyn", SearchType::Track, 5)
    ///     .await?;
    /// for track in &page.items {
    ///     println!("{} ({} ms)", track.name, track.duration_ms);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        query: &str,
        kind: SearchType,
        limit: u32,
    ) -> Result<Page<T>, Error> {
        let request = self.http.get(self.endpoint("search")).query(&[
            ("q", query),
            ("type", kind.as_str()),
            ("limit", limit.to_string().as_str()),
        ]);

        let mut page = Page::default();
        self.fetch(cancel, request, &mut page).await?;
        Ok(page)
    }
}
