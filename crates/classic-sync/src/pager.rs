//! Paginated reading of the remote `action` table.

use async_trait::async_trait;
use classic_core::Action;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::info;

use crate::SyncError;

/// Records requested per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Anything that can hand out actions by `(offset, limit)`.
#[async_trait]
pub trait ActionSource: Send + Sync {
    /// Fetch up to `limit` actions starting at `offset`. An empty page means
    /// there is nothing left.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Action>, SyncError>;
}

/// Page through `source` from offset zero, yielding one action at a time.
///
/// The offset advances by however many records each page actually held, and
/// the stream ends after the first empty page. A fetch error is yielded once
/// and ends the stream.
pub fn actions<'a, S>(
    source: &'a S,
    page_size: usize,
) -> impl Stream<Item = Result<Action, SyncError>> + Send + 'a
where
    S: ActionSource + ?Sized,
{
    stream::try_unfold(0usize, move |offset| async move {
        let page = source.fetch_page(offset, page_size).await?;
        info!(count = page.len(), offset, "read records");
        if page.is_empty() {
            return Ok::<_, SyncError>(None);
        }
        let next = offset + page.len();
        Ok(Some((page, next)))
    })
    .map_ok(|page| stream::iter(page.into_iter().map(Ok::<Action, SyncError>)))
    .try_flatten()
}
