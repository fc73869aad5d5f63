//! The seam between the enrichment pipeline and the browser's fetch layer.

use std::future::Future;

use crate::models::{ItemDetail, Session};

/// Access to the media server as the enricher needs it.
///
/// The browser crate implements this over `window.fetch`; tests implement it
/// over in-memory maps. Futures carry no `Send` bound: the implementation
/// runs on the browser's single-threaded event loop, where JS futures are
/// not `Send`.
pub trait MediaGateway {
    type Error: std::error::Error + 'static;

    /// Fetch the list of active playback sessions.
    fn sessions(&self) -> impl Future<Output = Result<Vec<Session>, Self::Error>>;

    /// Fetch extended metadata for one item (episode, season, or series).
    fn item_detail(&self, id: &str) -> impl Future<Output = Result<ItemDetail, Self::Error>>;
}
