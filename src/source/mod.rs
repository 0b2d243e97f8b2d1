//! Source module provides the trait and implementations for library data providers.
//!
//! The analysis engine never fetches anything itself; it is handed series and
//! volumes by a [`LibrarySource`]. Two implementations ship with the crate:
//!
//! - [`kavita::KavitaClient`]: talks to a live Kavita server over its HTTP API
//! - [`snapshot::SnapshotSource`]: serves a JSON dump of one or more libraries offline

use crate::error::Result;
use crate::types::{Series, Volume};
use async_trait::async_trait;

pub mod kavita;
pub mod snapshot;

/// Common interface for all library data providers.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    /// Obtains whatever credentials later calls need.
    ///
    /// Sources that need no credentials keep the default no-op.
    ///
    /// # Returns
    /// * `Result<()>` - Success, or [`Error::Authentication`](crate::error::Error::Authentication)
    async fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    /// Lists every series of a library.
    ///
    /// # Parameters
    /// * `library_id` - Identifier of the library on the server
    ///
    /// # Returns
    /// * `Result<Vec<Series>>` - The series in server order
    async fn fetch_series_list(&self, library_id: i64) -> Result<Vec<Series>>;

    /// Retrieves the volumes of one series, each populated with chapters and files.
    ///
    /// # Parameters
    /// * `series_id` - Identifier of the series on the server
    ///
    /// # Returns
    /// * `Result<Vec<Volume>>` - Volumes in server order (not necessarily sorted)
    async fn fetch_volumes(&self, series_id: i64) -> Result<Vec<Volume>>;
}

#[async_trait]
impl<S: LibrarySource + ?Sized> LibrarySource for Box<S> {
    async fn authenticate(&self) -> Result<()> {
        (**self).authenticate().await
    }

    async fn fetch_series_list(&self, library_id: i64) -> Result<Vec<Series>> {
        (**self).fetch_series_list(library_id).await
    }

    async fn fetch_volumes(&self, series_id: i64) -> Result<Vec<Volume>> {
        (**self).fetch_volumes(series_id).await
    }
}
