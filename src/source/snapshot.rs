//! Offline library data loaded from a JSON snapshot.
//!
//! The document mirrors what the Kavita API returns, nested per library:
//!
//! ```json
//! { "libraries": [ { "id": 1, "name": "Manga", "series": [
//!     { "id": 7, "name": "Some Series", "volumes": [
//!         { "number": 1, "chapters": [
//!             { "number": "1", "isSpecial": false,
//!               "files": [ { "filePath": "/manga/Some Series Vol. 1 Ch. 001.cbz", "pages": 20 } ] }
//!         ] }
//!     ] }
//! ] } ] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::source::LibrarySource;
use crate::types::{Library, Series, Volume};

/// One series together with its volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSeries {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

impl SnapshotSeries {
    pub fn series(&self) -> Series {
        Series {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// One library with all of its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLibrary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub series: Vec<SnapshotSeries>,
}

impl SnapshotLibrary {
    pub fn library(&self) -> Library {
        Library {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Root of a snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub libraries: Vec<SnapshotLibrary>,
}

/// A [`LibrarySource`] serving data from a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    // series id -> (library index, series index)
    series_index: HashMap<i64, (usize, usize)>,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        let series_index = snapshot
            .libraries
            .iter()
            .enumerate()
            .flat_map(|(li, library)| {
                library
                    .series
                    .iter()
                    .enumerate()
                    .map(move |(si, series)| (series.id, (li, si)))
            })
            .collect();
        Self {
            snapshot,
            series_index,
        }
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Loads a snapshot file.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Snapshot(path.to_path_buf(), e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn libraries(&self) -> Vec<Library> {
        self.snapshot
            .libraries
            .iter()
            .map(SnapshotLibrary::library)
            .collect()
    }

    fn library(&self, library_id: i64) -> Result<&SnapshotLibrary> {
        self.snapshot
            .libraries
            .iter()
            .find(|library| library.id == library_id)
            .ok_or_else(|| Error::NotFound(format!("library {} is not in the snapshot", library_id)))
    }
}

#[async_trait]
impl LibrarySource for SnapshotSource {
    async fn fetch_series_list(&self, library_id: i64) -> Result<Vec<Series>> {
        Ok(self
            .library(library_id)?
            .series
            .iter()
            .map(SnapshotSeries::series)
            .collect())
    }

    async fn fetch_volumes(&self, series_id: i64) -> Result<Vec<Volume>> {
        let (li, si) = self
            .series_index
            .get(&series_id)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("series {} is not in the snapshot", series_id)))?;
        Ok(self.snapshot.libraries[li].series[si].volumes.clone())
    }
}
