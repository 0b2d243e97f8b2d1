//! Continuity analysis for comic/manga series.
//!
//! This module turns the volume/chapter structure of one series into a
//! [`SeriesReport`]. Everything here is pure: no network, no console, no shared
//! state between series. The individual checks live in submodules:
//!
//! - [`gaps`]: missing chapter ranges inside a volume
//! - [`duplicates`]: chapters backed by several files
//! - [`naming`]: file names that do not follow the `Vol. N Ch. M` convention
//! - [`numbering`]: volume-relative vs. continuous chapter numbering

use std::collections::HashSet;

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::number::ChapterNumber;
use crate::types::{Finding, NumberingScheme, Series, SeriesReport, Volume, VolumeReport};

pub mod duplicates;
pub mod gaps;
pub mod naming;
pub mod numbering;

pub use duplicates::find_duplicate_files;
pub use gaps::find_missing_ranges;
pub use naming::{find_file_name_mismatches, matches_convention};
pub use numbering::classify_numbering;

/// Runs the continuity checks over already-fetched series data.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    check_file_names: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Analyzer {
    /// Creates a new Analyzer.
    ///
    /// # Arguments
    ///
    /// * `check_file_names` - When false, the naming convention check is skipped
    pub fn new(check_file_names: bool) -> Self {
        Self { check_file_names }
    }

    /// Analyzes one series.
    ///
    /// Volumes are ordered by number, the numbering scheme is decided once, and
    /// every volume is checked independently (on the rayon pool, keeping volume
    /// order in the output).
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SeriesReport))` - At least one finding fired somewhere in the series
    /// * `Ok(None)` - The series is clean
    /// * `Err(Error)` - A naming pattern could not be compiled
    pub fn analyze_series(&self, series: &Series, volumes: &[Volume]) -> Result<Option<SeriesReport>> {
        let mut sorted_volumes: Vec<&Volume> = volumes.iter().collect();
        sorted_volumes.sort_by_key(|volume| volume.number);

        let numbering = classify_numbering(&sorted_volumes);
        let volume_one = volume_one_chapters(&sorted_volumes);
        debug!(
            "Series '{}': {} volumes, {:?} numbering",
            series.name,
            sorted_volumes.len(),
            numbering
        );

        let reports = sorted_volumes
            .par_iter()
            .map(|volume| {
                let mut report = self.analyze_volume(volume)?;
                report.overlap = find_volume_overlap(volume, numbering, &volume_one);
                Ok(report)
            })
            .collect::<Result<Vec<VolumeReport>>>()?;

        let volumes: Vec<VolumeReport> = reports
            .into_iter()
            .filter(|report| !report.is_clean())
            .collect();

        if volumes.is_empty() {
            return Ok(None);
        }

        Ok(Some(SeriesReport {
            series: series.clone(),
            numbering,
            volumes,
        }))
    }

    /// Runs the gap, duplicate and naming checks over one volume.
    ///
    /// The returned report may be clean; callers drop clean volumes.
    pub fn analyze_volume(&self, volume: &Volume) -> Result<VolumeReport> {
        let mut chapters = volume.chapters.clone();
        chapters.sort_by(|a, b| a.number.cmp(&b.number));

        let mut findings = find_missing_ranges(&chapters);
        findings.extend(find_duplicate_files(&chapters));
        if self.check_file_names {
            let naming = find_file_name_mismatches(volume.number, &chapters)?;
            // Mismatches come before unanalyzable chapters in the report.
            let (mismatches, unanalyzable): (Vec<Finding>, Vec<Finding>) = naming
                .into_iter()
                .partition(|finding| matches!(finding, Finding::FilenameMismatch { .. }));
            findings.extend(mismatches);
            findings.extend(unanalyzable);
        }

        Ok(VolumeReport {
            number: volume.number,
            overlap: None,
            findings,
        })
    }
}

/// Chapter numbers of the first volume numbered `1`, or an empty set.
pub fn volume_one_chapters(volumes: &[&Volume]) -> HashSet<ChapterNumber> {
    volumes
        .iter()
        .find(|volume| volume.number == 1)
        .map(|volume| volume.chapters.iter().map(|c| c.number).collect())
        .unwrap_or_default()
}

/// Flags a volume after Volume 1 that reuses one of its chapter numbers.
///
/// Only meaningful for continuously numbered series; volume-relative series
/// reuse small numbers in every volume and are never flagged.
pub fn find_volume_overlap(
    volume: &Volume,
    numbering: NumberingScheme,
    volume_one: &HashSet<ChapterNumber>,
) -> Option<Finding> {
    if numbering != NumberingScheme::Continuous || volume.number <= 1 {
        return None;
    }
    volume
        .chapters
        .iter()
        .any(|chapter| volume_one.contains(&chapter.number))
        .then_some(Finding::VolumeOverlap {
            volume: volume.number,
        })
}
