//! Volume numbering convention detection.

use std::borrow::Borrow;

use crate::number::ChapterNumber;
use crate::types::{NumberingScheme, Volume};

/// A second volume holding a chapter below this number restarts numbering.
const RESTART_THRESHOLD: ChapterNumber = ChapterNumber::whole(2);

/// Decides whether chapter numbers restart per volume or run across the series.
///
/// `sorted_volumes` must be sorted ascending by volume number. With fewer than
/// two volumes there is nothing to compare against and the series counts as
/// volume-relative.
pub fn classify_numbering<V: Borrow<Volume>>(sorted_volumes: &[V]) -> NumberingScheme {
    match sorted_volumes.get(1) {
        Some(second)
            if !second
                .borrow()
                .chapters
                .iter()
                .any(|chapter| chapter.number < RESTART_THRESHOLD) =>
        {
            NumberingScheme::Continuous
        }
        _ => NumberingScheme::VolumeRelative,
    }
}
