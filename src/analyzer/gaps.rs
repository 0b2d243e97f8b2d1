//! Missing-chapter detection within one volume.

use crate::types::{Chapter, Finding};

/// A neighbour more than `1.1` chapters ahead is a gap. The extra `.1` absorbs
/// the `N -> N.5` companion-chapter pattern while still flagging `1 -> 2.5`.
pub const GAP_TOLERANCE_TENTHS: i64 = 11;

/// Finds missing whole-chapter ranges between adjacent chapters.
///
/// `chapters` must already be sorted ascending by number. Only neighbours are
/// compared, so `n` chapters yield at most `n - 1` ranges.
///
/// # Returns
///
/// * `Vec<Finding>` - One [`Finding::MissingRange`] per suspicious gap, with
///   `first = floor(a + 1)` and `last = floor(b - 1)`. When `last` would fall
///   below `first` (e.g. `1 -> 2.5`) the range collapses to `first-first`.
pub fn find_missing_ranges(chapters: &[Chapter]) -> Vec<Finding> {
    chapters
        .windows(2)
        .filter_map(|pair| {
            let (current, next) = (&pair[0].number, &pair[1].number);
            if current.offset_is_below(GAP_TOLERANCE_TENTHS, next) {
                let first = current.floor() + 1;
                let last = (next.floor() - 1).max(first);
                Some(Finding::MissingRange { first, last })
            } else {
                None
            }
        })
        .collect()
}
