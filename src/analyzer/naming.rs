//! File naming convention checks.
//!
//! A chapter file is expected to carry `Vol. {volume} Ch. {chapter}` in its base
//! name, e.g. `Series Vol. 2 Ch. 005.cbz`. Volume 1 may instead use the looser
//! `Chapter {chapter}` form. Leading zeros before the chapter number are allowed.

use regex::Regex;

use crate::error::Result;
use crate::number::ChapterNumber;
use crate::types::{Chapter, Finding};

/// Checks the first file of every non-special chapter against the naming convention.
///
/// # Arguments
///
/// * `volume_number` - Number of the volume the chapters belong to
/// * `chapters` - The volume's chapters, sorted ascending by number
///
/// # Returns
///
/// * `Ok(Vec<Finding>)` - [`Finding::FilenameMismatch`] for names that match neither
///   pattern, and [`Finding::Unanalyzable`] for non-special chapters without files
/// * `Err(Error)` - A pattern could not be compiled
pub fn find_file_name_mismatches(volume_number: i32, chapters: &[Chapter]) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    for chapter in chapters {
        if chapter.is_special {
            continue;
        }

        let Some(file) = chapter.files.first() else {
            findings.push(Finding::Unanalyzable {
                chapter: chapter.number,
            });
            continue;
        };

        let file_name = file.base_name();
        if !matches_convention(volume_number, &chapter.number, file_name)? {
            findings.push(Finding::FilenameMismatch {
                chapter: chapter.number,
                file_name: file_name.to_string(),
                volume: volume_number,
            });
        }
    }
    Ok(findings)
}

/// Returns `true` if `file_name` follows the convention for the given volume and chapter.
///
/// The chapter number is matched literally in its invariant rendering, so `10.5`
/// does not accept `10x5`.
pub fn matches_convention(
    volume_number: i32,
    chapter_number: &ChapterNumber,
    file_name: &str,
) -> Result<bool> {
    let number = regex::escape(&chapter_number.to_string());

    let primary = Regex::new(&format!(r"Vol\. {} Ch\. 0*{}", volume_number, number))?;
    if primary.is_match(file_name) {
        return Ok(true);
    }
    if volume_number != 1 {
        return Ok(false);
    }

    let fallback = Regex::new(&format!(r"Chapter 0*{}", number))?;
    Ok(fallback.is_match(file_name))
}
