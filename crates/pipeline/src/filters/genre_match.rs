//! Filter to keep only movies matching the caller's selected genres.
//!
//! With an empty selection every record passes. With a non-empty selection a
//! record passes when at least one of its genre tags matches, ignoring case.
//! Records without genre tags are dropped while a selection is active.

use crate::traits::Filter;
use domain::{GenreFilter, MovieRecord, Result};
use tracing::debug;

/// Keeps records whose genre tags intersect the request's `GenreFilter`.
pub struct GenreMatchFilter;

impl Filter for GenreMatchFilter {
    fn name(&self) -> &str {
        "GenreMatchFilter"
    }

    fn apply(&self, records: Vec<MovieRecord>, genres: &GenreFilter) -> Result<Vec<MovieRecord>> {
        if genres.is_empty() {
            return Ok(records);
        }

        let filtered: Vec<MovieRecord> = records
            .into_iter()
            .filter(|record| {
                let keep = genres.keeps(record);
                if !keep {
                    debug!(
                        "Dropping {} (genres: {:?})",
                        record.title,
                        record.genre_tags()
                    );
                }
                keep
            })
            .collect();
        Ok(filtered)
    }
}
