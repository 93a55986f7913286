//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to resolved movie records.

use domain::{GenreFilter, MovieRecord, Result};

/// Core trait for filtering resolved records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows one pipeline to be shared by concurrent requests
/// - Filters take ownership of the Vec<MovieRecord> and return a filtered Vec
/// - Filters must never add records or reorder the ones they keep
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of records.
    ///
    /// # Arguments
    /// * `records` - The records to filter (takes ownership)
    /// * `genres` - The caller's genre selection for this request
    fn apply(&self, records: Vec<MovieRecord>, genres: &GenreFilter) -> Result<Vec<MovieRecord>>;
}
