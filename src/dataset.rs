//! Loaded dataset snapshot: rating records plus the movie catalog.
//!
//! The dataset is read-only after construction. Every recommendation or
//! evaluation run re-derives its matrices from this snapshot, so the
//! structures here are safe to share behind an `Arc` across concurrent
//! readers.

use crate::types::{MovieRecord, RatingRecord};
use std::collections::HashMap;

/// Movie metadata lookup, keyed by movie id.
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    movies: HashMap<u32, MovieRecord>,
}

impl MovieCatalog {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            movies: movies.into_iter().map(|m| (m.movie_id, m)).collect(),
        }
    }

    pub fn get(&self, movie_id: u32) -> Option<&MovieRecord> {
        self.movies.get(&movie_id)
    }

    pub fn title(&self, movie_id: u32) -> Option<&str> {
        self.movies.get(&movie_id).map(|m| m.title.as_str())
    }

    /// Case-insensitive genre membership. Movies missing from the catalog
    /// never match a filter.
    pub fn has_genre(&self, movie_id: u32, genre: &str) -> bool {
        self.movies
            .get(&movie_id)
            .map(|m| m.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Immutable snapshot of all loaded rating records and movie metadata.
///
/// Parsing and row validation happen at the ingestion boundary; the dataset
/// receives already-structured records.
#[derive(Debug, Clone)]
pub struct Dataset {
    ratings: Vec<RatingRecord>,
    catalog: MovieCatalog,
}

impl Dataset {
    pub fn new(ratings: Vec<RatingRecord>, movies: Vec<MovieRecord>) -> Self {
        Self {
            ratings,
            catalog: MovieCatalog::new(movies),
        }
    }

    pub fn ratings(&self) -> &[RatingRecord] {
        &self.ratings
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }
}
