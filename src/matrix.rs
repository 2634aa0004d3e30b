//! User-item interaction matrix construction.
//!
//! Rows are distinct user ids, columns are distinct movie ids, both sorted
//! ascending so matrix layout is deterministic for a given set of records.
//! Unrated cells hold 0.0; because the rating scale starts above zero, the
//! fill value cannot collide with a real rating. An explicit observed mask
//! is kept alongside the values so "has this user rated this movie" never
//! depends on the fill convention.

use crate::error::{RecommendError, Result};
use crate::types::RatingRecord;
use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Dense user-item rating matrix with id↔index maps and an observed mask.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    /// `[n_users x n_movies]`, unrated cells filled with 0.0.
    values: Array2<f64>,
    /// (user_index, movie_index) pairs present in the raw records.
    observed: HashSet<(usize, usize)>,
    user_ids: Vec<u32>,
    movie_ids: Vec<u32>,
    user_index: HashMap<u32, usize>,
    movie_index: HashMap<u32, usize>,
}

impl InteractionMatrix {
    /// Build the matrix from rating records.
    ///
    /// Duplicate (user, movie) pairs resolve last-write-wins, replaying the
    /// record sequence in order. Empty input or a non-finite / non-positive
    /// rating is rejected as malformed.
    pub fn from_records(records: &[RatingRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(RecommendError::Data("no rating records".to_string()));
        }

        let mut user_set = BTreeSet::new();
        let mut movie_set = BTreeSet::new();
        for record in records {
            if !record.rating.is_finite() || record.rating <= 0.0 {
                return Err(RecommendError::Data(format!(
                    "invalid rating {} for user {} movie {}",
                    record.rating, record.user_id, record.movie_id
                )));
            }
            user_set.insert(record.user_id);
            movie_set.insert(record.movie_id);
        }

        let user_ids: Vec<u32> = user_set.into_iter().collect();
        let movie_ids: Vec<u32> = movie_set.into_iter().collect();
        let user_index: HashMap<u32, usize> =
            user_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let movie_index: HashMap<u32, usize> =
            movie_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut values = Array2::<f64>::zeros((user_ids.len(), movie_ids.len()));
        let mut observed = HashSet::with_capacity(records.len());
        for record in records {
            let u = user_index[&record.user_id];
            let m = movie_index[&record.movie_id];
            values[[u, m]] = record.rating;
            observed.insert((u, m));
        }

        tracing::debug!(
            users = user_ids.len(),
            movies = movie_ids.len(),
            ratings = observed.len(),
            "built interaction matrix"
        );

        Ok(Self {
            values,
            observed,
            user_ids,
            movie_ids,
            user_index,
            movie_index,
        })
    }

    pub fn n_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn n_movies(&self) -> usize {
        self.movie_ids.len()
    }

    /// Distinct user ids in row order.
    pub fn user_ids(&self) -> &[u32] {
        &self.user_ids
    }

    /// Distinct movie ids in column order.
    pub fn movie_ids(&self) -> &[u32] {
        &self.movie_ids
    }

    pub fn user_index(&self, user_id: u32) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    pub fn movie_index(&self, movie_id: u32) -> Option<usize> {
        self.movie_index.get(&movie_id).copied()
    }

    /// Rating row for a user, or `None` for an unknown user.
    pub fn user_row(&self, user_id: u32) -> Option<ArrayView1<'_, f64>> {
        self.user_index(user_id).map(|u| self.values.row(u))
    }

    /// Rating column for a movie, or `None` for an unknown movie.
    pub fn movie_column(&self, movie_id: u32) -> Option<ArrayView1<'_, f64>> {
        self.movie_index(movie_id).map(|m| self.values.column(m))
    }

    /// Whether the pair appears in the raw records, regardless of value.
    pub fn is_rated(&self, user_id: u32, movie_id: u32) -> bool {
        match (self.user_index(user_id), self.movie_index(movie_id)) {
            (Some(u), Some(m)) => self.observed.contains(&(u, m)),
            _ => false,
        }
    }

    pub(crate) fn is_rated_idx(&self, user_idx: usize, movie_idx: usize) -> bool {
        self.observed.contains(&(user_idx, movie_idx))
    }

    /// Full dense matrix for pairwise similarity computation.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
