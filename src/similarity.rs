//! Pairwise cosine similarity over interaction matrix rows or columns.
//!
//! The engine computes the full dense pairwise matrix: O(N² · D) where N is
//! the number of entities on the chosen axis and D the dimensionality of the
//! other axis. Each unordered pair is computed once and mirrored, so
//! `sim(a, b) == sim(b, a)` holds exactly, not just within tolerance.

use crate::matrix::InteractionMatrix;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Denominator floor guarding against zero-norm vectors. Zero vectors fall
/// out as similarity 0 everywhere without explicit zero checks.
pub const EPSILON: f64 = 1e-8;

/// Which axis of the interaction matrix to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Compare user rating rows.
    Users,
    /// Compare movie rating columns.
    Items,
}

/// Cosine similarity of two raw rating vectors, including zero-fill cells.
pub fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    dot / (norm_a * norm_b + EPSILON)
}

/// Square symmetric similarity matrix over one axis of the interactions.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Array2<f64>,
    ids: Vec<u32>,
    index: HashMap<u32, usize>,
    axis: Axis,
}

impl SimilarityMatrix {
    pub fn from_interactions(matrix: &InteractionMatrix, axis: Axis) -> Self {
        let ids: Vec<u32> = match axis {
            Axis::Users => matrix.user_ids().to_vec(),
            Axis::Items => matrix.movie_ids().to_vec(),
        };
        let n = ids.len();
        let values = matrix.values();

        let vector = |i: usize| match axis {
            Axis::Users => values.row(i),
            Axis::Items => values.column(i),
        };

        let mut scores = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                let s = cosine(vector(i), vector(j));
                scores[[i, j]] = s;
                scores[[j, i]] = s;
            }
        }

        tracing::debug!(?axis, entities = n, "computed similarity matrix");

        let index = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self {
            scores,
            ids,
            index,
            axis,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Entity ids in row/column order.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn index(&self, id: u32) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Similarity between two entities by id.
    pub fn get(&self, a: u32, b: u32) -> Option<f64> {
        match (self.index(a), self.index(b)) {
            (Some(i), Some(j)) => Some(self.scores[[i, j]]),
            _ => None,
        }
    }

    pub(crate) fn score_at(&self, i: usize, j: usize) -> f64 {
        self.scores[[i, j]]
    }

    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }
}
