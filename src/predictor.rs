//! Rating prediction and top-N recommendation.
//!
//! Predicted scores are similarity-weighted sums of observed ratings,
//! normalized by the |similarity| mass of the contributing neighbors:
//!
//! - user-based: neighbors are the other users who rated the movie
//! - item-based: neighbors are the movies the target user has rated
//!
//! The method follows the axis of the supplied similarity matrix: a
//! user-axis matrix gives user-based predictions, an item-axis matrix gives
//! item-based predictions.

use crate::dataset::MovieCatalog;
use crate::error::{RecommendError, Result};
use crate::matrix::InteractionMatrix;
use crate::similarity::{Axis, SimilarityMatrix, EPSILON};
use crate::types::{Prediction, ScoredMovie};
use std::cmp::Ordering;

pub struct Predictor<'a> {
    matrix: &'a InteractionMatrix,
    similarity: &'a SimilarityMatrix,
    catalog: &'a MovieCatalog,
}

impl<'a> Predictor<'a> {
    /// The similarity matrix must have been computed from `matrix`, so that
    /// entity indices line up.
    pub fn new(
        matrix: &'a InteractionMatrix,
        similarity: &'a SimilarityMatrix,
        catalog: &'a MovieCatalog,
    ) -> Self {
        debug_assert_eq!(
            similarity.ids(),
            match similarity.axis() {
                Axis::Users => matrix.user_ids(),
                Axis::Items => matrix.movie_ids(),
            }
        );
        Self {
            matrix,
            similarity,
            catalog,
        }
    }

    /// Raw predicted score for one (user, movie) pair.
    ///
    /// Does not exclude already-rated movies; the evaluator scores withheld
    /// pairs through this entry point. An unknown movie yields a
    /// zero-support prediction rather than an error, since that is a
    /// steady-state condition for train splits.
    pub fn score(&self, user_id: u32, movie_id: u32) -> Result<Prediction> {
        let user_idx = self
            .matrix
            .user_index(user_id)
            .ok_or(RecommendError::UnknownUser(user_id))?;

        let Some(movie_idx) = self.matrix.movie_index(movie_id) else {
            return Ok(Prediction {
                score: 0.0,
                support: 0.0,
            });
        };

        Ok(self.score_idx(user_idx, movie_idx))
    }

    fn score_idx(&self, user_idx: usize, movie_idx: usize) -> Prediction {
        let values = self.matrix.values();
        let mut weighted = 0.0;
        let mut support = 0.0;

        match self.similarity.axis() {
            Axis::Users => {
                for u in 0..self.matrix.n_users() {
                    if u == user_idx || !self.matrix.is_rated_idx(u, movie_idx) {
                        continue;
                    }
                    let s = self.similarity.score_at(user_idx, u);
                    weighted += s * values[[u, movie_idx]];
                    support += s.abs();
                }
            }
            Axis::Items => {
                for m in 0..self.matrix.n_movies() {
                    if !self.matrix.is_rated_idx(user_idx, m) {
                        continue;
                    }
                    let s = self.similarity.score_at(movie_idx, m);
                    weighted += s * values[[user_idx, m]];
                    support += s.abs();
                }
            }
        }

        Prediction {
            score: weighted / (support + EPSILON),
            support,
        }
    }

    /// Ranked top-N recommendations for a user.
    ///
    /// Movies the user has rated are excluded via the observed mask (a real
    /// rating, never the zero fill). With a genre filter, only movies whose
    /// genre set contains the filter (case-insensitively) qualify. Results
    /// sort descending by score with ascending movie-id tie-break; fewer
    /// than N qualifying movies returns all of them.
    pub fn recommend(
        &self,
        user_id: u32,
        top_n: usize,
        genre: Option<&str>,
    ) -> Result<Vec<ScoredMovie>> {
        let user_idx = self
            .matrix
            .user_index(user_id)
            .ok_or(RecommendError::UnknownUser(user_id))?;

        let mut scored: Vec<ScoredMovie> = Vec::new();
        for (movie_idx, &movie_id) in self.matrix.movie_ids().iter().enumerate() {
            if self.matrix.is_rated_idx(user_idx, movie_idx) {
                continue;
            }
            if let Some(genre) = genre {
                if !self.catalog.has_genre(movie_id, genre) {
                    continue;
                }
            }
            let prediction = self.score_idx(user_idx, movie_idx);
            scored.push(ScoredMovie {
                movie_id,
                score: prediction.score,
            });
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        scored.truncate(top_n);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovieRecord, RatingRecord};
    use chrono::Utc;

    fn rating(user_id: u32, movie_id: u32, rating: f64) -> RatingRecord {
        RatingRecord {
            user_id,
            movie_id,
            rating,
            timestamp: Utc::now(),
        }
    }

    fn movie(movie_id: u32, title: &str, genres: &[&str]) -> MovieRecord {
        MovieRecord {
            movie_id,
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    // The three-user dataset from the evaluation scenario:
    // u1 rated i1=5, i2=3; u2 rated i1=4, i3=2; u3 rated i2=1
    fn scenario_records() -> Vec<RatingRecord> {
        vec![
            rating(1, 1, 5.0),
            rating(1, 2, 3.0),
            rating(2, 1, 4.0),
            rating(2, 3, 2.0),
            rating(3, 2, 1.0),
        ]
    }

    #[test]
    fn test_user_based_score_matches_weighted_formula() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Users);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        // Only u2 rated i3, so the prediction reduces to
        // sim(u1,u2) * 2 / (|sim(u1,u2)| + eps)
        let s = sim.get(1, 2).unwrap();
        let expected = s * 2.0 / (s.abs() + EPSILON);

        let prediction = predictor.score(1, 3).unwrap();
        assert!((prediction.score - expected).abs() < 1e-6);
        assert!(prediction.support > 0.0);
    }

    #[test]
    fn test_unknown_user_is_an_error() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Users);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        assert!(matches!(
            predictor.score(99, 1),
            Err(RecommendError::UnknownUser(99))
        ));
        assert!(matches!(
            predictor.recommend(99, 5, None),
            Err(RecommendError::UnknownUser(99))
        ));
    }

    #[test]
    fn test_unknown_movie_has_zero_support() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Users);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        let prediction = predictor.score(1, 999).unwrap();
        assert_eq!(prediction.support, 0.0);
        assert_eq!(prediction.score, 0.0);
    }

    #[test]
    fn test_recommend_excludes_rated_movies() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let catalog = MovieCatalog::default();

        for axis in [Axis::Users, Axis::Items] {
            let sim = SimilarityMatrix::from_interactions(&matrix, axis);
            let predictor = Predictor::new(&matrix, &sim, &catalog);
            let results = predictor.recommend(1, 10, None).unwrap();

            // u1 rated movies 1 and 2
            assert!(results.iter().all(|r| r.movie_id != 1 && r.movie_id != 2));
        }
    }

    #[test]
    fn test_recommend_returns_fewer_than_n_without_padding() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Users);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        // Only movie 3 is unrated by u1
        let results = predictor.recommend(1, 50, None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].movie_id, 3);
    }

    #[test]
    fn test_recommend_is_sorted_with_id_tie_break() {
        // u1 and u2 rate identically, so u3's candidate movies tie exactly
        let records = vec![
            rating(1, 10, 4.0),
            rating(1, 20, 4.0),
            rating(2, 10, 4.0),
            rating(2, 20, 4.0),
            rating(3, 30, 3.0),
        ];
        let matrix = InteractionMatrix::from_records(&records).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Users);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        let results = predictor.recommend(3, 10, None).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].movie_id, 10);
        assert_eq!(results[1].movie_id, 20);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_recommend_applies_genre_filter() {
        let catalog = MovieCatalog::new(vec![
            movie(3, "Alien", &["Horror", "Sci-Fi"]),
            movie(4, "Clueless", &["Comedy"]),
        ]);
        let mut records = scenario_records();
        records.push(rating(2, 4, 3.0));

        let matrix = InteractionMatrix::from_records(&records).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Items);
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        let results = predictor.recommend(1, 10, Some("sci-fi")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].movie_id, 3);
    }

    #[test]
    fn test_item_based_score_uses_rated_movies() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Items);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        // pred(u1, i3) = (sim(i3,i1)*5 + sim(i3,i2)*3) / (|sim(i3,i1)| + |sim(i3,i2)| + eps)
        let s31 = sim.get(3, 1).unwrap();
        let s32 = sim.get(3, 2).unwrap();
        let expected = (s31 * 5.0 + s32 * 3.0) / (s31.abs() + s32.abs() + EPSILON);

        let prediction = predictor.score(1, 3).unwrap();
        assert!((prediction.score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_identical_requests_are_idempotent() {
        let matrix = InteractionMatrix::from_records(&scenario_records()).unwrap();
        let sim = SimilarityMatrix::from_interactions(&matrix, Axis::Users);
        let catalog = MovieCatalog::default();
        let predictor = Predictor::new(&matrix, &sim, &catalog);

        let first = predictor.recommend(1, 10, None).unwrap();
        let second = predictor.recommend(1, 10, None).unwrap();
        assert_eq!(first, second);
    }
}
