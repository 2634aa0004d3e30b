//! Offline evaluation via per-user masked train/test split and RMSE.
//!
//! For each user independently, a seeded RNG withholds floor(f · n) of the
//! user's n ratings as test entries. The matrix and similarity are rebuilt
//! from the train split alone (fresh instances, never the live caches) and
//! every withheld pair is scored through the predictor's raw entry point.
//! Test entries whose movie had zero similarity support in the train split
//! are excluded from the metric and reported separately.

use crate::dataset::MovieCatalog;
use crate::error::{RecommendError, Result};
use crate::matrix::InteractionMatrix;
use crate::predictor::Predictor;
use crate::similarity::{Axis, SimilarityMatrix};
use crate::types::{EvaluationReport, Method, RatingRecord};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Root-mean-square error over (predicted, actual) pairs.
///
/// Returns 0.0 for an empty slice; callers decide whether that case is
/// meaningful before asking for the metric.
pub fn rmse(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let sum: f64 = pairs
        .iter()
        .map(|(predicted, actual)| (actual - predicted).powi(2))
        .sum();
    (sum / pairs.len() as f64).sqrt()
}

pub struct Evaluator {
    mask_fraction: f64,
    seed: u64,
}

impl Evaluator {
    /// `mask_fraction` must lie in [0, 1). A fraction of 0 is accepted here
    /// and surfaces as `InsufficientData` when evaluation finds the test
    /// set empty.
    pub fn new(mask_fraction: f64, seed: u64) -> Result<Self> {
        if !mask_fraction.is_finite() || !(0.0..1.0).contains(&mask_fraction) {
            return Err(RecommendError::Data(format!(
                "mask fraction {mask_fraction} outside [0, 1)"
            )));
        }
        Ok(Self {
            mask_fraction,
            seed,
        })
    }

    /// Split, retrain, score withheld entries, and report RMSE.
    pub fn evaluate(
        &self,
        records: &[RatingRecord],
        catalog: &MovieCatalog,
        method: Method,
    ) -> Result<EvaluationReport> {
        let (train, test) = self.split(records);

        if test.is_empty() {
            return Err(RecommendError::InsufficientData(
                "test set is empty after masking".to_string(),
            ));
        }

        tracing::debug!(
            train = train.len(),
            test = test.len(),
            ?method,
            "evaluating on masked split"
        );

        let matrix = InteractionMatrix::from_records(&train)?;
        let axis = match method {
            Method::UserBased => Axis::Users,
            Method::ItemBased => Axis::Items,
        };
        let similarity = SimilarityMatrix::from_interactions(&matrix, axis);
        let predictor = Predictor::new(&matrix, &similarity, catalog);

        let mut pairs = Vec::with_capacity(test.len());
        let mut skipped = 0usize;
        for record in &test {
            let prediction = predictor.score(record.user_id, record.movie_id)?;
            if prediction.support <= 0.0 {
                // Movie unseen in the train split, or no overlapping raters:
                // the score carries no signal and would corrupt the metric.
                skipped += 1;
                continue;
            }
            pairs.push((prediction.score, record.rating));
        }

        if pairs.is_empty() {
            return Err(RecommendError::InsufficientData(
                "every test entry lacked similarity support".to_string(),
            ));
        }

        Ok(EvaluationReport {
            rmse: rmse(&pairs),
            evaluated: pairs.len(),
            skipped,
            test_size: test.len(),
        })
    }

    /// Per-user random masking. Users are visited in ascending id order and
    /// a single seeded RNG drives all draws, so the split is reproducible
    /// for a given (records, seed) pair. Users with too few ratings for
    /// floor(f · n) to reach 1 contribute nothing to the test set.
    fn split(&self, records: &[RatingRecord]) -> (Vec<RatingRecord>, Vec<RatingRecord>) {
        let mut by_user: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            by_user.entry(record.user_id).or_default().push(i);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut in_test = vec![false; records.len()];
        for positions in by_user.values() {
            let n_test = (self.mask_fraction * positions.len() as f64).floor() as usize;
            if n_test == 0 {
                continue;
            }
            for chosen in rand::seq::index::sample(&mut rng, positions.len(), n_test) {
                in_test[positions[chosen]] = true;
            }
        }

        let mut train = Vec::with_capacity(records.len());
        let mut test = Vec::new();
        for (i, record) in records.iter().enumerate() {
            if in_test[i] {
                test.push(record.clone());
            } else {
                train.push(record.clone());
            }
        }
        (train, test)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rating(user_id: u32, movie_id: u32, rating: f64) -> RatingRecord {
        RatingRecord {
            user_id,
            movie_id,
            rating,
            timestamp: Utc::now(),
        }
    }

    fn dense_records() -> Vec<RatingRecord> {
        // 4 users x 4 movies, fully rated
        let mut records = Vec::new();
        for user in 1..=4 {
            for movie in 1..=4 {
                records.push(rating(user, movie, ((user + movie) % 5 + 1) as f64));
            }
        }
        records
    }

    #[test]
    fn test_rmse_of_exact_predictions_is_zero() {
        let pairs = vec![(4.0, 4.0), (2.5, 2.5), (1.0, 1.0)];
        assert!(rmse(&pairs).abs() < 1e-9);
    }

    #[test]
    fn test_rmse_known_value() {
        // Errors of 1 and -1: mean squared error 1, RMSE 1
        let pairs = vec![(3.0, 4.0), (4.0, 3.0)];
        assert!((rmse(&pairs) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mask_fraction_zero_yields_insufficient_data() {
        let evaluator = Evaluator::new(0.0, 42).unwrap();
        let result = evaluator.evaluate(
            &dense_records(),
            &MovieCatalog::default(),
            Method::UserBased,
        );
        assert!(matches!(result, Err(RecommendError::InsufficientData(_))));
    }

    #[test]
    fn test_invalid_mask_fraction_is_rejected() {
        assert!(matches!(
            Evaluator::new(1.0, 42),
            Err(RecommendError::Data(_))
        ));
        assert!(matches!(
            Evaluator::new(-0.1, 42),
            Err(RecommendError::Data(_))
        ));
        assert!(matches!(
            Evaluator::new(f64::NAN, 42),
            Err(RecommendError::Data(_))
        ));
    }

    #[test]
    fn test_users_with_too_few_ratings_contribute_no_test_entries() {
        // One rating per user: floor(0.5 * 1) = 0 for everyone
        let records = vec![rating(1, 1, 3.0), rating(2, 1, 4.0)];
        let evaluator = Evaluator::new(0.5, 7).unwrap();
        let result = evaluator.evaluate(&records, &MovieCatalog::default(), Method::UserBased);
        assert!(matches!(result, Err(RecommendError::InsufficientData(_))));
    }

    #[test]
    fn test_split_is_reproducible_for_a_seed() {
        let records = dense_records();
        let evaluator = Evaluator::new(0.25, 1234).unwrap();
        let (train_a, test_a) = evaluator.split(&records);
        let (train_b, test_b) = evaluator.split(&records);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        // floor(0.25 * 4) = 1 withheld rating per user
        assert_eq!(test_a.len(), 4);
        assert_eq!(train_a.len(), 12);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let records = dense_records();
        let evaluator = Evaluator::new(0.25, 99).unwrap();
        let catalog = MovieCatalog::default();

        let first = evaluator
            .evaluate(&records, &catalog, Method::ItemBased)
            .unwrap();
        let second = evaluator
            .evaluate(&records, &catalog, Method::ItemBased)
            .unwrap();
        assert_eq!(first, second);
        assert!(first.rmse.is_finite());
        assert!(first.rmse >= 0.0);
        assert_eq!(first.evaluated + first.skipped, first.test_size);
    }

    #[test]
    fn test_zero_support_entries_are_skipped() {
        // User 1 is the only rater of movies 8-11, so whichever of them is
        // masked has zero support in the train split. Users 5-7 hold three
        // ratings each (floor(0.25 * 3) = 0, never masked) and jointly
        // cover movies 1-4, so user 2's masked entry always has support.
        let mut records = Vec::new();
        for movie in 8..=11 {
            records.push(rating(1, movie, 4.0));
        }
        for movie in 1..=4 {
            records.push(rating(2, movie, 3.0));
        }
        records.push(rating(5, 1, 4.0));
        records.push(rating(5, 2, 3.0));
        records.push(rating(5, 3, 5.0));
        records.push(rating(6, 2, 2.0));
        records.push(rating(6, 3, 4.0));
        records.push(rating(6, 4, 3.0));
        records.push(rating(7, 1, 5.0));
        records.push(rating(7, 3, 3.0));
        records.push(rating(7, 4, 4.0));

        let evaluator = Evaluator::new(0.25, 5).unwrap();
        let report = evaluator
            .evaluate(&records, &MovieCatalog::default(), Method::UserBased)
            .unwrap();

        assert_eq!(report.test_size, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.evaluated, 1);
    }
}
