//! Recommendation engine facade.
//!
//! Owns a loaded dataset snapshot, builds the interaction matrix eagerly and
//! the two similarity matrices lazily on first use. All structures are
//! immutable after construction; the lazy caches go through `OnceLock`, so
//! concurrent readers either see nothing or a fully built matrix, never a
//! partial write. Evaluation runs build their own train-split matrices and
//! never touch these caches.

use crate::dataset::Dataset;
use crate::error::{RecommendError, Result};
use crate::evaluate::Evaluator;
use crate::matrix::InteractionMatrix;
use crate::popularity::PopularityRanker;
use crate::predictor::Predictor;
use crate::similarity::{Axis, SimilarityMatrix};
use crate::types::{
    EvaluationReport, Method, PopularMovie, RecommendationRequest, RecommendationResponse,
    RecommendedMovie,
};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum rating count for a movie to appear in the popularity view.
    pub min_popularity_ratings: usize,
    /// Lower bound of the rating scale (inclusive). The scale starting
    /// above zero is what keeps the matrix zero-fill unambiguous.
    pub rating_min: f64,
    /// Upper bound of the rating scale (inclusive).
    pub rating_max: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_popularity_ratings: 50,
            rating_min: 0.5,
            rating_max: 5.0,
        }
    }
}

pub struct RecommenderEngine {
    config: EngineConfig,
    dataset: Dataset,
    matrix: InteractionMatrix,
    /// Mean observed rating per movie, for display next to predictions.
    mean_ratings: HashMap<u32, f64>,
    user_similarity: OnceLock<SimilarityMatrix>,
    item_similarity: OnceLock<SimilarityMatrix>,
}

impl RecommenderEngine {
    /// Validate the dataset against the configured rating scale and build
    /// the interaction matrix. Similarity matrices are deferred until a
    /// request needs them.
    pub fn new(dataset: Dataset, config: EngineConfig) -> Result<Self> {
        for record in dataset.ratings() {
            if record.rating < config.rating_min || record.rating > config.rating_max {
                return Err(RecommendError::Data(format!(
                    "rating {} for user {} movie {} outside scale [{}, {}]",
                    record.rating,
                    record.user_id,
                    record.movie_id,
                    config.rating_min,
                    config.rating_max
                )));
            }
        }

        let matrix = InteractionMatrix::from_records(dataset.ratings())?;

        let mut sums: HashMap<u32, (f64, usize)> = HashMap::new();
        for record in dataset.ratings() {
            let entry = sums.entry(record.movie_id).or_insert((0.0, 0));
            entry.0 += record.rating;
            entry.1 += 1;
        }
        let mean_ratings = sums
            .into_iter()
            .map(|(movie_id, (sum, count))| (movie_id, sum / count as f64))
            .collect();

        tracing::info!(
            users = matrix.n_users(),
            movies = matrix.n_movies(),
            ratings = dataset.ratings().len(),
            "recommendation engine ready"
        );

        Ok(Self {
            config,
            dataset,
            matrix,
            mean_ratings,
            user_similarity: OnceLock::new(),
            item_similarity: OnceLock::new(),
        })
    }

    pub fn with_default_config(dataset: Dataset) -> Result<Self> {
        Self::new(dataset, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    /// User-axis similarity, built once per loaded dataset.
    pub fn user_similarity(&self) -> &SimilarityMatrix {
        self.user_similarity
            .get_or_init(|| SimilarityMatrix::from_interactions(&self.matrix, Axis::Users))
    }

    /// Item-axis similarity, built once per loaded dataset.
    pub fn item_similarity(&self) -> &SimilarityMatrix {
        self.item_similarity
            .get_or_init(|| SimilarityMatrix::from_interactions(&self.matrix, Axis::Items))
    }

    /// Personalized top-N recommendations, echoing the request parameters.
    ///
    /// An unknown user propagates as `UnknownUser`; falling back to the
    /// popularity ranking for cold-start users is the caller's decision.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        if request.top_n == 0 {
            return Err(RecommendError::Data("top_n must be positive".to_string()));
        }

        let similarity = match request.method {
            Method::UserBased => self.user_similarity(),
            Method::ItemBased => self.item_similarity(),
        };
        let predictor = Predictor::new(&self.matrix, similarity, self.dataset.catalog());
        let scored = predictor.recommend(request.user_id, request.top_n, request.genre.as_deref())?;

        let results = scored
            .into_iter()
            .map(|movie| RecommendedMovie {
                movie_id: movie.movie_id,
                title: self
                    .dataset
                    .catalog()
                    .title(movie.movie_id)
                    .unwrap_or("(unknown)")
                    .to_string(),
                predicted_score: movie.score,
                mean_rating: self.mean_ratings.get(&movie.movie_id).copied(),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            user_id = request.user_id,
            method = ?request.method,
            returned = results.len(),
            "generated recommendations"
        );

        Ok(RecommendationResponse {
            user_id: request.user_id,
            method: request.method,
            top_n: request.top_n,
            genre: request.genre.clone(),
            results,
        })
    }

    /// Non-personalized popularity ranking over the loaded dataset.
    pub fn popular(&self, genre: Option<&str>, top_n: usize) -> Vec<PopularMovie> {
        PopularityRanker::new(self.config.min_popularity_ratings).rank(
            self.dataset.ratings(),
            self.dataset.catalog(),
            genre,
            top_n,
        )
    }

    /// Offline accuracy evaluation on a masked train/test split.
    pub fn evaluate(
        &self,
        method: Method,
        mask_fraction: f64,
        seed: u64,
    ) -> Result<EvaluationReport> {
        Evaluator::new(mask_fraction, seed)?.evaluate(
            self.dataset.ratings(),
            self.dataset.catalog(),
            method,
        )
    }
}
