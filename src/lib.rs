//! # Cinerec
//!
//! Collaborative filtering recommendation core for movie rating datasets.
//!
//! The crate turns already-parsed rating records into a user-item
//! interaction matrix, computes pairwise cosine similarity over users or
//! movies, predicts ratings, ranks movies by popularity for cold-start
//! callers, and measures prediction accuracy on a masked train/test split.
//! Parsing, presentation, and deployment live outside this crate; it
//! consumes structured records and returns structured results.
//!
//! ## Modules
//!
//! - `types`: boundary records, requests, responses, reports
//! - `error`: error taxonomy and crate `Result`
//! - `dataset`: read-only rating + catalog snapshot
//! - `matrix`: interaction matrix builder
//! - `similarity`: pairwise cosine similarity engine
//! - `predictor`: user-based / item-based prediction and top-N ranking
//! - `popularity`: non-personalized mean-rating ranking
//! - `evaluate`: masked-split evaluation and RMSE
//! - `engine`: facade wiring the pipeline with lazy similarity caches
//!
//! ## Quick start
//!
//! ```
//! use chrono::Utc;
//! use cinerec::{
//!     Dataset, EngineConfig, Method, RatingRecord, RecommendationRequest, RecommenderEngine,
//! };
//!
//! let ratings = vec![
//!     RatingRecord { user_id: 1, movie_id: 1, rating: 5.0, timestamp: Utc::now() },
//!     RatingRecord { user_id: 1, movie_id: 2, rating: 3.0, timestamp: Utc::now() },
//!     RatingRecord { user_id: 2, movie_id: 1, rating: 4.0, timestamp: Utc::now() },
//!     RatingRecord { user_id: 2, movie_id: 3, rating: 2.0, timestamp: Utc::now() },
//! ];
//!
//! let engine = RecommenderEngine::new(
//!     Dataset::new(ratings, Vec::new()),
//!     EngineConfig::default(),
//! ).expect("valid dataset");
//!
//! let response = engine.recommend(&RecommendationRequest {
//!     user_id: 1,
//!     method: Method::UserBased,
//!     top_n: 10,
//!     genre: None,
//! }).expect("known user");
//!
//! assert_eq!(response.results[0].movie_id, 3);
//! ```

pub mod dataset;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod matrix;
pub mod popularity;
pub mod predictor;
pub mod similarity;
pub mod types;

pub use dataset::{Dataset, MovieCatalog};
pub use engine::{EngineConfig, RecommenderEngine};
pub use error::{RecommendError, Result};
pub use evaluate::{rmse, Evaluator};
pub use matrix::InteractionMatrix;
pub use popularity::PopularityRanker;
pub use predictor::Predictor;
pub use similarity::{cosine, Axis, SimilarityMatrix, EPSILON};
pub use types::{
    EvaluationReport, Method, MovieRecord, PopularMovie, Prediction, RatingRecord,
    RecommendationRequest, RecommendationResponse, RecommendedMovie, ScoredMovie,
};
