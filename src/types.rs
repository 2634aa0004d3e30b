//! Core data types shared across the recommendation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed rating, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: u32,
    pub movie_id: u32,
    pub rating: f64,
    pub timestamp: DateTime<Utc>,
}

/// Read-only catalog entry for a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub movie_id: u32,
    pub title: String,
    /// Ordered genre tags; matched case-insensitively against filters.
    pub genres: Vec<String>,
}

/// Collaborative filtering method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    UserBased,
    ItemBased,
}

/// Raw predicted score for a single (user, movie) pair.
///
/// `support` is the accumulated |similarity| mass behind the score. Zero
/// support means the movie had no backing in the matrix the prediction was
/// computed from (e.g. unseen in a training split) and the score carries no
/// information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub score: f64,
    pub support: f64,
}

/// One entry of a ranked recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMovie {
    pub movie_id: u32,
    pub score: f64,
}

/// One entry of the non-personalized popularity ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularMovie {
    pub movie_id: u32,
    pub mean_rating: f64,
    pub rating_count: usize,
}

/// Parameters of a personalized recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: u32,
    pub method: Method,
    pub top_n: usize,
    /// Optional free-text genre filter, matched case-insensitively.
    pub genre: Option<String>,
}

/// A recommended movie enriched with catalog data for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub movie_id: u32,
    pub title: String,
    pub predicted_score: f64,
    /// Mean observed rating across all users, if the movie has any ratings.
    pub mean_rating: Option<f64>,
}

/// Recommendation results together with the echoed request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_id: u32,
    pub method: Method,
    pub top_n: usize,
    pub genre: Option<String>,
    pub results: Vec<RecommendedMovie>,
}

/// Outcome of an offline evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub rmse: f64,
    /// Test entries that contributed to the RMSE.
    pub evaluated: usize,
    /// Test entries skipped for zero similarity support in the train split.
    pub skipped: usize,
    pub test_size: usize,
}
