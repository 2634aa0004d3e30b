//! Non-personalized popularity ranking.
//!
//! Ranks movies by mean observed rating over those with enough ratings to
//! be meaningful. Identical inputs produce identical output for any caller;
//! this is the cold-start fallback surface and the "most popular" view.

use crate::dataset::MovieCatalog;
use crate::types::{PopularMovie, RatingRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

pub struct PopularityRanker {
    /// Minimum number of ratings a movie needs to be ranked.
    min_ratings: usize,
}

impl PopularityRanker {
    pub fn new(min_ratings: usize) -> Self {
        Self { min_ratings }
    }

    /// Top-N movies by mean rating, descending, with ascending movie-id
    /// tie-break. Movies below the rating-count threshold are dropped, as
    /// are movies outside the genre filter when one is given.
    pub fn rank(
        &self,
        records: &[RatingRecord],
        catalog: &MovieCatalog,
        genre: Option<&str>,
        top_n: usize,
    ) -> Vec<PopularMovie> {
        let mut aggregate: HashMap<u32, (f64, usize)> = HashMap::new();
        for record in records {
            let entry = aggregate.entry(record.movie_id).or_insert((0.0, 0));
            entry.0 += record.rating;
            entry.1 += 1;
        }

        let mut ranked: Vec<PopularMovie> = aggregate
            .into_iter()
            .filter(|(_, (_, count))| *count >= self.min_ratings)
            .filter(|(movie_id, _)| match genre {
                Some(genre) => catalog.has_genre(*movie_id, genre),
                None => true,
            })
            .map(|(movie_id, (sum, count))| PopularMovie {
                movie_id,
                mean_rating: sum / count as f64,
                rating_count: count,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.mean_rating
                .partial_cmp(&a.mean_rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.movie_id.cmp(&b.movie_id))
        });
        ranked.truncate(top_n);
        ranked
    }
}
