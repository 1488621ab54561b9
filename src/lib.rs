//! Job Match - content-based job recommendation service
//!
//! Profiles and job postings are embedded with a model trained on the batch
//! itself (skip-gram word vectors or TF-IDF), compared by cosine similarity,
//! adjusted with attribute bonuses and ranked per profile.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    MatchError, ModelKind, RankingConfig, Recommender, SimilarityModel, TrainedModel,
};
pub use crate::models::{BonusWeights, Job, Profile, Recommendation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let recommender = Recommender::default();
        assert_eq!(recommender.kind(), ModelKind::Word2vec);
        assert_eq!(recommender.ranking(), RankingConfig::default());
    }
}
