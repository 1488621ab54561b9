// Core algorithm exports
pub mod error;
pub mod matcher;
pub mod scoring;
pub mod similarity;
pub mod stopwords;
pub mod text;
pub mod tfidf;
pub mod word2vec;

pub use error::MatchError;
pub use matcher::{ModelKind, RankingConfig, Recommender, TrainedModel};
pub use scoring::blend_score;
pub use similarity::{cosine_similarity, SimilarityModel};
pub use text::{build_corpus, job_text, preprocess, profile_text};
pub use tfidf::TfIdfModel;
pub use word2vec::{TrainingConfig, Word2Vec, WordVectors};
