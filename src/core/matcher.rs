use crate::core::{
    error::MatchError,
    scoring::blend_score,
    similarity::{cosine_similarity, SimilarityModel},
    text::{build_corpus, job_text, preprocess, profile_text},
    tfidf::TfIdfModel,
    word2vec::{TrainingConfig, Word2Vec, WordVectors},
};
use crate::models::{BonusWeights, Job, Profile, Recommendation};
use serde::Deserialize;

/// Which similarity backend a [`Recommender`] trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Word2vec,
    Tfidf,
}

/// Model produced by [`Recommender::train`] for one batch
#[derive(Debug, Clone)]
pub enum TrainedModel {
    WordVectors(WordVectors),
    TfIdf(TfIdfModel),
}

impl SimilarityModel for TrainedModel {
    fn dimensions(&self) -> usize {
        match self {
            TrainedModel::WordVectors(m) => m.dimensions(),
            TrainedModel::TfIdf(m) => m.dimensions(),
        }
    }

    fn embed(&self, tokens: &[String]) -> Result<Vec<f32>, MatchError> {
        match self {
            TrainedModel::WordVectors(m) => m.embed(tokens),
            TrainedModel::TfIdf(m) => m.embed(tokens),
        }
    }
}

/// Ranking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub min_match_score: f64,
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_match_score: 0.3,
            top_n: 5,
        }
    }
}

/// Recommendation pipeline
///
/// # Pipeline Stages
/// 1. Train a similarity model once per batch of profiles and jobs
/// 2. Text similarity between a profile and every job
/// 3. Bonus blending (location, contract type, salary)
/// 4. Ranking: stable sort, threshold filter, top-N truncation
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    kind: ModelKind,
    trainer: Word2Vec,
    bonuses: BonusWeights,
    ranking: RankingConfig,
}

impl Recommender {
    pub fn new(
        kind: ModelKind,
        training: TrainingConfig,
        bonuses: BonusWeights,
        ranking: RankingConfig,
    ) -> Self {
        Self {
            kind,
            trainer: Word2Vec::new(training),
            bonuses,
            ranking,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn training_config(&self) -> &TrainingConfig {
        self.trainer.config()
    }

    pub fn ranking(&self) -> RankingConfig {
        self.ranking
    }

    /// Train a model over the pooled texts of all profiles and jobs
    pub fn train(&self, profiles: &[Profile], jobs: &[Job]) -> TrainedModel {
        let corpus = build_corpus(profiles, jobs);
        tracing::info!(
            "Training {:?} model on {} documents ({} profiles, {} jobs)",
            self.kind,
            corpus.len(),
            profiles.len(),
            jobs.len()
        );

        match self.kind {
            ModelKind::Word2vec => {
                let vectors = self.trainer.train(&corpus);
                tracing::info!("Word vectors trained, vocabulary: {} words", vectors.len());
                TrainedModel::WordVectors(vectors)
            }
            ModelKind::Tfidf => {
                let model = TfIdfModel::fit(&corpus);
                tracing::info!("TF-IDF fitted, vocabulary: {} terms", model.vocabulary_len());
                TrainedModel::TfIdf(model)
            }
        }
    }

    /// Cosine similarity between the profile text and each job text, in job order
    pub fn similarities<M>(
        &self,
        model: &M,
        profile: &Profile,
        jobs: &[Job],
    ) -> Result<Vec<f64>, MatchError>
    where
        M: SimilarityModel + ?Sized,
    {
        let profile_embedding = model.embed(&preprocess(&profile_text(profile)))?;

        jobs.iter()
            .map(|job| {
                let job_embedding = model.embed(&preprocess(&job_text(job)))?;
                Ok(cosine_similarity(&profile_embedding, &job_embedding))
            })
            .collect()
    }

    /// Ranked recommendations for a profile
    ///
    /// Returns an empty list when there are no jobs or none clears the
    /// minimum score.
    pub fn recommend<M>(
        &self,
        model: &M,
        profile: &Profile,
        jobs: &[Job],
    ) -> Result<Vec<Recommendation>, MatchError>
    where
        M: SimilarityModel + ?Sized,
    {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let similarities = self.similarities(model, profile, jobs)?;

        let scored = jobs
            .iter()
            .zip(similarities)
            .map(|(job, base)| {
                let score = blend_score(base, profile, job, &self.bonuses);
                Recommendation::from_job(job, score)
            })
            .collect();

        Ok(self.rank(scored))
    }

    /// Sort descending (stable), drop entries under the threshold, keep top N
    pub fn rank(&self, mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        recommendations.retain(|r| r.score >= self.ranking.min_match_score);
        recommendations.truncate(self.ranking.top_n);
        recommendations
    }
}
