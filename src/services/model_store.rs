use crate::core::{build_corpus, Recommender, TrainedModel};
use crate::models::{Job, Profile};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// Cache of trained models keyed by batch fingerprint
///
/// Training is CPU-bound and runs on the blocking pool. Any change to the
/// profile or job texts changes the fingerprint, so stale models are never
/// served for a new batch.
#[derive(Clone)]
pub struct ModelStore {
    models: moka::future::Cache<u64, Arc<TrainedModel>>,
}

impl ModelStore {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let models = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { models }
    }

    /// Cached model for a batch, if one was trained
    pub async fn get(&self, fingerprint: u64) -> Option<Arc<TrainedModel>> {
        self.models.get(&fingerprint).await
    }

    /// Return the model for this batch, training it on a miss
    pub async fn get_or_train(
        &self,
        recommender: &Recommender,
        profiles: &[Profile],
        jobs: &[Job],
    ) -> Arc<TrainedModel> {
        let key = fingerprint(recommender, profiles, jobs);

        if let Some(model) = self.models.get(&key).await {
            tracing::debug!("Model cache hit: {:x}", key);
            return model;
        }

        tracing::debug!("Model cache miss: {:x}", key);
        let model = Arc::new(train_blocking(recommender, profiles, jobs).await);
        self.models.insert(key, Arc::clone(&model)).await;
        model
    }

    pub fn invalidate_all(&self) {
        self.models.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.models.entry_count()
    }
}

/// Train on the blocking pool so request workers stay responsive
pub async fn train_blocking(
    recommender: &Recommender,
    profiles: &[Profile],
    jobs: &[Job],
) -> TrainedModel {
    let trainer = recommender.clone();
    let profiles = profiles.to_vec();
    let jobs = jobs.to_vec();

    match tokio::task::spawn_blocking(move || trainer.train(&profiles, &jobs)).await {
        Ok(model) => model,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// Hash of the batch corpus and every setting that affects training
pub fn fingerprint(recommender: &Recommender, profiles: &[Profile], jobs: &[Job]) -> u64 {
    let mut hasher = DefaultHasher::new();

    format!("{:?}", recommender.kind()).hash(&mut hasher);
    let config = recommender.training_config();
    (config.dimensions, config.window, config.min_count).hash(&mut hasher);
    (config.negative, config.epochs, config.seed).hash(&mut hasher);
    config.learning_rate.to_bits().hash(&mut hasher);

    build_corpus(profiles, jobs).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ModelKind, RankingConfig, TrainingConfig};
    use crate::models::BonusWeights;

    fn small_recommender() -> Recommender {
        Recommender::new(
            ModelKind::Word2vec,
            TrainingConfig {
                dimensions: 8,
                min_count: 1,
                ..Default::default()
            },
            BonusWeights::default(),
            RankingConfig::default(),
        )
    }

    fn jobs(title: &str) -> Vec<Job> {
        vec![Job {
            id: "j1".to_string(),
            title: title.to_string(),
            ..Default::default()
        }]
    }

    #[test]
    fn test_fingerprint_changes_with_jobs() {
        let recommender = small_recommender();
        let a = fingerprint(&recommender, &[], &jobs("rust engineer"));
        let b = fingerprint(&recommender, &[], &jobs("rust engineer"));
        let c = fingerprint(&recommender, &[], &jobs("java engineer"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_get_or_train_caches_by_batch() {
        let store = ModelStore::new(4, 60);
        let recommender = small_recommender();
        let batch = jobs("rust engineer");

        assert!(store.get(fingerprint(&recommender, &[], &batch)).await.is_none());

        let first = store.get_or_train(&recommender, &[], &batch).await;
        let second = store.get_or_train(&recommender, &[], &batch).await;
        assert!(Arc::ptr_eq(&first, &second));

        let other = store.get_or_train(&recommender, &[], &jobs("java engineer")).await;
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
