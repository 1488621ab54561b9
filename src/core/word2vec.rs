//! Skip-gram word vectors trained with negative sampling.
//!
//! Training is seeded and single-threaded, so a given corpus and
//! configuration always produce the same vectors.

use crate::core::error::MatchError;
use crate::core::similarity::{mean_vector, SimilarityModel};
use std::collections::HashMap;

/// Hyperparameters for skip-gram training
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub dimensions: usize,
    pub window: usize,
    pub min_count: usize,
    pub negative: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    pub min_learning_rate: f32,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dimensions: 300,
            window: 5,
            min_count: 2,
            negative: 5,
            epochs: 5,
            learning_rate: 0.025,
            min_learning_rate: 0.0001,
            seed: 1,
        }
    }
}

/// Trained word vectors
#[derive(Debug, Clone)]
pub struct WordVectors {
    dimensions: usize,
    vocab: HashMap<String, usize>,
    vectors: Vec<f32>,
    trained: bool,
}

impl WordVectors {
    /// A model that has never been trained
    ///
    /// Every embedding request on it fails with [`MatchError::ModelNotTrained`].
    pub fn untrained(dimensions: usize) -> Self {
        Self {
            dimensions,
            vocab: HashMap::new(),
            vectors: Vec::new(),
            trained: false,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Number of words in the vocabulary
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains_key(word)
    }

    /// Vector of a single word, if it is in the vocabulary
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vocab.get(word).map(|&idx| self.row(idx))
    }

    #[inline]
    fn row(&self, idx: usize) -> &[f32] {
        &self.vectors[idx * self.dimensions..(idx + 1) * self.dimensions]
    }
}

impl SimilarityModel for WordVectors {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, tokens: &[String]) -> Result<Vec<f32>, MatchError> {
        if !self.trained {
            return Err(MatchError::ModelNotTrained);
        }
        let known = tokens.iter().filter_map(|t| self.get(t));
        Ok(mean_vector(known, self.dimensions))
    }
}

/// Skip-gram trainer
#[derive(Debug, Clone, Default)]
pub struct Word2Vec {
    config: TrainingConfig,
}

impl Word2Vec {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train word vectors over a tokenized corpus
    ///
    /// Words seen fewer than `min_count` times are left out of the vocabulary.
    /// An empty vocabulary yields a trained model that embeds every document
    /// as the zero vector.
    pub fn train(&self, corpus: &[Vec<String>]) -> WordVectors {
        let dim = self.config.dimensions;
        let (vocab, counts) = build_vocab(corpus, self.config.min_count);

        let mut model = WordVectors {
            dimensions: dim,
            vocab,
            vectors: Vec::new(),
            trained: true,
        };
        if model.vocab.is_empty() || dim == 0 {
            return model;
        }

        let sentences: Vec<Vec<usize>> = corpus
            .iter()
            .map(|s| s.iter().filter_map(|w| model.vocab.get(w).copied()).collect())
            .collect();

        let mut rng = XorShift64::new(self.config.seed);
        let vocab_size = counts.len();

        // Input vectors start small and random, output vectors at zero
        let mut syn0: Vec<f32> = (0..vocab_size * dim)
            .map(|_| (rng.uniform() - 0.5) / dim as f32)
            .collect();
        let mut syn1neg = vec![0.0f32; vocab_size * dim];
        let noise = NoiseDistribution::new(&counts);

        let words_per_epoch: usize = sentences.iter().map(Vec::len).sum();
        let total_words = (words_per_epoch * self.config.epochs).max(1) as f32;
        let mut processed = 0usize;
        let mut grad = vec![0.0f32; dim];

        for _ in 0..self.config.epochs {
            for sentence in &sentences {
                let alpha = (self.config.learning_rate
                    * (1.0 - processed as f32 / total_words))
                    .max(self.config.min_learning_rate);

                for (pos, &target) in sentence.iter().enumerate() {
                    let reduced = self.config.window - rng.below(self.config.window.max(1));
                    let start = pos.saturating_sub(reduced);
                    let end = (pos + reduced + 1).min(sentence.len());

                    for (ctx_pos, &context) in sentence.iter().enumerate().take(end).skip(start) {
                        if ctx_pos == pos {
                            continue;
                        }
                        train_pair(
                            &mut syn0,
                            &mut syn1neg,
                            &mut grad,
                            context,
                            target,
                            dim,
                            alpha,
                            self.config.negative,
                            &noise,
                            &mut rng,
                        );
                    }
                }
                processed += sentence.len();
            }
        }

        model.vectors = syn0;
        model
    }
}

/// One skip-gram update: `context` predicts `target` against sampled negatives
#[allow(clippy::too_many_arguments)]
fn train_pair(
    syn0: &mut [f32],
    syn1neg: &mut [f32],
    grad: &mut [f32],
    context: usize,
    target: usize,
    dim: usize,
    alpha: f32,
    negative: usize,
    noise: &NoiseDistribution,
    rng: &mut XorShift64,
) {
    let input = context * dim..(context + 1) * dim;
    grad.iter_mut().for_each(|g| *g = 0.0);

    for d in 0..=negative {
        let (word, label) = if d == 0 {
            (target, 1.0)
        } else {
            let sampled = noise.sample(rng);
            if sampled == target {
                continue;
            }
            (sampled, 0.0)
        };

        let output = word * dim..(word + 1) * dim;
        let dot: f32 = syn0[input.clone()]
            .iter()
            .zip(&syn1neg[output.clone()])
            .map(|(a, b)| a * b)
            .sum();
        let g = (label - sigmoid(dot)) * alpha;

        for ((gr, out), inp) in grad
            .iter_mut()
            .zip(syn1neg[output].iter_mut())
            .zip(&syn0[input.clone()])
        {
            *gr += g * *out;
            *out += g * inp;
        }
    }

    for (inp, gr) in syn0[input].iter_mut().zip(grad.iter()) {
        *inp += gr;
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-6.0, 6.0)).exp())
}

/// Vocabulary indices ordered by descending frequency, then lexically
fn build_vocab(corpus: &[Vec<String>], min_count: usize) -> (HashMap<String, usize>, Vec<usize>) {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in corpus.iter().flatten() {
        *freq.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut kept: Vec<(&str, usize)> = freq
        .into_iter()
        .filter(|&(_, count)| count >= min_count.max(1))
        .collect();
    kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let vocab = kept
        .iter()
        .enumerate()
        .map(|(idx, (word, _))| (word.to_string(), idx))
        .collect();
    let counts = kept.into_iter().map(|(_, count)| count).collect();

    (vocab, counts)
}

/// Unigram distribution raised to the 3/4 power, sampled by binary search
struct NoiseDistribution {
    cumulative: Vec<f64>,
}

impl NoiseDistribution {
    fn new(counts: &[usize]) -> Self {
        let mut total = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                total += (c as f64).powf(0.75);
                total
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut XorShift64) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.uniform() as f64 * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len().saturating_sub(1))
    }
}

/// xorshift64 generator
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        let state = seed ^ 0x2545_F491_4F6C_DD1D;
        Self {
            state: if state == 0 { 0x9E37_79B9_7F4A_7C15 } else { state },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1)
    fn uniform(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform in [0, n)
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::similarity::cosine_similarity;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            dimensions: 16,
            min_count: 1,
            epochs: 20,
            ..Default::default()
        }
    }

    fn sample_corpus() -> Vec<Vec<String>> {
        vec![
            tokens("python developer django sql backend"),
            tokens("python django rest api backend"),
            tokens("nurse hospital care patients night"),
            tokens("nurse care hospital shifts patients"),
            tokens("python sql data pipelines backend"),
        ]
    }

    #[test]
    fn test_vocabulary_respects_min_count() {
        let trainer = Word2Vec::new(TrainingConfig {
            dimensions: 8,
            min_count: 2,
            ..Default::default()
        });
        let model = trainer.train(&sample_corpus());

        assert!(model.contains("python"));
        assert!(model.contains("nurse"));
        assert!(!model.contains("night"));
        assert_eq!(model.get("python").map(<[f32]>::len), Some(8));
    }

    #[test]
    fn test_training_is_deterministic_for_a_seed() {
        let trainer = Word2Vec::new(small_config());
        let a = trainer.train(&sample_corpus());
        let b = trainer.train(&sample_corpus());
        assert_eq!(a.get("python"), b.get("python"));
        assert_eq!(a.get("hospital"), b.get("hospital"));
    }

    #[test]
    fn test_unknown_tokens_embed_to_zero() {
        let model = Word2Vec::new(small_config()).train(&sample_corpus());
        let embedding = model.embed(&tokens("quantum blockchain")).unwrap();
        assert_eq!(embedding.len(), 16);
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_empty_corpus_yields_trained_empty_model() {
        let model = Word2Vec::new(small_config()).train(&[]);
        assert!(model.is_trained());
        assert!(model.is_empty());
        assert_eq!(model.embed(&tokens("python")).unwrap(), vec![0.0; 16]);
    }

    #[test]
    fn test_untrained_model_rejects_embedding() {
        let model = WordVectors::untrained(16);
        assert_eq!(model.embed(&tokens("python")), Err(MatchError::ModelNotTrained));
    }

    #[test]
    fn test_same_document_is_maximally_similar() {
        let model = Word2Vec::new(small_config()).train(&sample_corpus());
        let doc = tokens("python django backend");
        let a = model.embed(&doc).unwrap();
        let b = model.embed(&doc).unwrap();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_distribution_stays_in_range() {
        let noise = NoiseDistribution::new(&[10, 3, 1]);
        let mut rng = XorShift64::new(7);
        for _ in 0..1000 {
            assert!(noise.sample(&mut rng) < 3);
        }
    }
}
