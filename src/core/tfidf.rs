//! TF-IDF document vectors over unigrams and adjacent bigrams.

use crate::core::error::MatchError;
use crate::core::similarity::SimilarityModel;
use std::collections::{HashMap, HashSet};

/// TF-IDF model fitted on a batch corpus
#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    /// term -> dimension index
    vocabulary: HashMap<String, usize>,
    /// smoothed IDF weight per dimension
    idf: Vec<f32>,
}

impl TfIdfModel {
    /// Fit vocabulary and IDF weights on tokenized documents
    pub fn fit(corpus: &[Vec<String>]) -> Self {
        let n = corpus.len() as f32;
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for tokens in corpus {
            let unique: HashSet<String> = terms(tokens).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms_sorted: Vec<(String, usize)> = doc_freq.into_iter().collect();
        terms_sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::with_capacity(terms_sorted.len());
        let mut idf = Vec::with_capacity(terms_sorted.len());
        for (idx, (term, df)) in terms_sorted.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

impl SimilarityModel for TfIdfModel {
    fn dimensions(&self) -> usize {
        self.idf.len()
    }

    fn embed(&self, tokens: &[String]) -> Result<Vec<f32>, MatchError> {
        let mut vector = vec![0.0f32; self.idf.len()];
        for term in terms(tokens) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                vector[idx] += self.idf[idx];
            }
        }
        normalize(&mut vector);
        Ok(vector)
    }
}

/// Unigrams followed by space-joined adjacent bigrams
fn terms(tokens: &[String]) -> impl Iterator<Item = String> + '_ {
    tokens
        .iter()
        .cloned()
        .chain(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])))
}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::similarity::cosine_similarity;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_fit_includes_bigrams() {
        let model = TfIdfModel::fit(&[tokens("rust backend engineer")]);
        // 3 unigrams + 2 bigrams
        assert_eq!(model.vocabulary_len(), 5);
        assert_eq!(model.dimensions(), 5);
    }

    #[test]
    fn test_embedding_is_unit_length() {
        let model = TfIdfModel::fit(&[tokens("rust backend"), tokens("java backend")]);
        let v = model.embed(&tokens("rust backend")).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_terms_rank_higher() {
        let corpus = vec![
            tokens("python django developer"),
            tokens("python flask developer"),
            tokens("hospital nurse night"),
        ];
        let model = TfIdfModel::fit(&corpus);
        let query = model.embed(&tokens("python developer")).unwrap();
        let close = model.embed(&corpus[0]).unwrap();
        let far = model.embed(&corpus[2]).unwrap();
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
        assert_eq!(cosine_similarity(&query, &far), 0.0);
    }
}
