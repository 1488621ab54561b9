use crate::core::error::MatchError;

/// A model that maps a tokenized document to a fixed-length vector
///
/// Implemented by the trained word vectors and the TF-IDF model. Tests
/// provide their own implementation to score deterministically.
pub trait SimilarityModel: Send + Sync {
    /// Length of every vector returned by [`SimilarityModel::embed`]
    fn dimensions(&self) -> usize;

    /// Document embedding for already preprocessed tokens
    fn embed(&self, tokens: &[String]) -> Result<Vec<f32>, MatchError>;
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Arithmetic mean of a set of vectors, or the zero vector when the set is empty
pub fn mean_vector<'a, I>(vectors: I, dimensions: usize) -> Vec<f32>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut sum = vec![0.0f32; dimensions];
    let mut count = 0usize;

    for vector in vectors {
        for (acc, &v) in sum.iter_mut().zip(vector) {
            *acc += v;
        }
        count += 1;
    }

    if count > 0 {
        let n = count as f32;
        sum.iter_mut().for_each(|x| *x /= n);
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.3, -1.2, 4.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vectors_is_zero() {
        let zero = [0.0f32; 4];
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &[1.0, 2.0, 3.0, 4.0]), 0.0);
    }

    #[test]
    fn test_mean_vector() {
        let a = [1.0f32, 2.0];
        let b = [3.0f32, 6.0];
        let mean = mean_vector([&a[..], &b[..]], 2);
        assert_eq!(mean, vec![2.0, 4.0]);
    }

    #[test]
    fn test_mean_vector_empty_is_zero() {
        let mean = mean_vector(std::iter::empty::<&[f32]>(), 3);
        assert_eq!(mean, vec![0.0, 0.0, 0.0]);
    }
}
