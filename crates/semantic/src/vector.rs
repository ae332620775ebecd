//! Unit-normalization, cosine similarity, and centroid computation shared
//! by the domain classifier and the intent matcher (spec §4.3, §4.4).

pub fn unit_normalize(vector: &[f32]) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}

/// Dot product of two already-unit-normalized vectors, clamped to `[0, 1]`
/// per spec §4.3 step 3 ("negative similarities clamp to 0").
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot.max(0.0)
}

/// Mean of unit-normalized vectors, renormalized.
pub fn centroid(vectors: &[Vec<f32>]) -> Vec<f32> {
    assert!(!vectors.is_empty(), "centroid of an empty example set is undefined");
    let dim = vectors[0].len();
    let mut sum = vec![0.0f32; dim];
    for v in vectors {
        let normalized = unit_normalize(v);
        for (s, x) in sum.iter_mut().zip(normalized.iter()) {
            *s += x;
        }
    }
    for s in &mut sum {
        *s /= vectors.len() as f32;
    }
    unit_normalize(&sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_normalize_produces_a_length_one_vector() {
        let v = unit_normalize(&[3.0, 4.0]);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_of_identical_vectors_is_one() {
        let v = unit_normalize(&[1.0, 2.0, 3.0]);
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_clamps_negative_to_zero() {
        let a = unit_normalize(&[1.0, 0.0]);
        let b = unit_normalize(&[-1.0, 0.0]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn centroid_of_identical_vectors_equals_that_vector() {
        let v = unit_normalize(&[1.0, 1.0, 0.0]);
        let c = centroid(&[v.clone(), v.clone(), v.clone()]);
        for (x, y) in c.iter().zip(v.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }
}
