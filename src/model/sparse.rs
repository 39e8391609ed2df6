use super::error::ModelError;

/// Sparse feature vector with a fixed dimension.
///
/// Indices are strictly increasing; `values[i]` belongs to `indices[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Creates an all-zero vector.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a vector from `(index, value)` pairs in any order.
    ///
    /// Repeated indices are summed.
    pub fn from_pairs<I>(dim: usize, pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        let mut pairs: Vec<(usize, f32)> = pairs.into_iter().collect();
        if let Some(&(index, _)) = pairs.iter().find(|(i, _)| *i >= dim) {
            return Err(ModelError::IndexOutOfBounds { index, dim });
        }
        pairs.sort_by_key(|(i, _)| *i);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match indices.last() {
                Some(&last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Number of stored entries whose value is non-zero.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Dot product with a dense row of the same dimension.
    pub fn dot(&self, dense: &[f32]) -> Result<f32, ModelError> {
        if dense.len() != self.dim {
            return Err(ModelError::DimensionMismatch {
                expected: dense.len(),
                actual: self.dim,
            });
        }
        Ok(self.iter().map(|(i, v)| dense[i] * v).sum())
    }

    pub fn l1_norm(&self) -> f32 {
        self.values.iter().map(|v| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    pub(crate) fn scale_values<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, f32) -> f32,
    {
        for (index, value) in self.indices.iter().zip(self.values.iter_mut()) {
            *value = f(*index, *value);
        }
    }

    pub(crate) fn normalize_by(&mut self, norm: f32) {
        if norm > 0.0 {
            self.scale_values(|_, v| v / norm);
        }
    }
}
