//! Graph Laplacian construction and spectral embedding
//!
//! From a similarity matrix W this module builds the degree matrix
//! D = diag(row sums of W), the unnormalized Laplacian L = D - W, and the
//! random-walk normalized Laplacian Lrw = D^{-1} L, whose rows sum to zero.
//!
//! Lrw itself is not symmetric, so instead of a general eigensolver the
//! decomposition goes through the symmetric normalized Laplacian
//! Lsym = D^{-1/2} L D^{-1/2}: if Lsym v = lambda v, then u = D^{-1/2} v is
//! an eigenvector of Lrw for the same eigenvalue, and all eigenpairs are
//! real. Eigenpairs are sorted by ascending eigenvalue, so the first K
//! columns of the embedding are the smoothest eigenvectors of the graph.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{s, Array1, Array2, Axis};
use std::cmp::Ordering;

use crate::{ClusterError, Result};

/// Diagonal of the degree matrix: per-fiber total similarity.
///
/// Every entry must be strictly positive; a zero degree would make the
/// random-walk normalization divide by zero, so it is surfaced as
/// [`ClusterError::DegenerateDegree`] instead of silently producing NaNs.
pub fn degree_vector(similarity: &Array2<f64>) -> Result<Array1<f64>> {
    if !similarity.is_square() {
        return Err(ClusterError::InvalidData(format!(
            "similarity matrix must be square, got {:?}",
            similarity.dim()
        )));
    }
    let degrees = similarity.sum_axis(Axis(0));
    for (index, &degree) in degrees.iter().enumerate() {
        if !(degree > 0.0) {
            return Err(ClusterError::DegenerateDegree { index });
        }
    }
    Ok(degrees)
}

/// Unnormalized graph Laplacian L = D - W.
pub fn unnormalized_laplacian(similarity: &Array2<f64>) -> Result<Array2<f64>> {
    let degrees = degree_vector(similarity)?;
    let n = similarity.nrows();
    let mut laplacian = -similarity.clone();
    for i in 0..n {
        laplacian[[i, i]] += degrees[i];
    }
    Ok(laplacian)
}

/// Random-walk normalized Laplacian Lrw = D^{-1} (D - W).
///
/// Each row sums to zero up to floating-point error.
pub fn random_walk_laplacian(similarity: &Array2<f64>) -> Result<Array2<f64>> {
    let degrees = degree_vector(similarity)?;
    let mut laplacian = unnormalized_laplacian(similarity)?;
    for (i, mut row) in laplacian.rows_mut().into_iter().enumerate() {
        row /= degrees[i];
    }
    Ok(laplacian)
}

/// Eigendecomposition of the random-walk Laplacian, eigenvalues ascending
#[derive(Debug, Clone)]
pub struct SpectralEmbedding {
    /// All N eigenvalues, sorted ascending
    pub eigenvalues: Array1<f64>,
    /// Corresponding unit-norm eigenvectors of Lrw as columns, N×N
    pub eigenvectors: Array2<f64>,
}

impl SpectralEmbedding {
    /// Decompose the random-walk Laplacian of `similarity`.
    pub fn decompose(similarity: &Array2<f64>) -> Result<Self> {
        let degrees = degree_vector(similarity)?;
        let n = similarity.nrows();

        let inv_sqrt: Vec<f64> = degrees.iter().map(|d| 1.0 / d.sqrt()).collect();

        // Lsym entry-wise; symmetric whenever W is
        let lsym = DMatrix::from_fn(n, n, |i, j| {
            let l = if i == j {
                degrees[i] - similarity[[i, j]]
            } else {
                -similarity[[i, j]]
            };
            inv_sqrt[i] * l * inv_sqrt[j]
        });

        let eigen = SymmetricEigen::new(lsym);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[a]
                .partial_cmp(&eigen.eigenvalues[b])
                .unwrap_or(Ordering::Equal)
        });

        let mut eigenvalues = Array1::zeros(n);
        let mut eigenvectors = Array2::zeros((n, n));
        for (col, &src) in order.iter().enumerate() {
            eigenvalues[col] = eigen.eigenvalues[src];

            // Map back to an Lrw eigenvector and renormalize
            let mut vector: Vec<f64> = (0..n)
                .map(|i| inv_sqrt[i] * eigen.eigenvectors[(i, src)])
                .collect();
            let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in vector.iter_mut() {
                    *v /= norm;
                }
            }

            // Sign convention: largest-magnitude component positive, so the
            // embedding does not depend on solver sign choices
            let dominant = vector
                .iter()
                .cloned()
                .fold(0.0f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
            if dominant < 0.0 {
                for v in vector.iter_mut() {
                    *v = -*v;
                }
            }

            for (i, &v) in vector.iter().enumerate() {
                eigenvectors[[i, col]] = v;
            }
        }

        Ok(Self {
            eigenvalues,
            eigenvectors,
        })
    }

    /// The N×K embedding: first K eigenvectors as columns.
    ///
    /// Fails when more eigenvectors are requested than the decomposition
    /// holds.
    pub fn embedding(&self, k: usize) -> Result<Array2<f64>> {
        let n = self.eigenvectors.ncols();
        if k > n {
            return Err(ClusterError::InvalidConfig(format!(
                "cannot retain {} eigenvectors from a {}-fiber decomposition",
                k, n
            )));
        }
        Ok(self.eigenvectors.slice(s![.., ..k]).to_owned())
    }
}
