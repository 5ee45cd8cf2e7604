//! Pairwise N×N distance and similarity matrix assembly
//!
//! Row i of the distance matrix is the orientation-invariant distance from
//! fiber i to every fiber in the collection, including itself. Rows are
//! independent, so they are computed in parallel on a dedicated rayon pool
//! and written into their pre-known slot by fiber index; completion order is
//! irrelevant. Distances are then min-max normalized to [0, 1] with the min
//! and max taken over the whole matrix, which keeps the matrix exactly
//! symmetric, before the Gaussian kernel turns them into similarities.

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::distance::{fiber_distance, gaussian_similarity_matrix, scalar_distance};
use crate::fiber::{FiberCollection, ScalarProfile};
use crate::{ClusterError, Result};

/// Assemble the N×N fiber distance matrix, normalized to [0, 1].
///
/// `num_jobs` is the number of worker threads used for row computation.
/// Fails with [`ClusterError::EmptyInput`] when the collection holds no
/// fibers.
pub fn distance_matrix(collection: &FiberCollection, num_jobs: usize) -> Result<Array2<f64>> {
    let rows = compute_rows(collection.len(), num_jobs, |i| {
        fiber_distance(&collection.fiber(i), collection)
    })?;

    let mut distances = assemble(rows);
    min_max_normalize(&mut distances);
    Ok(distances)
}

/// Assemble the N×N similarity matrix: normalized distances pushed through
/// the Gaussian kernel with width `sigma`.
pub fn similarity_matrix(
    collection: &FiberCollection,
    sigma: f64,
    num_jobs: usize,
) -> Result<Array2<f64>> {
    let distances = distance_matrix(collection, num_jobs)?;
    Ok(gaussian_similarity_matrix(&distances, sigma))
}

/// Assemble the N×N distance matrix over quantitative scalar profiles.
///
/// Scalar distances are only rescaled when they leave the [0, 1] range
/// already expected by the kernel; pre-normalized profiles pass through
/// untouched.
pub fn scalar_distance_matrix(profiles: &ScalarProfile, num_jobs: usize) -> Result<Array2<f64>> {
    let rows = compute_rows(profiles.len(), num_jobs, |i| {
        scalar_distance(&profiles.profile(i), profiles)
    })?;

    let mut distances = assemble(rows);
    let max = distances.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > 1.0 {
        min_max_normalize(&mut distances);
    }
    Ok(distances)
}

/// Similarity matrix over quantitative scalar profiles.
pub fn scalar_similarity_matrix(
    profiles: &ScalarProfile,
    sigma: f64,
    num_jobs: usize,
) -> Result<Array2<f64>> {
    let distances = scalar_distance_matrix(profiles, num_jobs)?;
    Ok(gaussian_similarity_matrix(&distances, sigma))
}

/// Compute N independent row vectors on a pool of `num_jobs` threads.
fn compute_rows<F>(n: usize, num_jobs: usize, row: F) -> Result<Vec<Array1<f64>>>
where
    F: Fn(usize) -> Array1<f64> + Sync + Send,
{
    if n == 0 {
        return Err(ClusterError::EmptyInput);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_jobs)
        .build()
        .map_err(|e| ClusterError::InvalidConfig(format!("failed to build thread pool: {e}")))?;

    tracing::debug!(rows = n, threads = num_jobs, "computing pairwise rows");

    Ok(pool.install(|| (0..n).into_par_iter().map(row).collect()))
}

/// Merge per-fiber rows into the full matrix, row index = fiber id.
fn assemble(rows: Vec<Array1<f64>>) -> Array2<f64> {
    let n = rows.len();
    let mut matrix = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        matrix.row_mut(i).assign(&row);
    }
    matrix
}

/// Scale all entries into [0, 1] using the global minimum and maximum.
///
/// A constant matrix (max == min) is left unchanged rather than divided by
/// zero.
fn min_max_normalize(matrix: &mut Array2<f64>) {
    let min = matrix.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = matrix.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range > 0.0 {
        matrix.mapv_inplace(|v| (v - min) / range);
    }
}
