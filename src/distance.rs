//! Pairwise fiber distance and kernel similarity measures
//!
//! Distance between two fibers is the mean (over the P points) squared
//! Euclidean distance under purely positional correspondence: point i of one
//! fiber against point i of the other. A fiber is an undirected curve, so the
//! public [`fiber_distance`] evaluates the positional distance for the query
//! fiber as stored and for its point-reversed variant and keeps the
//! element-wise minimum. That min-over-orientations step is what makes the
//! distance symmetric under independent reversal of either operand; do not
//! bypass it.

use ndarray::{Array1, Array2, Axis, Zip};

use crate::fiber::{Fiber, FiberCollection, ScalarProfile};

/// Positional mean-squared distance from one fiber to every fiber in the
/// collection, with no orientation handling.
fn pointwise_distance(fiber: &Fiber, collection: &FiberCollection) -> Array1<f64> {
    let p = collection.points_per_fiber() as f64;

    // Broadcast the query fiber across all N rows, one axis at a time
    let dx = collection.xs() - &fiber.x;
    let dy = collection.ys() - &fiber.y;
    let dz = collection.zs() - &fiber.z;

    let squared = &dx * &dx + &dy * &dy + &dz * &dz;

    squared.sum_axis(Axis(1)) / p
}

/// Orientation-invariant distance from `fiber` to every fiber in
/// `collection`.
///
/// Returns `distance[j]` = min over both traversal directions of the mean
/// squared Euclidean distance between corresponding points of `fiber` and
/// fiber j. An empty collection yields an empty result; NaN/Inf coordinates
/// propagate.
pub fn fiber_distance(fiber: &Fiber, collection: &FiberCollection) -> Array1<f64> {
    if collection.is_empty() {
        return Array1::zeros(0);
    }

    let forward = pointwise_distance(fiber, collection);
    let backward = pointwise_distance(&fiber.reversed(), collection);

    // Minimum distance is the one a cluster assignment would use
    Zip::from(&forward)
        .and(&backward)
        .map_collect(|&f, &b| f.min(b))
}

/// Mean-squared distance between one fiber's scalar profile and every profile
/// in the set.
///
/// Same positional contract as [`fiber_distance`] over 1-D per-point values;
/// no reversal handling, since profiles are pre-aligned upstream.
pub fn scalar_distance(scalar: &Array1<f64>, profiles: &ScalarProfile) -> Array1<f64> {
    if profiles.is_empty() {
        return Array1::zeros(0);
    }

    let p = scalar.len() as f64;
    let dq = profiles.values() - scalar;
    let squared = &dq * &dq;

    squared.sum_axis(Axis(1)) / p
}

/// Gaussian kernel similarity for a single distance value.
///
/// `exp(-d / (2 sigma^2))`: monotonically decreasing in distance, 1 at zero
/// distance, approaching 0 for large distances. Larger sigma flattens the
/// kernel so more fibers appear similar. No clamping is applied.
pub fn gaussian_similarity(distance: f64, sigma: f64) -> f64 {
    (-distance / (2.0 * sigma * sigma)).exp()
}

/// Element-wise Gaussian kernel over a whole distance matrix.
pub fn gaussian_similarity_matrix(distances: &Array2<f64>, sigma: f64) -> Array2<f64> {
    distances.mapv(|d| gaussian_similarity(d, sigma))
}
