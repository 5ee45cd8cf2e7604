//! k-means clustering on the spectral embedding
//!
//! Centroids are seeded from k distinct sample points drawn with a seeded
//! generator, then refined by standard Lloyd iterations until assignments
//! stop changing or the iteration budget runs out. A cluster that loses all
//! members keeps its previous centroid rather than being respawned.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{ClusterError, Result};

/// Outcome of a k-means run
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// k×K centroid coordinates in embedding space
    pub centroids: Array2<f64>,
    /// Cluster id per observation, in [0, k)
    pub labels: Vec<usize>,
    /// Number of Lloyd iterations performed
    pub iterations: usize,
}

/// Run k-means on `data` (observations as rows).
pub fn kmeans(data: &Array2<f64>, k: usize, max_iterations: usize, seed: u64) -> Result<KMeansResult> {
    let (n, dim) = data.dim();
    if k == 0 {
        return Err(ClusterError::InvalidConfig(
            "k-means requires at least one cluster".into(),
        ));
    }
    if k > n {
        return Err(ClusterError::InvalidConfig(format!(
            "cannot form {} clusters from {} observations",
            k, n
        )));
    }

    // Seed centroids from k distinct observations
    let mut rng = StdRng::seed_from_u64(seed);
    let picks = rand::seq::index::sample(&mut rng, n, k);
    let mut centroids = Array2::zeros((k, dim));
    for (c, i) in picks.into_iter().enumerate() {
        centroids.row_mut(c).assign(&data.row(i));
    }

    let mut labels = vec![0usize; n];
    let mut iterations = 0;

    for iter in 0..max_iterations {
        iterations = iter + 1;
        let mut changed = false;

        // Assignment step
        for i in 0..n {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for c in 0..k {
                let dist: f64 = (0..dim)
                    .map(|d| {
                        let diff = data[[i, d]] - centroids[[c, d]];
                        diff * diff
                    })
                    .sum();
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }

        if iter > 0 && !changed {
            break;
        }

        // Update step; empty clusters keep their previous centroid
        let mut sums = Array2::<f64>::zeros((k, dim));
        let mut counts = vec![0usize; k];
        for (i, &c) in labels.iter().enumerate() {
            counts[c] += 1;
            for d in 0..dim {
                sums[[c, d]] += data[[i, d]];
            }
        }
        for c in 0..k {
            if counts[c] > 0 {
                for d in 0..dim {
                    centroids[[c, d]] = sums[[c, d]] / counts[c] as f64;
                }
            }
        }
    }

    Ok(KMeansResult {
        centroids,
        labels,
        iterations,
    })
}
