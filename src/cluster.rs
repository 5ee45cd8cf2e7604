//! Spectral clustering pipeline
//!
//! Drives the full data flow: pairwise similarity, degree/Laplacian,
//! spectral embedding, k-means, canonical centroid ordering, and per-cluster
//! RGB color derivation. Any stage failure short-circuits the pipeline, so a
//! partially clustered result is never produced.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::fiber::{FiberCollection, ScalarProfile};
use crate::kmeans::{self, KMeansResult};
use crate::pairwise;
use crate::spectral::SpectralEmbedding;
use crate::{ClusterError, Result};

/// Configuration for the spectral clustering pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralClusterConfig {
    /// Number of output clusters (>= 1)
    pub k_clusters: usize,

    /// Embedding dimensionality: number of retained eigenvectors (>= 2)
    pub num_eigenvectors: usize,

    /// Gaussian kernel width; larger values flatten the similarity falloff
    pub sigma: f64,

    /// Worker threads for pairwise row computation (>= 1)
    pub num_jobs: usize,

    /// Iteration budget for k-means refinement
    pub kmeans_max_iterations: usize,

    /// Seed for k-means centroid initialization
    pub seed: u64,
}

impl Default for SpectralClusterConfig {
    fn default() -> Self {
        Self {
            k_clusters: 3,
            num_eigenvectors: 20,
            sigma: 60.0,
            num_jobs: 2,
            kmeans_max_iterations: 100,
            seed: 0,
        }
    }
}

impl SpectralClusterConfig {
    /// Create a new config builder
    pub fn builder() -> SpectralClusterConfigBuilder {
        SpectralClusterConfigBuilder::new()
    }

    /// Validate configuration before any computation is performed.
    pub fn validate(&self) -> Result<()> {
        if self.k_clusters == 0 {
            return Err(ClusterError::InvalidConfig(
                "k_clusters must be at least 1".into(),
            ));
        }
        if self.num_eigenvectors < 2 {
            return Err(ClusterError::InvalidConfig(
                "num_eigenvectors must be at least 2; a single eigenvector carries no \
                 discriminative information for k-means"
                    .into(),
            ));
        }
        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(ClusterError::InvalidConfig(
                "sigma must be a positive finite value".into(),
            ));
        }
        if self.num_jobs == 0 {
            return Err(ClusterError::InvalidConfig(
                "num_jobs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SpectralClusterConfig`]
#[derive(Debug, Default)]
pub struct SpectralClusterConfigBuilder {
    config: SpectralClusterConfig,
}

impl SpectralClusterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: SpectralClusterConfig::default(),
        }
    }

    /// Set the number of output clusters
    pub fn k_clusters(mut self, k: usize) -> Self {
        self.config.k_clusters = k;
        self
    }

    /// Set the embedding dimensionality
    pub fn num_eigenvectors(mut self, k: usize) -> Self {
        self.config.num_eigenvectors = k;
        self
    }

    /// Set the kernel width
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.config.sigma = sigma;
        self
    }

    /// Set the row-computation parallelism degree
    pub fn num_jobs(mut self, jobs: usize) -> Self {
        self.config.num_jobs = jobs;
        self
    }

    /// Set the k-means iteration budget
    pub fn kmeans_max_iterations(mut self, iterations: usize) -> Self {
        self.config.kmeans_max_iterations = iterations;
        self
    }

    /// Set the k-means initialization seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SpectralClusterConfig {
        self.config
    }
}

/// Per-fiber annotation handed back to the geometry collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiberAnnotation {
    /// Canonical cluster id in [0, k_clusters)
    pub cluster: usize,
    /// Cluster color as RGB bytes
    pub color: [u8; 3],
}

/// Output of one clustering invocation
#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// Canonical cluster id per fiber
    pub labels: Vec<usize>,
    /// k×K centroids in embedding space, ordered by ascending first coordinate
    pub centroids: Array2<f64>,
    /// k×3 RGB color table indexed by canonical cluster id
    pub colors: Vec<[u8; 3]>,
    /// The N×K spectral embedding the clusters were found in
    pub embedding: Array2<f64>,
}

impl ClusterResult {
    /// Number of clusters
    pub fn k_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    /// Fiber indices belonging to cluster `c`
    pub fn cluster_members(&self, c: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == c)
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-fiber (cluster id, color) records for attachment onto the
    /// caller's geometry structure.
    pub fn annotations(&self) -> Vec<FiberAnnotation> {
        self.labels
            .iter()
            .map(|&label| FiberAnnotation {
                cluster: label,
                color: self.colors[label],
            })
            .collect()
    }
}

/// Whole-brain fiber clustering via the normalized random-walk Laplacian
#[derive(Debug, Clone)]
pub struct SpectralClusterer {
    config: SpectralClusterConfig,
}

impl SpectralClusterer {
    /// Create a clusterer, rejecting invalid configuration up front.
    pub fn new(config: SpectralClusterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &SpectralClusterConfig {
        &self.config
    }

    /// Cluster a fiber collection by pairwise geometric similarity.
    pub fn cluster(&self, collection: &FiberCollection) -> Result<ClusterResult> {
        if collection.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        self.check_population(collection.len())?;

        tracing::info!(
            fibers = collection.len(),
            clusters = self.config.k_clusters,
            "starting spectral clustering"
        );

        let similarity =
            pairwise::similarity_matrix(collection, self.config.sigma, self.config.num_jobs)?;
        self.run_spectral(similarity)
    }

    /// Cluster by quantitative scalar similarity instead of geometry.
    ///
    /// The profile must be aligned index-for-index with `collection`.
    pub fn cluster_scalar(
        &self,
        collection: &FiberCollection,
        profile: &ScalarProfile,
    ) -> Result<ClusterResult> {
        if collection.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        if profile.len() != collection.len() {
            return Err(ClusterError::InvalidData(format!(
                "scalar profile covers {} fibers, collection has {}",
                profile.len(),
                collection.len()
            )));
        }
        self.check_population(collection.len())?;

        tracing::info!(
            fibers = collection.len(),
            clusters = self.config.k_clusters,
            scalar_type = profile.scalar_type(),
            "starting quantitative spectral clustering"
        );

        let similarity =
            pairwise::scalar_similarity_matrix(profile, self.config.sigma, self.config.num_jobs)?;
        self.run_spectral(similarity)
    }

    /// Run the spectral stages on a precomputed similarity matrix.
    ///
    /// Exposed so a fixed similarity matrix can be re-clustered without
    /// repeating the O(N^2) distance computation.
    pub fn cluster_similarity(&self, similarity: Array2<f64>) -> Result<ClusterResult> {
        self.check_population(similarity.nrows())?;
        self.run_spectral(similarity)
    }

    /// Spectral embedding, k-means, ordering, and colors.
    ///
    /// Callers have already checked the population limits.
    fn run_spectral(&self, similarity: Array2<f64>) -> Result<ClusterResult> {
        let spectral = SpectralEmbedding::decompose(&similarity)?;
        let embedding = spectral.embedding(self.config.num_eigenvectors)?;
        tracing::debug!(
            dimensions = self.config.num_eigenvectors,
            "spectral embedding computed"
        );

        let solution = kmeans::kmeans(
            &embedding,
            self.config.k_clusters,
            self.config.kmeans_max_iterations,
            self.config.seed,
        )?;
        tracing::debug!(iterations = solution.iterations, "k-means converged");

        let (centroids, labels) = order_by_first_coordinate(solution);

        // With a 2-dimensional embedding the centroids carry too little
        // color information, so colors come from the embedding rows instead
        let colors = if self.config.num_eigenvectors == 2 {
            cluster_colors(&embedding)
        } else {
            cluster_colors(&centroids)
        };
        let color_table: Vec<[u8; 3]> = (0..centroids.nrows()).map(|c| colors[c]).collect();

        Ok(ClusterResult {
            labels,
            centroids,
            colors: color_table,
            embedding,
        })
    }

    /// Constraints that depend on the fiber population size.
    fn check_population(&self, n: usize) -> Result<()> {
        if self.config.k_clusters > n {
            return Err(ClusterError::InvalidConfig(format!(
                "cannot form {} clusters from {} fibers",
                self.config.k_clusters, n
            )));
        }
        if self.config.num_eigenvectors > n {
            return Err(ClusterError::InvalidConfig(format!(
                "cannot retain {} eigenvectors from {} fibers",
                self.config.num_eigenvectors, n
            )));
        }
        Ok(())
    }
}

/// Reorder centroids by ascending first coordinate and remap labels to the
/// canonical order.
///
/// Cluster ids out of k-means depend on initialization; after this step they
/// are determined by embedding geometry alone, so colors are comparable
/// across runs on the same data.
fn order_by_first_coordinate(solution: KMeansResult) -> (Array2<f64>, Vec<usize>) {
    let k = solution.centroids.nrows();

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        solution.centroids[[a, 0]]
            .partial_cmp(&solution.centroids[[b, 0]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // old id -> canonical id
    let mut remap = vec![0usize; k];
    for (canonical, &old) in order.iter().enumerate() {
        remap[old] = canonical;
    }

    let centroids = solution.centroids.select(Axis(0), &order);
    let labels = solution.labels.into_iter().map(|l| remap[l]).collect();

    (centroids, labels)
}

/// Derive one RGB color per row of `data` from its first three components.
///
/// Rows are L2-normalized and mapped from [-1, 1] to [0, 255] via
/// `127.5 + v * 127.5`, so colors vary smoothly with embedding geometry.
/// Rows with fewer than three components are zero-padded; all-zero rows map
/// to mid-gray.
fn cluster_colors(data: &Array2<f64>) -> Vec<[u8; 3]> {
    data.rows()
        .into_iter()
        .map(|row| {
            let mut direction = [0.0f64; 3];
            for (d, value) in direction.iter_mut().zip(row.iter()) {
                *d = *value;
            }

            let norm = direction.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for d in direction.iter_mut() {
                    *d /= norm;
                }
            }

            let mut rgb = [0u8; 3];
            for (byte, d) in rgb.iter_mut().zip(direction.iter()) {
                *byte = (127.5 + d * 127.5).round() as u8;
            }
            rgb
        })
        .collect()
}
