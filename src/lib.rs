//! Fiber Spectral Clustering Library
//!
//! This crate groups 3D curves ("fibers", white-matter tractography
//! streamlines resampled to a fixed number of points) into bundles of
//! geometrically similar curves using similarity-graph spectral clustering:
//!
//! - **Pairwise distance**: orientation-invariant mean-squared point distance
//!   between every pair of fibers
//! - **Gaussian kernel**: distance matrix to bounded similarity matrix
//! - **Spectral embedding**: random-walk normalized graph Laplacian and its
//!   smallest eigenvectors
//! - **Cluster assignment**: k-means on the embedding with canonical centroid
//!   ordering and deterministic per-cluster RGB colors
//!
//! # Example
//!
//! ```rust,no_run
//! use fiber_cluster::{FiberCollection, SpectralClusterConfig, SpectralClusterer};
//!
//! # fn main() -> fiber_cluster::Result<()> {
//! # let points: Vec<Vec<[f64; 3]>> = vec![];
//! let fibers = FiberCollection::from_points(&points)?;
//!
//! let config = SpectralClusterConfig::builder()
//!     .k_clusters(3)
//!     .num_eigenvectors(20)
//!     .sigma(60.0)
//!     .num_jobs(2)
//!     .build();
//!
//! let clusterer = SpectralClusterer::new(config)?;
//! let result = clusterer.cluster(&fibers)?;
//!
//! for annotation in result.annotations() {
//!     println!("cluster {} color {:?}", annotation.cluster, annotation.color);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cluster;
pub mod distance;
pub mod fiber;
pub mod kmeans;
pub mod pairwise;
pub mod spectral;

// Re-export main types for convenience
pub use cluster::{
    ClusterResult, FiberAnnotation, SpectralClusterConfig, SpectralClusterConfigBuilder,
    SpectralClusterer,
};
pub use fiber::{Fiber, FiberCollection, ScalarProfile};
pub use kmeans::KMeansResult;
pub use spectral::SpectralEmbedding;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for clustering operations
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Unified error type for the clustering pipeline
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// Invalid configuration parameters, rejected before any computation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input collection contains no fibers
    #[error("input collection contains no fibers")]
    EmptyInput,

    /// A degree-matrix entry is not strictly positive, so the random-walk
    /// Laplacian cannot be formed
    #[error("degree matrix entry {index} is not strictly positive")]
    DegenerateDegree {
        /// Index of the offending fiber
        index: usize,
    },

    /// Malformed or mutually inconsistent input data
    #[error("invalid input data: {0}")]
    InvalidData(String),
}
