//! Fiber geometry containers
//!
//! A fiber is a fixed-length ordered sequence of 3D points representing one
//! tractography streamline. The collection stores all fibers as three
//! parallel N×P coordinate arrays (one per axis) so that pairwise distance
//! computation can use whole-array arithmetic instead of per-point loops.
//!
//! Raw curve resampling to a fixed point count happens upstream; every fiber
//! handed to this module already has the same number of points.

use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{ClusterError, Result};

/// A single fiber as three per-axis coordinate vectors of length P
#[derive(Debug, Clone, PartialEq)]
pub struct Fiber {
    /// X coordinates along the fiber
    pub x: Array1<f64>,
    /// Y coordinates along the fiber
    pub y: Array1<f64>,
    /// Z coordinates along the fiber
    pub z: Array1<f64>,
}

impl Fiber {
    /// Number of points on this fiber
    pub fn points_per_fiber(&self) -> usize {
        self.x.len()
    }

    /// The same curve traversed in the opposite direction.
    ///
    /// Reversal is an involution: `f.reversed().reversed() == f`.
    pub fn reversed(&self) -> Fiber {
        Fiber {
            x: self.x.slice(s![..;-1]).to_owned(),
            y: self.y.slice(s![..;-1]).to_owned(),
            z: self.z.slice(s![..;-1]).to_owned(),
        }
    }
}

/// An immutable set of N fibers sharing the same point count P,
/// stored as three N×P coordinate arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiberCollection {
    xs: Array2<f64>,
    ys: Array2<f64>,
    zs: Array2<f64>,
}

impl FiberCollection {
    /// Build a collection from per-fiber point sequences.
    ///
    /// Every fiber must carry the same, nonzero number of points. An empty
    /// slice yields an empty collection (rejected later by the pipeline,
    /// but valid as a container).
    pub fn from_points(fibers: &[Vec<[f64; 3]>]) -> Result<Self> {
        let n = fibers.len();
        if n == 0 {
            return Ok(Self {
                xs: Array2::zeros((0, 0)),
                ys: Array2::zeros((0, 0)),
                zs: Array2::zeros((0, 0)),
            });
        }

        let p = fibers[0].len();
        if p == 0 {
            return Err(ClusterError::InvalidData(
                "fibers must have at least one point".into(),
            ));
        }
        for (i, fiber) in fibers.iter().enumerate() {
            if fiber.len() != p {
                return Err(ClusterError::InvalidData(format!(
                    "fiber {} has {} points, expected {}",
                    i,
                    fiber.len(),
                    p
                )));
            }
        }

        let mut xs = Array2::zeros((n, p));
        let mut ys = Array2::zeros((n, p));
        let mut zs = Array2::zeros((n, p));
        for (i, fiber) in fibers.iter().enumerate() {
            for (j, point) in fiber.iter().enumerate() {
                xs[[i, j]] = point[0];
                ys[[i, j]] = point[1];
                zs[[i, j]] = point[2];
            }
        }

        Ok(Self { xs, ys, zs })
    }

    /// Build a collection directly from per-axis N×P arrays.
    pub fn from_axes(xs: Array2<f64>, ys: Array2<f64>, zs: Array2<f64>) -> Result<Self> {
        if xs.dim() != ys.dim() || xs.dim() != zs.dim() {
            return Err(ClusterError::InvalidData(format!(
                "axis arrays disagree on shape: x {:?}, y {:?}, z {:?}",
                xs.dim(),
                ys.dim(),
                zs.dim()
            )));
        }
        if xs.nrows() > 0 && xs.ncols() == 0 {
            return Err(ClusterError::InvalidData(
                "fibers must have at least one point".into(),
            ));
        }
        Ok(Self { xs, ys, zs })
    }

    /// Number of fibers N
    pub fn len(&self) -> usize {
        self.xs.nrows()
    }

    /// Whether the collection holds no fibers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Points per fiber P
    pub fn points_per_fiber(&self) -> usize {
        self.xs.ncols()
    }

    /// Extract fiber `idx` as an owned per-axis view
    pub fn fiber(&self, idx: usize) -> Fiber {
        Fiber {
            x: self.xs.row(idx).to_owned(),
            y: self.ys.row(idx).to_owned(),
            z: self.zs.row(idx).to_owned(),
        }
    }

    /// X coordinate array, N×P
    pub fn xs(&self) -> &Array2<f64> {
        &self.xs
    }

    /// Y coordinate array, N×P
    pub fn ys(&self) -> &Array2<f64> {
        &self.ys
    }

    /// Z coordinate array, N×P
    pub fn zs(&self) -> &Array2<f64> {
        &self.zs
    }
}

/// Per-point scalar values (e.g. FA or MD sampled along each fiber) for one
/// scalar type, aligned index-for-index with a [`FiberCollection`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarProfile {
    scalar_type: String,
    values: Array2<f64>,
}

impl ScalarProfile {
    /// Create a profile from an N×P value array.
    ///
    /// Scalar profiles are assumed pre-aligned to a canonical fiber
    /// orientation established upstream, so no reversal handling applies.
    pub fn new(scalar_type: impl Into<String>, values: Array2<f64>) -> Self {
        Self {
            scalar_type: scalar_type.into(),
            values,
        }
    }

    /// Identifier of the quantitative scalar this profile carries
    pub fn scalar_type(&self) -> &str {
        &self.scalar_type
    }

    /// Number of fibers N
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// Whether the profile holds no fibers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The N×P value array
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Scalar values of fiber `idx` as an owned vector
    pub fn profile(&self, idx: usize) -> Array1<f64> {
        self.values.row(idx).to_owned()
    }
}
