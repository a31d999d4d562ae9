use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult, ObjectiveError};

/// A decision vector whose variables are each a short real vector.
///
/// Stored row-major: `n_vars` rows of `n_hyper_dims` components. Search
/// strategies work on the flat buffer; only the projection looks at rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct HypercomplexPoint {
    components: Vec<f64>,
    n_hyper_dims: usize,
}

/// Unchecked wire shape of a [`HypercomplexPoint`].
#[derive(Deserialize)]
struct RawPoint {
    components: Vec<f64>,
    n_hyper_dims: usize,
}

impl TryFrom<RawPoint> for HypercomplexPoint {
    type Error = ObjectiveError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        let n_vars = raw.components.len().checked_div(raw.n_hyper_dims).unwrap_or(0);
        Self::from_flat(raw.components, n_vars, raw.n_hyper_dims)
    }
}

impl HypercomplexPoint {
    /// Reshape a flat position into `n_vars` rows of `n_hyper_dims`.
    pub fn from_flat(
        components: Vec<f64>,
        n_vars: usize,
        n_hyper_dims: usize,
    ) -> Result<Self, ObjectiveError> {
        let expected = n_vars * n_hyper_dims;
        if n_hyper_dims == 0 || components.len() != expected {
            return Err(ObjectiveError::DimensionMismatch {
                expected,
                actual: components.len(),
            });
        }
        Ok(Self {
            components,
            n_hyper_dims,
        })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ObjectiveError> {
        let n_hyper_dims = rows.first().map_or(0, Vec::len);
        let components: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_flat(components, rows.len(), n_hyper_dims)
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.components.chunks_exact(self.n_hyper_dims)
    }

    pub fn n_vars(&self) -> usize {
        self.components.len() / self.n_hyper_dims
    }

    pub const fn n_hyper_dims(&self) -> usize {
        self.n_hyper_dims
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.components
    }
}

/// Exponent of the p-norm used by the projection. Always finite and `> 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProjectionOrder(f64);

impl ProjectionOrder {
    /// The Euclidean order used throughout stage 1.
    pub const EUCLIDEAN: Self = Self(2.0);

    pub fn new(p: f64) -> DomainResult<Self> {
        if p.is_finite() && p > 0.0 {
            Ok(Self(p))
        } else {
            Err(DomainError::InvalidProjectionOrder(p))
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for ProjectionOrder {
    fn default() -> Self {
        Self::EUCLIDEAN
    }
}

impl TryFrom<f64> for ProjectionOrder {
    type Error = DomainError;

    fn try_from(p: f64) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl From<ProjectionOrder> for f64 {
    fn from(order: ProjectionOrder) -> Self {
        order.0
    }
}

/// Box constraint shared by every coordinate of a search space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBounds {
    pub dim: usize,
    pub lower: f64,
    pub upper: f64,
}

impl SearchBounds {
    pub const fn new(dim: usize, lower: f64, upper: f64) -> Self {
        Self { dim, lower, upper }
    }

    /// Unit hypercube; every hypercomplex component lives here.
    pub const fn unit(dim: usize) -> Self {
        Self::new(dim, 0.0, 1.0)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dim
            && position
                .iter()
                .all(|&x| (self.lower..=self.upper).contains(&x))
    }
}
