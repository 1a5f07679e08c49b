use ndarray::{ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};

/// Axis-aligned bounding box in lens space.
///
/// The number of dimensions is only known at runtime, from the column count of the
/// point matrix, so both corners are stored as vectors of equal length. Each dimension
/// also records whether its upper edge is inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec<f64>,
    max: Vec<f64>,
    closed: Vec<bool>,
}

impl BoundingBox {
    /// Half-open box `[min, max)` on every dimension.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(CoverError::BoundsDimensionMismatch { min: min.len(), max: max.len() });
        }
        Ok(Self::from_corners(min, max))
    }

    pub(crate) fn from_corners(min: Vec<f64>, max: Vec<f64>) -> Self {
        let closed = vec![false; min.len()];
        Self { min, max, closed }
    }

    /// Computes the empirical bounds of the coordinate columns of `data`.
    ///
    /// Column 0 holds row identifiers and is skipped. Coordinates must be finite.
    pub fn from_data(data: ArrayView2<'_, f64>) -> Result<Self> {
        let columns = data.ncols();
        if columns < 2 {
            return Err(CoverError::MissingCoordinates { columns });
        }
        if data.nrows() == 0 {
            return Err(CoverError::EmptyData);
        }

        let dims = columns - 1;
        let mut min = vec![f64::INFINITY; dims];
        let mut max = vec![f64::NEG_INFINITY; dims];

        for (row, values) in data.axis_iter(Axis(0)).enumerate() {
            for d in 0..dims {
                let v = values[d + 1];
                if !v.is_finite() {
                    return Err(CoverError::NonFiniteCoordinate { row, column: d + 1 });
                }
                min[d] = min[d].min(v);
                max[d] = max[d].max(v);
            }
        }

        Ok(Self::from_corners(min, max))
    }

    /// Makes the upper edge of `dimension` inclusive.
    pub(crate) fn close_upper(&mut self, dimension: usize) {
        self.closed[dimension] = true;
    }

    pub fn dimensions(&self) -> usize {
        self.min.len()
    }

    /// Lower corner.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Upper corner.
    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Whether a point lying exactly on the upper edge of `dimension` is contained.
    pub fn is_upper_closed(&self, dimension: usize) -> bool {
        self.closed.get(dimension).copied().unwrap_or(false)
    }

    /// Extent of the box along dimension `d`.
    pub fn width(&self, d: usize) -> f64 {
        self.max[d] - self.min[d]
    }

    /// Containment test: `min[d] <= p[d] < max[d]` on every dimension, with `p[d] == max[d]`
    /// also accepted where the upper edge is closed.
    ///
    /// A NaN coordinate fails every comparison, so such a point is never contained.
    pub fn contains(&self, point: ArrayView1<'_, f64>) -> bool {
        point.len() == self.dimensions()
            && point.iter().enumerate().all(|(d, &v)| {
                let (lo, hi) = (self.min[d], self.max[d]);
                lo <= v && (v < hi || (self.closed[d] && v == hi))
            })
    }
}

/// Caller-pinned bounds for a bounded cover.
///
/// Each dimension carries an optional lower and upper value. A side left as `None` falls
/// back to the empirical minimum or maximum of the data when the cover is defined.
/// Infinite values passed to [`Limits::new`] are the unbounded sentinel and become `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Limits {
    sides: Vec<[Option<f64>; 2]>,
}

impl Limits {
    /// Builds limits from `(lower, upper)` pairs, one per dimension.
    ///
    /// `f64::INFINITY` or `f64::NEG_INFINITY` on either side means "use the data range".
    pub fn new(pairs: Vec<[f64; 2]>) -> Result<Self> {
        let mut sides = Vec::with_capacity(pairs.len());
        for (dimension, [lower, upper]) in pairs.into_iter().enumerate() {
            sides.push([pin(dimension, lower)?, pin(dimension, upper)?]);
        }
        Ok(Self { sides })
    }

    /// Builds limits from a `(D, 2)` array of `(lower, upper)` rows.
    pub fn from_array(limits: ArrayView2<'_, f64>) -> Result<Self> {
        if limits.ncols() != 2 {
            return Err(CoverError::InvalidLimit {
                dimension: 0,
                reason: format!("expected a (D, 2) array, got {} columns", limits.ncols()),
            });
        }
        let pairs = limits
            .axis_iter(Axis(0))
            .map(|row| [row[0], row[1]])
            .collect();
        Self::new(pairs)
    }

    /// Limits over `dimensions` dimensions with nothing pinned.
    pub fn unbounded(dimensions: usize) -> Self {
        Self { sides: vec![[None, None]; dimensions] }
    }

    /// Pins the lower bound of `dimension`, growing the table if needed.
    ///
    /// An infinite value unpins the side; NaN is rejected as in [`Limits::new`].
    pub fn with_lower(mut self, dimension: usize, value: f64) -> Result<Self> {
        self.grow(dimension);
        self.sides[dimension][0] = pin(dimension, value)?;
        Ok(self)
    }

    /// Pins the upper bound of `dimension`, growing the table if needed.
    pub fn with_upper(mut self, dimension: usize, value: f64) -> Result<Self> {
        self.grow(dimension);
        self.sides[dimension][1] = pin(dimension, value)?;
        Ok(self)
    }

    fn grow(&mut self, dimension: usize) {
        if self.sides.len() <= dimension {
            self.sides.resize(dimension + 1, [None, None]);
        }
    }

    pub fn dimensions(&self) -> usize {
        self.sides.len()
    }

    pub fn lower(&self, dimension: usize) -> Option<f64> {
        self.sides.get(dimension).and_then(|s| s[0])
    }

    pub fn upper(&self, dimension: usize) -> Option<f64> {
        self.sides.get(dimension).and_then(|s| s[1])
    }

    /// Merges the pinned sides with the empirical bounds of the data.
    ///
    /// Returns a fresh box; `self` is left untouched so the same limits can be resolved
    /// against any number of datasets.
    pub fn resolve(&self, empirical: &BoundingBox) -> Result<BoundingBox> {
        let expected = empirical.dimensions();
        if self.sides.len() != expected {
            return Err(CoverError::LimitsDimensionMismatch {
                supplied: self.sides.len(),
                expected,
            });
        }

        let mut min = Vec::with_capacity(expected);
        let mut max = Vec::with_capacity(expected);
        for (dimension, [lower, upper]) in self.sides.iter().enumerate() {
            let lower = lower.unwrap_or(empirical.min[dimension]);
            let upper = upper.unwrap_or(empirical.max[dimension]);
            if lower > upper {
                return Err(CoverError::InvertedBounds { dimension, lower, upper });
            }
            min.push(lower);
            max.push(upper);
        }

        Ok(BoundingBox::from_corners(min, max))
    }
}

fn pin(dimension: usize, value: f64) -> Result<Option<f64>> {
    if value.is_nan() {
        return Err(CoverError::InvalidLimit {
            dimension,
            reason: "limit is NaN".to_string(),
        });
    }
    Ok(value.is_finite().then_some(value))
}
