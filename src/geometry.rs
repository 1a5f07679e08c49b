use std::ops::Range;

use ndarray::{s, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::bounds::BoundingBox;
use crate::cubes::{total_cubes, unflatten, CubeIter};
use crate::error::{CoverError, Result};

/// Bin layout produced by [`Cover::define_bins`](crate::Cover::define_bins).
///
/// The geometry is an immutable value: it owns the resolved bounds, the per-dimension
/// resolution and the derived chunk and overlap widths. Membership queries read it and
/// never change it, so a single geometry can be shared across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverGeometry {
    bounds: BoundingBox,
    resolution: Vec<usize>,
    total: usize,
    chunk: Vec<f64>,
    overlap: Vec<f64>,
}

impl CoverGeometry {
    /// Derives chunk and overlap widths from resolved bounds.
    ///
    /// `resolution` must already be validated: one non-zero entry per dimension.
    pub(crate) fn new(bounds: BoundingBox, resolution: Vec<usize>, perc_overlap: f64) -> Result<Self> {
        let total = total_cubes(&resolution)?;
        let chunk: Vec<f64> = resolution
            .iter()
            .enumerate()
            .map(|(d, &n)| bounds.width(d) / n as f64)
            .collect();
        let overlap = chunk.iter().map(|c| perc_overlap * c).collect();

        Ok(Self { bounds, resolution, total, chunk, overlap })
    }

    /// Number of coordinate dimensions.
    pub fn dimensions(&self) -> usize {
        self.resolution.len()
    }

    /// Number of cubes along each dimension.
    pub fn resolution(&self) -> &[usize] {
        &self.resolution
    }

    /// The lower corner of the grid.
    pub fn origin(&self) -> &[f64] {
        self.bounds.min()
    }

    pub fn chunk_width(&self) -> &[f64] {
        &self.chunk
    }

    pub fn overlap_width(&self) -> &[f64] {
        &self.overlap
    }

    /// The bounds the grid was laid over, after any limits were applied.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Columns of the point matrix holding coordinates.
    pub fn coordinate_columns(&self) -> Range<usize> {
        1..self.dimensions() + 1
    }

    /// Total number of cubes in the grid.
    pub fn n_cubes_total(&self) -> usize {
        self.total
    }

    /// Iterates over every cube coordinate. Each call starts a fresh pass.
    pub fn cubes(&self) -> CubeIter<'_> {
        CubeIter::new(&self.resolution, self.total)
    }

    /// The cube at position `flat` of [`cubes`](Self::cubes).
    pub fn cube_at(&self, flat: usize) -> Option<Vec<usize>> {
        unflatten(&self.resolution, self.total, flat)
    }

    /// Spatial extent of a cube, overlap included.
    ///
    /// Along dimension `d` the cube spans
    /// `[origin + c * chunk, origin + c * chunk + chunk + overlap)`. The upper edge of the
    /// last cube along a dimension is closed, so the grid's upper bound is covered. A row
    /// is a member of the cube exactly when [`BoundingBox::contains`] accepts its
    /// coordinates.
    pub fn extent(&self, cube: &[usize]) -> Result<BoundingBox> {
        self.check_cube(cube)?;
        Ok(self.extent_unchecked(cube))
    }

    fn extent_unchecked(&self, cube: &[usize]) -> BoundingBox {
        let mut min = Vec::with_capacity(cube.len());
        let mut max = Vec::with_capacity(cube.len());
        for (d, &c) in cube.iter().enumerate() {
            let origin = self.bounds.min()[d];
            // Upper edges are taken from the next cube's lower edge (or the grid bound)
            // so that adjacent cubes meet exactly.
            let edge = if c + 1 == self.resolution[d] {
                self.bounds.max()[d]
            } else {
                origin + (c + 1) as f64 * self.chunk[d]
            };
            min.push(origin + c as f64 * self.chunk[d]);
            max.push(edge + self.overlap[d]);
        }

        let mut extent = BoundingBox::from_corners(min, max);
        for (d, &c) in cube.iter().enumerate() {
            if c + 1 == self.resolution[d] {
                extent.close_upper(d);
            }
        }
        extent
    }

    fn check_cube(&self, cube: &[usize]) -> Result<()> {
        if cube.len() != self.dimensions() {
            return Err(CoverError::CubeDimensionMismatch {
                supplied: cube.len(),
                expected: self.dimensions(),
            });
        }
        for (dimension, (&index, &resolution)) in cube.iter().zip(&self.resolution).enumerate() {
            if index >= resolution {
                return Err(CoverError::CubeOutOfRange { dimension, index, resolution });
            }
        }
        Ok(())
    }

    fn check_columns(&self, data: &ArrayView2<'_, f64>) -> Result<()> {
        let expected = self.dimensions() + 1;
        if data.ncols() != expected {
            return Err(CoverError::ColumnMismatch { supplied: data.ncols(), expected });
        }
        Ok(())
    }

    fn members(&self, data: &ArrayView2<'_, f64>, extent: &BoundingBox) -> Vec<usize> {
        let columns = self.coordinate_columns();

        data.axis_iter(Axis(0))
            .enumerate()
            .filter_map(|(i, row)| {
                let coords = row.slice(s![columns.clone()]);
                if extent.contains(coords) {
                    return Some(i);
                }
                if coords.iter().any(|v| v.is_nan()) {
                    tracing::trace!(row = i, "row with NaN coordinate excluded from cube");
                }
                None
            })
            .collect()
    }

    /// Indices of the rows of `data` that fall inside `cube`, in input order.
    pub fn entry_indices(&self, data: ArrayView2<'_, f64>, cube: &[usize]) -> Result<Vec<usize>> {
        self.check_columns(&data)?;
        let extent = self.extent(cube)?;
        Ok(self.members(&data, &extent))
    }

    /// Rows of `data` that fall inside `cube`, all columns preserved.
    ///
    /// A cube with no members yields an array with zero rows.
    pub fn find_entries(&self, data: ArrayView2<'_, f64>, cube: &[usize]) -> Result<Array2<f64>> {
        let indices = self.entry_indices(data, cube)?;
        Ok(Array2::from_shape_fn((indices.len(), data.ncols()), |(i, j)| {
            data[[indices[i], j]]
        }))
    }

    /// Membership of every cube, computed in parallel.
    ///
    /// Returns `(cube, row indices)` pairs in the order of [`cubes`](Self::cubes), empty
    /// cubes included.
    pub fn par_entry_indices(&self, data: ArrayView2<'_, f64>) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        self.check_columns(&data)?;
        let total = self.n_cubes_total();

        let entries = (0..total)
            .into_par_iter()
            .filter_map(|flat| self.cube_at(flat))
            .map(|cube| {
                let extent = self.extent_unchecked(&cube);
                let rows = self.members(&data, &extent);
                (cube, rows)
            })
            .collect();

        Ok(entries)
    }
}
