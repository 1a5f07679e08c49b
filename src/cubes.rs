use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};

/// Grid resolution of a cover: how many cubes each coordinate dimension is split into.
///
/// Deserializes from either a single integer or a list with one entry per dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CubeCount {
    /// Same number of cubes along every dimension.
    Uniform(usize),
    /// Explicit number of cubes per dimension.
    PerDimension(Vec<usize>),
}

impl Default for CubeCount {
    fn default() -> Self {
        CubeCount::Uniform(10)
    }
}

impl From<usize> for CubeCount {
    fn from(n: usize) -> Self {
        CubeCount::Uniform(n)
    }
}

impl From<Vec<usize>> for CubeCount {
    fn from(counts: Vec<usize>) -> Self {
        CubeCount::PerDimension(counts)
    }
}

impl CubeCount {
    /// Expands the count into one resolution per dimension.
    ///
    /// Fails if a per-dimension list has the wrong length, any entry is zero, or the
    /// total number of cubes overflows `usize`.
    pub fn resolve(&self, dimensions: usize) -> Result<Vec<usize>> {
        let resolution = match self {
            CubeCount::Uniform(n) => vec![*n; dimensions],
            CubeCount::PerDimension(counts) => {
                if counts.len() != dimensions {
                    return Err(CoverError::DimensionMismatch {
                        supplied: counts.len(),
                        expected: dimensions,
                    });
                }
                counts.clone()
            }
        };

        if let Some(dimension) = resolution.iter().position(|&n| n == 0) {
            return Err(CoverError::ZeroResolution { dimension });
        }
        total_cubes(&resolution)?;
        Ok(resolution)
    }
}

/// Number of cubes in a grid of the given resolution.
pub(crate) fn total_cubes(resolution: &[usize]) -> Result<usize> {
    resolution
        .iter()
        .try_fold(1usize, |total, &n| total.checked_mul(n))
        .ok_or_else(|| CoverError::TooManyCubes { resolution: resolution.to_vec() })
}

/// Maps a flat index in product order back to a cube coordinate.
///
/// The last dimension varies fastest. Returns `None` past the end of the grid.
/// `total` is the grid's cube count from [`total_cubes`].
pub(crate) fn unflatten(resolution: &[usize], total: usize, flat: usize) -> Option<Vec<usize>> {
    if flat >= total {
        return None;
    }
    let mut cube = vec![0; resolution.len()];
    let mut rest = flat;
    for d in (0..resolution.len()).rev() {
        cube[d] = rest % resolution[d];
        rest /= resolution[d];
    }
    Some(cube)
}

/// Lazy iterator over every cube coordinate of a grid, in Cartesian product order.
pub struct CubeIter<'a> {
    resolution: &'a [usize],
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl<'a> CubeIter<'a> {
    pub(crate) fn new(resolution: &'a [usize], remaining: usize) -> Self {
        let next = (remaining > 0).then(|| vec![0; resolution.len()]);
        Self { resolution, next, remaining }
    }
}

impl Iterator for CubeIter<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining -= 1;

        // Odometer step, carrying from the last dimension.
        let mut successor = current.clone();
        for d in (0..successor.len()).rev() {
            successor[d] += 1;
            if successor[d] < self.resolution[d] {
                self.next = Some(successor);
                break;
            }
            successor[d] = 0;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CubeIter<'_> {}
